// tests/live_reload.rs

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use labrun::server::snippet::EVENTS_PATH;
use labrun::server::{LiveReloadServer, ReloadHub, ServerOptions};
use labrun::tasks::serve;
use labrun_test_utils::builders::{ConfigFileBuilder, ProjectFixture};
use labrun_test_utils::fakes::{FakeGenerator, FakeStyleCompiler};
use labrun_test_utils::{init_tracing, with_timeout};

async fn start(fixture: &ProjectFixture, hub: ReloadHub) -> SocketAddr {
    let server = LiveReloadServer::bind(
        ServerOptions {
            host: "127.0.0.1".to_string(),
            port: 0,
            root: fixture.path("public"),
            snippet_blacklist: vec!["/index.html".into(), "/".into(), "/?*".into()],
        },
        hub,
    )
    .await
    .unwrap();
    let addr = server.local_addr();
    server.spawn();
    addr
}

async fn get(addr: SocketAddr, target: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
        .await
        .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn pattern_pages_get_the_client_snippet() {
    init_tracing();
    let fixture = ProjectFixture::new();
    fixture.write(
        "public/patterns/00-atoms-button/00-atoms-button.html",
        "<html><body><button>Hi</button></body></html>",
    );
    fixture.write("public/index.html", "<html><body>shell</body></html>");

    let addr = start(&fixture, ReloadHub::new()).await;

    let (status, body) =
        with_timeout(get(addr, "/patterns/00-atoms-button/00-atoms-button.html")).await;
    assert_eq!(status, 200);
    assert!(body.contains(EVENTS_PATH), "{body}");
    assert!(body.find("__labrun").unwrap() < body.find("</body>").unwrap());

    // The viewer shell is blacklisted.
    let (status, body) = with_timeout(get(addr, "/")).await;
    assert_eq!(status, 200);
    assert_eq!(body, "<html><body>shell</body></html>");

    let (_, body) = with_timeout(get(addr, "/?p=atoms-button")).await;
    assert!(!body.contains(EVENTS_PATH));
}

#[tokio::test]
async fn missing_files_and_traversal_are_rejected() {
    let fixture = ProjectFixture::new();
    fixture.write("secret.txt", "nope");
    let addr = start(&fixture, ReloadHub::new()).await;

    let (status, _) = with_timeout(get(addr, "/nothing-here.css")).await;
    assert_eq!(status, 404);

    let (status, body) = with_timeout(get(addr, "/../secret.txt")).await;
    assert_eq!(status, 403);
    assert!(!body.contains("nope"));
}

#[tokio::test]
async fn event_stream_delivers_reload_and_css_events() {
    init_tracing();
    let fixture = ProjectFixture::new();
    let hub = ReloadHub::new();
    let addr = start(&fixture, hub.clone()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(format!("GET {EVENTS_PATH} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
        .await
        .unwrap();
    let mut lines = BufReader::new(stream).lines();

    // Wait until the server has subscribed this client.
    with_timeout(async {
        while let Some(line) = lines.next_line().await.unwrap() {
            if line == ": connected" {
                break;
            }
        }
    })
    .await;
    assert_eq!(hub.client_count(), 1);

    hub.reload();
    hub.reload_css(vec!["style.css".to_string()]);

    let mut frames = Vec::new();
    with_timeout(async {
        while frames.len() < 4 {
            let line = lines.next_line().await.unwrap().unwrap();
            if !line.is_empty() {
                frames.push(line);
            }
        }
    })
    .await;

    assert_eq!(
        frames,
        vec![
            "event: reload",
            "data: {}",
            "event: css",
            "data: [\"style.css\"]",
        ]
    );
}

#[tokio::test]
async fn connect_task_records_the_bound_address() {
    let fixture = ProjectFixture::new();
    fixture.write("public/styleguide/html/styleguide.html", "<body></body>");

    let ctx = fixture.context(
        ConfigFileBuilder::new().port(0).build(),
        FakeGenerator::new(),
        FakeStyleCompiler::new(),
    );
    assert!(ctx.server_addr().is_none());

    serve::connect(&ctx).await.unwrap();
    let addr = ctx.server_addr().unwrap();

    let (status, body) = with_timeout(get(addr, "/styleguide/html/styleguide.html")).await;
    assert_eq!(status, 200);
    assert!(body.contains(EVENTS_PATH));

    // Reload tasks never fail, with or without clients.
    serve::reload(&ctx).await.unwrap();
    serve::reload_css(&ctx).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
}
