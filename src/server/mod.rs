// src/server/mod.rs

//! Development server with live reload.
//!
//! - [`hub`] owns the broadcast channel tasks publish reload events on.
//! - [`http`] is the minimal static-file HTTP layer.
//! - [`snippet`] holds the browser client and the injection rules.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::Result;

pub mod http;
pub mod hub;
pub mod snippet;

pub use hub::{ReloadEvent, ReloadHub};

use http::{Resolved, content_type, parse_request_head, resolve_target, write_response};
use snippet::{EVENTS_PATH, inject_snippet, is_blacklisted};

/// How many ports after the configured one are tried when it is taken.
const PORT_ATTEMPTS: u16 = 10;
const MAX_HEAD_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    /// Directory served as `/`.
    pub root: PathBuf,
    pub snippet_blacklist: Vec<String>,
}

#[derive(Debug)]
struct Shared {
    root: PathBuf,
    blacklist: Vec<String>,
    hub: ReloadHub,
}

#[derive(Debug)]
pub struct LiveReloadServer {
    listener: TcpListener,
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl LiveReloadServer {
    /// Bind the configured port, or the first free one of the next
    /// `PORT_ATTEMPTS` ports.
    pub async fn bind(opts: ServerOptions, hub: ReloadHub) -> Result<Self> {
        let listener = bind_with_fallback(&opts.host, opts.port).await?;
        let addr = listener.local_addr()?;

        if addr.port() != opts.port && opts.port != 0 {
            warn!(requested = opts.port, port = addr.port(), "port in use; using next free port");
        }

        Ok(Self {
            listener,
            addr,
            shared: Arc::new(Shared {
                root: opts.root,
                blacklist: opts.snippet_blacklist,
                hub,
            }),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the accept loop in the background until the process exits.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match self.listener.accept().await {
                    Ok((stream, peer)) => {
                        let shared = Arc::clone(&self.shared);
                        tokio::spawn(async move {
                            if let Err(err) = handle_connection(stream, shared).await {
                                debug!(%peer, error = %err, "connection closed with error");
                            }
                        });
                    }
                    Err(err) => warn!(error = %err, "accept failed"),
                }
            }
        })
    }
}

async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener> {
    let attempts = if port == 0 { 1 } else { PORT_ATTEMPTS + 1 };
    let mut last_err = None;

    for offset in 0..attempts {
        let candidate = port.saturating_add(offset);
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => return Ok(listener),
            Err(err) if err.kind() == ErrorKind::AddrInUse => {
                debug!(port = candidate, "port in use");
                last_err = Some(err);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("binding {host}:{candidate}"))
                    .into());
            }
        }
    }

    let err = last_err
        .map(anyhow::Error::new)
        .unwrap_or_else(|| anyhow::anyhow!("no port available"));
    Err(err
        .context(format!("no free port in {port}..={}", port.saturating_add(PORT_ATTEMPTS)))
        .into())
}

async fn handle_connection(stream: TcpStream, shared: Arc<Shared>) -> anyhow::Result<()> {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();

    loop {
        let read = reader.read_line(&mut head).await?;
        if read == 0 || head.ends_with("\r\n\r\n") || head.ends_with("\n\n") {
            break;
        }
        if head.len() > MAX_HEAD_BYTES {
            anyhow::bail!("request head too large");
        }
    }

    let mut stream = reader.into_inner();
    let Some(request) = parse_request_head(&head) else {
        write_response(&mut stream, 400, "Bad Request", "text/plain", b"bad request", true).await?;
        return Ok(());
    };

    if request.path() == EVENTS_PATH {
        return stream_events(stream, shared.hub.subscribe()).await;
    }

    let include_body = match request.method.as_str() {
        "GET" => true,
        "HEAD" => false,
        _ => {
            write_response(&mut stream, 405, "Method Not Allowed", "text/plain", b"", true).await?;
            return Ok(());
        }
    };

    match resolve_target(&shared.root, request.path()) {
        Resolved::Forbidden => {
            write_response(&mut stream, 403, "Forbidden", "text/plain", b"forbidden", include_body)
                .await?;
        }
        Resolved::NotFound => {
            write_response(&mut stream, 404, "Not Found", "text/plain", b"not found", include_body)
                .await?;
        }
        Resolved::File(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {:?}", path))?;
            let mime = content_type(&path);

            let body = if mime.starts_with("text/html") && !is_blacklisted(&request.target, &shared.blacklist) {
                inject_snippet(&String::from_utf8_lossy(&bytes)).into_bytes()
            } else {
                bytes
            };

            write_response(&mut stream, 200, "OK", mime, &body, include_body).await?;
        }
    }

    Ok(())
}

async fn stream_events(
    mut stream: TcpStream,
    mut events: broadcast::Receiver<ReloadEvent>,
) -> anyhow::Result<()> {
    stream
        .write_all(
            b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\n\
              Connection: keep-alive\r\n\r\n: connected\n\n",
        )
        .await?;
    stream.flush().await?;
    info!("live-reload client connected");

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "client lagged; sending full reload");
                ReloadEvent::Full
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let frame = match &event {
            ReloadEvent::Full => "event: reload\ndata: {}\n\n".to_string(),
            ReloadEvent::Css(names) => {
                format!("event: css\ndata: {}\n\n", serde_json::to_string(names)?)
            }
        };

        if stream.write_all(frame.as_bytes()).await.is_err() {
            break;
        }
        stream.flush().await?;
    }

    info!("live-reload client disconnected");
    Ok(())
}
