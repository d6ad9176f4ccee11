// tests/watch_matching.rs

use std::path::Path;

use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tokio::sync::mpsc;

use labrun::engine::RuntimeEvent;
use labrun::watch::event_handler::{is_change, matching_subscriptions, process_event};
use labrun::watch::{build_subscriptions, spawn_watcher, watch_roots};
use labrun_test_utils::builders::{ConfigFileBuilder, ProjectFixture};
use labrun_test_utils::{init_tracing, with_timeout};

fn subscriptions() -> Vec<labrun::watch::Subscription> {
    build_subscriptions(&ConfigFileBuilder::new().build(), Path::new("/site")).unwrap()
}

#[test]
fn subscriptions_route_paths_to_narrow_reactions() {
    let subs = subscriptions();
    let names: Vec<&str> = subs.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec!["scripts", "styles-source", "styles-compiled", "styleguide", "patterns"]
    );

    let cases = [
        ("source/js/src/app.js", vec!["scripts"]),
        ("source/js/src/nav/menu.js", vec!["scripts"]),
        ("source/js/vendor.js", vec![]),
        ("source/css/scss/02-generic/_sprite.scss", vec!["styles-source"]),
        ("source/css/style.css", vec!["styles-compiled"]),
        ("styleguide/dist/css/styleguide.css", vec!["styleguide"]),
        ("source/_patterns/00-atoms/button.mustache", vec!["patterns"]),
        ("source/_patterns/00-atoms/button.md", vec!["patterns"]),
        ("source/_data/data.json", vec!["patterns"]),
        ("source/_meta/_00-head.mustache", vec!["patterns"]),
        ("source/images/logo.png", vec!["patterns"]),
        ("source/images/sprite/arrow.svg", vec![]),
        ("public/index.html", vec![]),
    ];

    for (path, expected) in cases {
        assert_eq!(matching_subscriptions(&subs, path), expected, "{path}");
    }
}

#[test]
fn reactions_match_the_watched_concern() {
    let subs = subscriptions();
    let reaction = |name: &str| {
        subs.iter()
            .find(|s| s.name() == name)
            .map(|s| s.reaction().to_vec())
            .unwrap()
    };

    assert_eq!(reaction("scripts"), vec!["pl-copy:js"]);
    assert_eq!(reaction("styles-source"), vec!["sass-compile"]);
    assert_eq!(reaction("styles-compiled"), vec!["pl-copy:css", "reload-css"]);
    assert_eq!(
        reaction("styleguide"),
        vec!["pl-copy:styleguide", "pl-copy:styleguide-css", "reload-css"]
    );
    assert_eq!(reaction("patterns"), vec!["generate", "reload"]);
}

#[test]
fn extra_template_extensions_are_watched() {
    let mut raw = ConfigFileBuilder::new().raw();
    raw.runner.watch.template_extensions.push(".twig".to_string());
    let cfg = labrun::config::ConfigFile::try_from(raw).unwrap();
    let subs = build_subscriptions(&cfg, Path::new("/site")).unwrap();

    assert_eq!(
        matching_subscriptions(&subs, "source/_patterns/card.twig"),
        vec!["patterns"]
    );
}

#[test]
fn metadata_only_modifications_are_not_changes() {
    assert!(!is_change(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))));
    assert!(!is_change(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))));
    assert!(is_change(&EventKind::Modify(ModifyKind::Any)));
    assert!(is_change(&EventKind::Modify(ModifyKind::Data(DataChange::Any))));
}

#[tokio::test]
async fn only_creates_and_modifies_are_forwarded() {
    let subs = subscriptions();
    let (tx, mut rx) = mpsc::channel(16);
    let cwd = Path::new("/site");

    let modify = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(cwd.join("source/css/style.css"));
    let create = Event::new(EventKind::Create(CreateKind::File))
        .add_path(cwd.join("source/js/src/new.js"));
    let access = Event::new(EventKind::Access(AccessKind::Any))
        .add_path(cwd.join("source/js/src/app.js"));
    let remove = Event::new(EventKind::Remove(RemoveKind::File))
        .add_path(cwd.join("source/js/src/old.js"));
    let touch = Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)))
        .add_path(cwd.join("source/_patterns/atoms/button.mustache"));

    for event in [modify, access, remove, touch, create] {
        assert!(process_event(cwd, event, &subs, &tx).await);
    }
    drop(tx);

    let mut received = Vec::new();
    while let Some(event) = rx.recv().await {
        received.push(event);
    }

    assert_eq!(
        received,
        vec![
            RuntimeEvent::ChangeDetected {
                subscription: "styles-compiled".to_string(),
                path: "source/css/style.css".to_string(),
            },
            RuntimeEvent::ChangeDetected {
                subscription: "scripts".to_string(),
                path: "source/js/src/new.js".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn closed_runtime_channel_stops_forwarding() {
    let subs = subscriptions();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let event = Event::new(EventKind::Create(CreateKind::File))
        .add_path(Path::new("/site/source/js/src/a.js").to_path_buf());
    assert!(!process_event(Path::new("/site"), event, &subs, &tx).await);
}

#[test]
fn watch_roots_are_existing_deduplicated_bases() {
    let fixture = ProjectFixture::new();
    fixture.mkdir("source/js/src");
    let subs = build_subscriptions(&ConfigFileBuilder::new().build(), fixture.root()).unwrap();

    let roots = watch_roots(&subs, fixture.root());

    assert!(roots.contains(&fixture.path("source/js/src")));
    assert!(roots.contains(&fixture.path("source/css")));
    assert!(roots.contains(&fixture.path("styleguide/dist")));
    // `source/css/scss` is covered by `source/css`.
    assert!(!roots.contains(&fixture.path("source/css/scss")));
    for (i, a) in roots.iter().enumerate() {
        for b in &roots[i + 1..] {
            assert!(!b.starts_with(a) && !a.starts_with(b), "{a:?} / {b:?}");
        }
    }
}

#[tokio::test]
async fn real_watcher_reports_matching_writes() {
    init_tracing();
    let fixture = ProjectFixture::new();
    fixture.mkdir("source/js/src");
    let subs = build_subscriptions(&ConfigFileBuilder::new().build(), fixture.root()).unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let _handle = spawn_watcher(fixture.root(), subs, tx).unwrap();

    // Give the OS watcher a moment to register.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    fixture.write("source/js/src/app.js", "console.log(1);");

    let event = with_timeout(async {
        loop {
            match rx.recv().await {
                Some(RuntimeEvent::ChangeDetected { subscription, path }) if subscription == "scripts" => {
                    break path;
                }
                Some(_) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await;

    assert_eq!(event, "source/js/src/app.js");
}
