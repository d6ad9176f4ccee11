// tests/copy_tasks.rs

use labrun::errors::LabrunError;
use labrun::server::ReloadEvent;
use labrun::tasks::AssetClass;
use labrun::tasks::copy::run_copy;
use labrun_test_utils::builders::{ConfigFileBuilder, ProjectFixture};
use labrun_test_utils::fakes::{FakeGenerator, FakeStyleCompiler};
use labrun_test_utils::init_tracing;

fn context(fixture: &ProjectFixture) -> labrun::tasks::TaskContext {
    fixture.context(
        ConfigFileBuilder::new().build(),
        FakeGenerator::new(),
        FakeStyleCompiler::new(),
    )
}

#[tokio::test]
async fn scripts_keep_their_directory_structure() {
    init_tracing();
    let fixture = ProjectFixture::new();
    fixture.write("source/js/app.js", "app");
    fixture.write("source/js/src/nav/menu.js", "menu");
    fixture.write("source/js/notes.txt", "skip");

    let ctx = context(&fixture);
    let written = run_copy(&ctx, AssetClass::Js).await.unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(fixture.read("public/js/app.js"), "app");
    assert_eq!(fixture.read("public/js/src/nav/menu.js"), "menu");
    assert!(!fixture.exists("public/js/notes.txt"));
}

#[tokio::test]
async fn favicon_is_copied_to_public_root() {
    let fixture = ProjectFixture::new();
    fixture.write("source/favicon.ico", "ico");

    let ctx = context(&fixture);
    run_copy(&ctx, AssetClass::Favicon).await.unwrap();

    assert_eq!(fixture.read("public/favicon.ico"), "ico");
}

#[tokio::test]
async fn missing_favicon_is_source_not_found() {
    let fixture = ProjectFixture::new();
    let ctx = context(&fixture);

    let err = run_copy(&ctx, AssetClass::Favicon).await.unwrap_err();
    assert!(matches!(err, LabrunError::SourceNotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_source_directory_is_source_not_found() {
    let fixture = ProjectFixture::new();
    std::fs::remove_dir_all(fixture.path("source/fonts")).unwrap();
    let ctx = context(&fixture);

    let err = run_copy(&ctx, AssetClass::Fonts).await.unwrap_err();
    assert!(matches!(err, LabrunError::SourceNotFound(_)));
}

#[tokio::test]
async fn empty_wildcard_copy_succeeds() {
    let fixture = ProjectFixture::new();
    let ctx = context(&fixture);

    let written = run_copy(&ctx, AssetClass::Images).await.unwrap();
    assert!(written.is_empty());
}

#[tokio::test]
async fn fonts_copy_top_level_only() {
    let fixture = ProjectFixture::new();
    fixture.write("source/fonts/open-sans.woff2", "font");
    fixture.write("source/fonts/license/OFL.txt", "license");

    let ctx = context(&fixture);
    run_copy(&ctx, AssetClass::Fonts).await.unwrap();

    assert!(fixture.exists("public/fonts/open-sans.woff2"));
    assert!(!fixture.exists("public/fonts/license/OFL.txt"));
}

#[tokio::test]
async fn styleguide_css_is_split_out_and_flattened() {
    let fixture = ProjectFixture::new();
    fixture.write("styleguide/dist/index.html", "<html></html>");
    fixture.write("styleguide/dist/js/patternlab-viewer.js", "viewer");
    fixture.write("styleguide/dist/styleguide/css/styleguide.css", "body{}");
    fixture.write("styleguide/dist/styleguide/css/custom/pattern-scaffolding.css", "a{}");

    let ctx = context(&fixture);
    run_copy(&ctx, AssetClass::Styleguide).await.unwrap();
    run_copy(&ctx, AssetClass::StyleguideCss).await.unwrap();

    assert!(fixture.exists("public/index.html"));
    assert!(fixture.exists("public/js/patternlab-viewer.js"));
    assert!(!fixture.exists("public/styleguide/css/custom/pattern-scaffolding.css"));
    assert!(fixture.exists("public/styleguide/css/styleguide.css"));
    assert!(fixture.exists("public/styleguide/css/pattern-scaffolding.css"));
}

#[tokio::test]
async fn compiled_css_copy_notifies_clients_with_file_names() {
    let fixture = ProjectFixture::new();
    fixture.write("source/css/style.css", "body{}");
    fixture.write("source/css/scss/style.scss", "body{}");

    let ctx = context(&fixture);
    let mut events = ctx.reload_hub().subscribe();

    run_copy(&ctx, AssetClass::Css).await.unwrap();

    assert!(fixture.exists("public/css/style.css"));
    assert!(!fixture.exists("public/css/scss/style.scss"));
    assert_eq!(
        events.try_recv().unwrap(),
        ReloadEvent::Css(vec!["style.css".to_string()])
    );
}

#[tokio::test]
async fn script_copy_does_not_notify() {
    let fixture = ProjectFixture::new();
    fixture.write("source/js/app.js", "app");

    let ctx = context(&fixture);
    let mut events = ctx.reload_hub().subscribe();
    run_copy(&ctx, AssetClass::Js).await.unwrap();

    assert!(events.try_recv().is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn styleguide_copy_does_not_follow_a_symlink_loop() {
    let fixture = ProjectFixture::new();
    fixture.write("styleguide/dist/js/viewer.js", "viewer");
    std::os::unix::fs::symlink(
        fixture.path("styleguide/dist"),
        fixture.path("styleguide/dist/loop"),
    )
    .unwrap();

    let written = run_copy(&context(&fixture), AssetClass::Styleguide)
        .await
        .unwrap();

    assert_eq!(written, vec![fixture.path("public/js/viewer.js")]);
    assert!(!fixture.exists("public/loop"));
}
