// tests/config_loading.rs

use std::fs;

use labrun::config::{ConfigFile, load_and_validate, load_from_path};
use labrun::errors::LabrunError;
use labrun_test_utils::builders::ConfigFileBuilder;

const MINIMAL_JSON: &str = r#"{
  "cacheBust": true,
  "paths": {
    "source": {
      "root": "./source/",
      "patterns": "./source/_patterns/",
      "data": "./source/_data/",
      "meta": "./source/_meta/",
      "annotations": "./source/_annotations/",
      "styleguide": "./node_modules/styleguidekit-assets-default/dist/",
      "js": "./source/js",
      "images": "./source/images",
      "fonts": "./source/fonts",
      "css": "./source/css/"
    },
    "public": {
      "root": "./public/",
      "styleguide": "./public/styleguide/",
      "js": "./public/js",
      "images": "./public/images",
      "fonts": "./public/fonts",
      "css": "./public/css"
    }
  },
  "cleanPublic": true
}"#;

#[test]
fn json_config_gets_runner_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patternlab-config.json");
    fs::write(&path, MINIMAL_JSON).unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert!(cfg.clean_public());
    assert_eq!(cfg.source().css, "./source/css/");
    assert_eq!(cfg.public().styleguide, "./public/styleguide/");
    assert_eq!(cfg.runner().styles.compiler, vec!["sass"]);
    assert_eq!(cfg.runner().styles.entries, "scss/*.scss");
    assert_eq!(cfg.runner().watch.await_write_finish_ms, 2000);
    assert_eq!(cfg.runner().server.port, 3000);
    assert_eq!(cfg.runner().generator.command, vec!["patternlab"]);
    assert_eq!(cfg.source_path(), path.as_path());
}

#[test]
fn runner_section_overrides_defaults() {
    let json = MINIMAL_JSON.replace(
        "\"cleanPublic\": true",
        r#""cleanPublic": false,
  "runner": {
    "server": { "port": 8080 },
    "watch": { "awaitWriteFinishMs": 300, "templateExtensions": [".mustache", ".twig"] },
    "sprite": { "classPrefix": "icon-" }
  }"#,
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patternlab-config.json");
    fs::write(&path, json).unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert!(!cfg.clean_public());
    assert_eq!(cfg.runner().server.port, 8080);
    assert_eq!(cfg.runner().server.host, "127.0.0.1");
    assert_eq!(cfg.runner().watch.await_write_finish_ms, 300);
    assert_eq!(cfg.runner().watch.template_extensions, vec![".mustache", ".twig"]);
    assert_eq!(cfg.runner().sprite.class_prefix, "icon-");
    assert_eq!(cfg.runner().sprite.padding, 1);
}

#[test]
fn toml_is_selected_by_extension() {
    let toml = r#"
cleanPublic = false

[paths.source]
root = "./source/"
patterns = "./source/_patterns/"
data = "./source/_data/"
meta = "./source/_meta/"
annotations = "./source/_annotations/"
styleguide = "./styleguide/"
js = "./source/js"
images = "./source/images"
fonts = "./source/fonts"
css = "./source/css/"

[paths.public]
root = "./public/"
styleguide = "./public/styleguide/"
js = "./public/js"
images = "./public/images"
fonts = "./public/fonts"
css = "./public/css"

[runner.styles]
browsers = ["Safari >= 8"]
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labrun.toml");
    fs::write(&path, toml).unwrap();

    let raw = load_from_path(&path).unwrap();
    assert_eq!(raw.runner.styles.browsers, vec!["Safari >= 8"]);
    assert_eq!(raw.paths.source.styleguide, "./styleguide/");
}

#[test]
fn missing_paths_section_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patternlab-config.json");
    fs::write(&path, r#"{ "cleanPublic": true }"#).unwrap();

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, LabrunError::JsonError(_)), "got {err:?}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_and_validate("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, LabrunError::IoError(_)), "got {err:?}");
}

#[test]
fn empty_path_is_rejected() {
    let mut raw = ConfigFileBuilder::new().raw();
    raw.paths.public.css = "  ".to_string();

    match ConfigFile::try_from(raw).unwrap_err() {
        LabrunError::ConfigError(msg) => assert!(msg.contains("paths.public.css"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unknown_browser_query_is_rejected() {
    let raw = ConfigFileBuilder::new().browsers(&["Netscape >= 4"]).raw();
    match ConfigFile::try_from(raw).unwrap_err() {
        LabrunError::ConfigError(msg) => assert!(msg.contains("runner.styles.browsers"), "{msg}"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn browserslist_queries_beyond_minimum_versions_are_accepted() {
    let raw = ConfigFileBuilder::new()
        .browsers(&["last 2 versions", "> 1%", "not dead"])
        .raw();
    assert!(ConfigFile::try_from(raw).is_ok());
}

#[test]
fn zero_settle_and_bad_extensions_are_rejected() {
    let raw = ConfigFileBuilder::new().settle_ms(0).raw();
    assert!(ConfigFile::try_from(raw).is_err());

    let mut raw = ConfigFileBuilder::new().raw();
    raw.runner.watch.template_extensions = vec!["mustache".to_string()];
    assert!(ConfigFile::try_from(raw).is_err());
}

#[test]
fn empty_generator_command_is_rejected() {
    let raw = ConfigFileBuilder::new().generator_command(&[]).raw();
    match ConfigFile::try_from(raw).unwrap_err() {
        LabrunError::ConfigError(msg) => assert!(msg.contains("runner.generator.command")),
        other => panic!("unexpected error {other:?}"),
    }
}
