// tests/config_loading.rs

use std::io::Write;
use tempfile::NamedTempFile;
use watchmux::config::{load_and_validate, load_or_default, WatchSettings};
use watchmux::errors::WatchmuxError;
use watchmux_test_utils::builders::ConfigFileBuilder;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_uses_package_json_marker() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.watch, WatchSettings::default());
    assert_eq!(cfg.watch.project_markers, vec!["package.json"]);
    assert_eq!(cfg.watch.case_sensitive, None);
}

#[test]
fn watch_section_overrides_defaults() {
    let file = config_file(
        r#"
[watch]
project_markers = ["Cargo.toml", "package.json"]
case_sensitive = false
"#,
    );
    let cfg = load_and_validate(file.path()).unwrap();
    let expected = ConfigFileBuilder::new()
        .with_marker("Cargo.toml")
        .with_marker("package.json")
        .case_sensitive(false)
        .build();
    assert_eq!(cfg, expected);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("Watchmux.toml")).unwrap();
    assert_eq!(cfg.watch, WatchSettings::default());
}

#[test]
fn empty_marker_list_returns_config_error() {
    let file = config_file("[watch]\nproject_markers = []\n");
    match load_and_validate(file.path()) {
        Err(WatchmuxError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn marker_with_separator_returns_config_error() {
    let file = config_file("[watch]\nproject_markers = [\"sub/package.json\"]\n");
    match load_and_validate(file.path()) {
        Err(WatchmuxError::ConfigError(msg)) => {
            assert!(msg.contains("bare file name"));
            assert!(msg.contains("sub/package.json"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_keys_return_toml_error() {
    let file = config_file("[watch]\nmarkers = [\"package.json\"]\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(WatchmuxError::TomlError(_))
    ));
}
