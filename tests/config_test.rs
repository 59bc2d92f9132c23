// tests/config_test.rs
use nuget_autoversion::config::{load_config, Config, CONFIG_FILE_NAME};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_explicit_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[feed]
address = "https://nuget.pkg.github.com/acme/index.json"
package_id = "Acme.Widgets"
timeout_secs = 30

[git]
marker_prefix = "autoversion-"
lookback = 25

[publish]
should_publish = true
output_dir = "artifacts"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path()), Path::new(".")).unwrap();
    assert_eq!(
        config.feed.address.as_deref(),
        Some("https://nuget.pkg.github.com/acme/index.json")
    );
    assert_eq!(config.feed.package_id.as_deref(), Some("Acme.Widgets"));
    assert_eq!(config.feed.timeout_secs, Some(30));
    assert_eq!(config.git.marker_prefix, "autoversion-");
    assert_eq!(config.git.lookback, 25);
    assert_eq!(config.git.remote, "origin");
    assert!(config.publish.should_publish);
    assert!(!config.publish.skip_compile_step);
    assert_eq!(config.publish.output_dir, PathBuf::from("artifacts"));
}

#[test]
fn test_load_from_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[feed]\npackage_id = \"From.WorkDir\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.feed.package_id.as_deref(), Some("From.WorkDir"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_invalid_toml_is_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[git]\nlookback = \"many\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path()), Path::new(".")).unwrap_err();
    assert!(err.to_string().contains("Invalid"));
}

#[test]
fn test_fixture_with_publish_section() {
    let config = load_config(
        Some(Path::new("tests/fixtures/autoversion.toml")),
        Path::new("."),
    )
    .expect("Failed to load test config");

    assert!(config.publish.should_publish);
    assert!(config.publish.skip_compile_step);
    assert_eq!(config.publish.configuration, "Debug");
    assert_eq!(config, {
        let mut expected = Config::default();
        expected.feed.package_id = Some("Acme.Widgets".to_string());
        expected.publish.should_publish = true;
        expected.publish.skip_compile_step = true;
        expected.publish.configuration = "Debug".to_string();
        expected
    });
}
