//! Unit tests for configuration module

use household_api::config::Settings;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.session.cookie_name, "sid");
    assert_eq!(settings.session.ttl_secs, 86400);
    assert!(settings.rate_limit.enabled);
    assert_eq!(settings.rate_limit.requests_per_second, 5);
    assert_eq!(settings.rate_limit.burst_size, 10);
    assert!(!settings.upload.enabled);
    assert_eq!(settings.upload.allowed_formats, vec!["jpg", "png", "pdf"]);
    assert_eq!(settings.chores.rollover_interval_secs, 0);
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_rate_limit() {
    let mut settings = Settings::default();
    settings.rate_limit.burst_size = 0;
    assert!(settings.validate().is_err());

    settings.rate_limit.enabled = false;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_validation_upload_needs_credentials() {
    let mut settings = Settings::default();
    settings.upload.enabled = true;
    assert!(settings.validate().is_err());

    settings.upload.cloud_name = "demo".to_string();
    assert!(settings.validate().is_err());

    settings.upload.upload_preset = "pad_notes".to_string();
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_from_yaml_file() {
    let file = write_config(
        ".yaml",
        r#"
database:
  url: "sqlite::memory:"
session:
  ttl_secs: 600
logging:
  format: pretty
chores:
  rollover_interval_secs: 3600
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.database.url, "sqlite::memory:");
    assert_eq!(settings.session.ttl_secs, 600);
    assert_eq!(settings.session.cookie_name, "sid");
    assert_eq!(settings.logging.format, "pretty");
    assert_eq!(settings.chores.rollover_interval_secs, 3600);
}

#[test]
fn test_load_from_toml_file() {
    let file = write_config(
        ".toml",
        r#"
[session]
cookie_name = "household_sid"

[auth]
password_iterations = 3
"#,
    );

    let settings = Settings::load_from_path(file.path()).unwrap();

    assert_eq!(settings.session.cookie_name, "household_sid");
    assert_eq!(settings.auth.password_iterations, 3);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = write_config(
        ".yaml",
        r#"
session:
  ttl_secs: 0
"#,
    );

    let result = Settings::load_from_path(file.path());

    assert!(result.is_err());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let settings = Settings::load_from_path("does/not/exist.yaml").unwrap();
    assert_eq!(settings.session.cookie_name, "sid");
}

#[test]
fn test_environment_overrides() {
    std::env::set_var("HOUSEHOLD__SERVER__PORT", "9191");
    std::env::set_var("HOUSEHOLD__UPLOAD__ALLOWED_FORMATS", "png,pdf");

    let settings = Settings::load_from_path("does/not/exist.yaml");

    std::env::remove_var("HOUSEHOLD__SERVER__PORT");
    std::env::remove_var("HOUSEHOLD__UPLOAD__ALLOWED_FORMATS");

    let settings = settings.unwrap();
    assert_eq!(settings.server.port, 9191);
    assert_eq!(settings.upload.allowed_formats, vec!["png", "pdf"]);
}
