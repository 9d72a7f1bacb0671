//! Tests for client configuration resolution
//!
//! Priority order: CLI argument, `ANDORI_API_BASE_URL`, `API_BASE_URL`,
//! config file, compiled default. A missing or malformed config file
//! degrades to defaults instead of failing.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use andori_common::config::{
    load_toml_config, resolve_api_base_url, resolve_config_path, ClientConfig,
    API_BASE_URL_ENV, API_BASE_URL_FALLBACK_ENV, CONFIG_PATH_ENV, DEFAULT_API_BASE_URL,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(API_BASE_URL_ENV);
    env::remove_var(API_BASE_URL_FALLBACK_ENV);
    env::remove_var(CONFIG_PATH_ENV);
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_default_base_url() {
    clear_env();
    assert_eq!(resolve_api_base_url(None, None), DEFAULT_API_BASE_URL);
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env();
    env::set_var(API_BASE_URL_ENV, "http://env:8000");
    assert_eq!(resolve_api_base_url(Some("http://cli:8000/"), None), "http://cli:8000");
    clear_env();
}

#[test]
#[serial]
fn test_env_order() {
    clear_env();
    env::set_var(API_BASE_URL_FALLBACK_ENV, "http://shared:8080");
    assert_eq!(
        resolve_api_base_url(None, Some("http://toml:1")),
        "http://shared:8080"
    );

    env::set_var(API_BASE_URL_ENV, "http://andori:8000");
    assert_eq!(
        resolve_api_base_url(None, Some("http://toml:1")),
        "http://andori:8000"
    );
    clear_env();
}

#[test]
#[serial]
fn test_blank_env_is_ignored() {
    clear_env();
    env::set_var(API_BASE_URL_ENV, "   ");
    assert_eq!(resolve_api_base_url(None, Some("http://toml:1")), "http://toml:1");
    clear_env();
}

#[test]
#[serial]
fn test_load_from_config_file() {
    clear_env();
    let file = write_config(
        r#"
api_base_url = "http://escola.local:8000/"
request_timeout_secs = 10

[logging]
level = "debug"
"#,
    );

    let config = ClientConfig::load(None, Some(file.path()));
    assert_eq!(config.api_base_url, "http://escola.local:8000");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.log_level, "debug");
}

#[test]
#[serial]
fn test_config_path_from_env() {
    clear_env();
    let file = write_config("api_base_url = \"http://from-env-file:8000\"\n");
    env::set_var(CONFIG_PATH_ENV, file.path());

    assert_eq!(resolve_config_path(None).as_deref(), Some(file.path()));
    let config = ClientConfig::load(None, None);
    assert_eq!(config.api_base_url, "http://from-env-file:8000");
    clear_env();
}

#[test]
#[serial]
fn test_malformed_config_degrades_to_defaults() {
    clear_env();
    let file = write_config("api_base_url = [unterminated");

    assert!(load_toml_config(file.path()).is_err());
    let config = ClientConfig::load(None, Some(file.path()));
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_missing_config_degrades_to_defaults() {
    clear_env();
    let missing = Path::new("/nonexistent/andori/config.toml");

    assert!(load_toml_config(missing).is_err());
    let config = ClientConfig::load(None, Some(missing));
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}
