//! Credentials file loading tests
//!
//! A dedicated environment prefix keeps host variables out of these tests.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokenguard_config::{
    ConfigError, ExposeSecret, OAuth2ServiceConfiguration, Service, ServiceConfiguration,
};

const ENV_PREFIX: &str = "TOKENGUARD_CONFIG_LOADING_TEST";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write credentials file");
    path
}

fn load(path: &PathBuf, service: Service) -> Result<OAuth2ServiceConfiguration, ConfigError> {
    OAuth2ServiceConfiguration::from_file_with_prefix(path, service, ENV_PREFIX)
}

#[test]
fn test_load_json_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "credentials.json",
        r#"{
            "clientid": "sb-orders!t42",
            "clientsecret": "s3cr3t",
            "url": "https://tenant.auth.example.com",
            "uaadomain": "auth.example.com",
            "xsappname": "orders!t42",
            "verificationkey": null
        }"#,
    );

    let config = load(&path, Service::Xsuaa).unwrap();

    assert_eq!(config.service(), Service::Xsuaa);
    assert_eq!(config.client_id(), "sb-orders!t42");
    assert_eq!(
        config.client_secret().map(|s| s.expose_secret().clone()),
        Some("s3cr3t".to_string())
    );
    assert_eq!(config.domain(), Some("auth.example.com"));
    assert_eq!(config.property("xsappname"), Some("orders!t42"));
    assert!(!config.has_property("verificationkey"));
    assert!(!config.is_legacy_mode());
}

#[test]
fn test_load_toml_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "credentials.toml",
        r#"
clientid = "ias-client"
url = "https://tenant.accounts.example.com"
legacymode = true
"#,
    );

    let config = load(&path, Service::Ias).unwrap();

    assert_eq!(config.client_id(), "ias-client");
    assert_eq!(config.domain(), Some("tenant.accounts.example.com"));
    assert!(config.is_legacy_mode());
}

#[test]
fn test_load_yaml_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "credentials.yaml",
        "clientid: yaml-client\ndomain: accounts.example.com\n",
    );

    let config = load(&path, Service::Ias).unwrap();

    assert_eq!(config.client_id(), "yaml-client");
    assert_eq!(config.domain(), Some("accounts.example.com"));
    assert!(config.url().is_none());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load(&path, Service::Xsuaa).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
}

#[test]
fn test_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "credentials.ini", "clientid=app");

    let err = load(&path, Service::Xsuaa).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat));
}

#[test]
fn test_missing_client_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "credentials.json",
        r#"{ "url": "https://tenant.auth.example.com" }"#,
    );

    let err = load(&path, Service::Xsuaa).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField("clientid")));
}

#[test]
fn test_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "credentials.json", "{ not json");

    let err = load(&path, Service::Xsuaa).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_environment_overrides_file_values() {
    const PREFIX: &str = "TOKENGUARD_ENV_OVERRIDE_TEST";

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "credentials.json",
        r#"{ "clientid": "file-id", "xsappname": "orders" }"#,
    );

    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var(format!("{PREFIX}_CLIENTID"), "env-id");
    }

    let config = OAuth2ServiceConfiguration::from_file_with_prefix(&path, Service::Xsuaa, PREFIX)
        .unwrap();

    assert_eq!(config.client_id(), "env-id");
    assert_eq!(config.property("clientid"), Some("env-id"));
    assert_eq!(config.property("xsappname"), Some("orders"));
}
