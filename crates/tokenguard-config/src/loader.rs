//! Loading service configurations from credential files
//!
//! A credentials file holds the binding as a flat map, for example:
//!
//! ```json
//! {
//!   "clientid": "sb-orders!t42",
//!   "clientsecret": "s3cr3t",
//!   "url": "https://tenant.auth.example.com",
//!   "uaadomain": "auth.example.com"
//! }
//! ```
//!
//! Environment variables override file values (`TOKENGUARD_CLIENTID=...`). The prefix is
//! joined with a single underscore; `__` separates nested keys.

use std::collections::BTreeMap;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{ConfigError, ConfigResult, OAuth2ServiceConfiguration, Service};

/// Environment variable prefix used by [`OAuth2ServiceConfiguration::from_file`]
pub const DEFAULT_ENV_PREFIX: &str = "TOKENGUARD";

impl OAuth2ServiceConfiguration {
    /// Load a configuration from a credentials file (TOML, YAML, or JSON)
    ///
    /// Variables with the [`DEFAULT_ENV_PREFIX`] prefix override file settings.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tokenguard_config::{OAuth2ServiceConfiguration, Service};
    ///
    /// let config = OAuth2ServiceConfiguration::from_file("credentials.json", Service::Xsuaa)
    ///     .expect("Failed to load credentials");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The file format is unsupported
    /// - The file contains an unusable binding
    pub fn from_file(path: impl AsRef<Path>, service: Service) -> ConfigResult<Self> {
        Self::from_file_with_prefix(path, service, DEFAULT_ENV_PREFIX)
    }

    /// Load a configuration from a credentials file with a custom environment prefix
    ///
    /// # Errors
    ///
    /// Same as [`OAuth2ServiceConfiguration::from_file`].
    pub fn from_file_with_prefix(
        path: impl AsRef<Path>,
        service: Service,
        env_prefix: &str,
    ) -> ConfigResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let format = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => return Err(ConfigError::UnsupportedFormat),
        };

        let source = Config::builder()
            .add_source(File::new(
                path.to_str().ok_or(ConfigError::UnsupportedFormat)?,
                format,
            ))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let raw: BTreeMap<String, Value> = source.try_deserialize()?;
        debug!(
            path = %path.display(),
            service = %service,
            keys = raw.len(),
            "Loaded service credentials"
        );

        Self::from_properties(service, flatten_scalars(raw))
    }
}

/// Coerce scalar credential values to strings, dropping nested values
fn flatten_scalars(raw: BTreeMap<String, Value>) -> BTreeMap<String, String> {
    raw.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            Value::Bool(b) => Some((key, b.to_string())),
            Value::Number(n) => Some((key, n.to_string())),
            Value::Null => None,
            Value::Array(_) | Value::Object(_) => {
                warn!(key = %key, "Ignoring non-scalar credential property");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_scalars() {
        let raw = BTreeMap::from([
            ("clientid".to_string(), json!("app")),
            ("legacymode".to_string(), json!(true)),
            ("port".to_string(), json!(8443)),
            ("unset".to_string(), Value::Null),
            ("tags".to_string(), json!(["a", "b"])),
        ]);

        let flat = flatten_scalars(raw);

        assert_eq!(flat.get("clientid").map(String::as_str), Some("app"));
        assert_eq!(flat.get("legacymode").map(String::as_str), Some("true"));
        assert_eq!(flat.get("port").map(String::as_str), Some("8443"));
        assert!(!flat.contains_key("unset"));
        assert!(!flat.contains_key("tags"));
    }
}
