//! Service configuration contract
//!
//! [`ServiceConfiguration`] is the read-only view validators depend on. It carries no
//! validation logic of its own; [`OAuth2ServiceConfiguration`] is the concrete implementation
//! produced by [`OAuth2ServiceConfigurationBuilder`] or by the file [`loader`](crate::loader).

use std::collections::BTreeMap;

use secrecy::SecretString;
use url::Url;

use crate::{ConfigError, ConfigResult, Service};

/// Well-known credential keys of an identity service binding
pub mod keys {
    /// OAuth2 client id
    pub const CLIENT_ID: &str = "clientid";
    /// OAuth2 client secret
    pub const CLIENT_SECRET: &str = "clientsecret";
    /// Base URL of the tenant the service instance was created in
    pub const URL: &str = "url";
    /// Domain key used by XSUAA bindings
    pub const UAA_DOMAIN: &str = "uaadomain";
    /// Domain key used by IAS bindings
    pub const DOMAIN: &str = "domain";
    /// Legacy claim semantics flag
    pub const LEGACY_MODE: &str = "legacymode";
}

/// Information about the identity service instance an application is bound to
///
/// Unknown properties resolve to `None` instead of failing.
pub trait ServiceConfiguration: Send + Sync {
    /// Client id of the identity service instance, never blank
    fn client_id(&self) -> &str;

    /// Client secret, absent for certificate based bindings
    fn client_secret(&self) -> Option<&SecretString>;

    /// Base URL of the identity service tenant, e.g. `https://paastenant.idservice.com`
    fn url(&self) -> Option<&Url>;

    /// Host-only domain of the identity service, e.g. `idservice.com`
    fn domain(&self) -> Option<&str>;

    /// Value of a raw binding property
    fn property(&self, name: &str) -> Option<&str>;

    /// All raw binding properties
    fn properties(&self) -> &BTreeMap<String, String>;

    /// Whether the binding contains the given property
    fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Identity service flavour of this binding
    fn service(&self) -> Service;

    /// Whether an XSUAA binding runs in legacy mode
    fn is_legacy_mode(&self) -> bool;
}

/// Immutable OAuth2 service configuration
#[derive(Debug, Clone)]
pub struct OAuth2ServiceConfiguration {
    service: Service,
    client_id: String,
    client_secret: Option<SecretString>,
    url: Option<Url>,
    domain: Option<String>,
    properties: BTreeMap<String, String>,
    legacy_mode: bool,
}

impl OAuth2ServiceConfiguration {
    /// Start building a configuration for the given service
    pub fn builder(service: Service) -> OAuth2ServiceConfigurationBuilder {
        OAuth2ServiceConfigurationBuilder::new(service)
    }

    /// Build a configuration from raw binding properties
    ///
    /// The well-known [`keys`] populate the typed fields. Every other property, known or not,
    /// stays reachable through [`ServiceConfiguration::property`]; the client secret is moved
    /// into its redacted field and removed from the raw properties.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] without a client id and
    /// [`ConfigError::InvalidField`] for a malformed url, domain or legacy flag.
    pub fn from_properties(
        service: Service,
        mut properties: BTreeMap<String, String>,
    ) -> ConfigResult<Self> {
        let mut builder = Self::builder(service);

        if let Some(client_id) = properties.get(keys::CLIENT_ID) {
            builder = builder.client_id(client_id.as_str());
        }
        if let Some(secret) = properties.remove(keys::CLIENT_SECRET) {
            builder = builder.client_secret(secret);
        }
        if let Some(url) = properties.get(keys::URL) {
            builder = builder.url(url.as_str());
        }
        if let Some(domain) = properties
            .get(keys::UAA_DOMAIN)
            .or_else(|| properties.get(keys::DOMAIN))
        {
            builder = builder.domain(domain.as_str());
        }
        if let Some(flag) = properties.get(keys::LEGACY_MODE) {
            builder = builder.legacy_mode(parse_flag(keys::LEGACY_MODE, flag)?);
        }

        builder.properties(properties).build()
    }
}

impl ServiceConfiguration for OAuth2ServiceConfiguration {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_secret(&self) -> Option<&SecretString> {
        self.client_secret.as_ref()
    }

    fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    fn service(&self) -> Service {
        self.service
    }

    fn is_legacy_mode(&self) -> bool {
        self.legacy_mode
    }
}

/// Builder for [`OAuth2ServiceConfiguration`]
#[derive(Debug)]
pub struct OAuth2ServiceConfigurationBuilder {
    service: Service,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    url: Option<String>,
    domain: Option<String>,
    properties: BTreeMap<String, String>,
    legacy_mode: bool,
}

impl OAuth2ServiceConfigurationBuilder {
    /// Create an empty builder for the given service
    pub fn new(service: Service) -> Self {
        Self {
            service,
            client_id: None,
            client_secret: None,
            url: None,
            domain: None,
            properties: BTreeMap::new(),
            legacy_mode: false,
        }
    }

    /// Set the OAuth2 client id
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth2 client secret
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Set the tenant base URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the identity service domain (defaults to the host of the url)
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Add a single raw property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add raw properties
    pub fn properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Mark the binding as running in legacy mode
    pub fn legacy_mode(mut self, legacy_mode: bool) -> Self {
        self.legacy_mode = legacy_mode;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] if the client id is absent or blank
    /// - [`ConfigError::InvalidField`] if the url is not absolute or the domain is not a bare host
    pub fn build(self) -> ConfigResult<OAuth2ServiceConfiguration> {
        let client_id = self
            .client_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingField(keys::CLIENT_ID))?;

        let url = self.url.as_deref().map(parse_base_url).transpose()?;

        let domain = match self.domain {
            Some(domain) => Some(validate_domain(domain)?),
            None => url.as_ref().and_then(Url::host_str).map(str::to_string),
        };

        Ok(OAuth2ServiceConfiguration {
            service: self.service,
            client_id,
            client_secret: self.client_secret,
            url,
            domain,
            properties: self.properties,
            legacy_mode: self.legacy_mode,
        })
    }
}

fn parse_base_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidField {
        field: keys::URL,
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidField {
            field: keys::URL,
            reason: format!("'{raw}' is not an absolute URL with a host"),
        });
    }

    Ok(url)
}

fn validate_domain(domain: String) -> ConfigResult<String> {
    let domain = domain.trim().to_string();
    if domain.is_empty() || domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::InvalidField {
            field: keys::DOMAIN,
            reason: format!("'{domain}' is not a host-only domain"),
        });
    }
    Ok(domain)
}

fn parse_flag(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(ConfigError::InvalidField {
            field,
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}
