//! # tokenguard-config - Identity Service Binding Configuration
//!
//! Read-only description of the OAuth2 client registration an application holds with its
//! identity service. Token validators consume it to learn which client ids they trust.
//!
//! ## Architecture
//!
//! - [`service`] - Identity service flavours ([`Service`])
//! - [`configuration`] - The [`ServiceConfiguration`] contract and its concrete
//!   [`OAuth2ServiceConfiguration`] with builder
//! - [`loader`] - Loading credentials from files with environment overrides
//! - [`error`] - [`ConfigError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tokenguard_config::{OAuth2ServiceConfiguration, Service, ServiceConfiguration};
//!
//! let config = OAuth2ServiceConfiguration::builder(Service::Xsuaa)
//!     .client_id("sb-orders!t42")
//!     .client_secret("s3cr3t")
//!     .url("https://tenant.auth.example.com")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.client_id(), "sb-orders!t42");
//! assert_eq!(config.domain(), Some("tenant.auth.example.com"));
//! ```

pub mod configuration;
pub mod error;
pub mod loader;
pub mod service;

#[doc(inline)]
pub use configuration::{
    OAuth2ServiceConfiguration, OAuth2ServiceConfigurationBuilder, ServiceConfiguration, keys,
};
#[doc(inline)]
pub use error::{ConfigError, ConfigResult};
#[doc(inline)]
pub use loader::DEFAULT_ENV_PREFIX;
#[doc(inline)]
pub use service::Service;

pub use secrecy::{ExposeSecret, SecretString};
