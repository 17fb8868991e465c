//! # tokenguard - Audience Trust Validation for JWT Access Tokens
//!
//! Decides whether an incoming access token was minted for the application receiving it.
//! A false "valid" allows cross-tenant or cross-application token replay, so the rules are
//! small, deterministic and side-effect free.
//!
//! ## Architecture
//!
//! - [`token`] - The [`Token`] abstraction and [`JwtToken`]
//! - [`validation`] - [`Validator`], [`ValidationResult`] and the [`AudienceValidator`]
//! - [`error`] - Fatal configuration and decoding errors
//!
//! Service configurations come from [`tokenguard_config`], re-exported as [`config`].
//!
//! ## Scope
//!
//! Signature, issuer and expiry checks are not performed here. The surrounding pipeline runs
//! them and combines their verdicts with this one.
//!
//! ## Quick Start
//!
//! ```rust
//! use tokenguard::config::{OAuth2ServiceConfiguration, Service};
//! use tokenguard::{AudienceValidator, JwtToken};
//!
//! let binding = OAuth2ServiceConfiguration::builder(Service::Xsuaa)
//!     .client_id("sb-orders!t42")
//!     .build()?;
//!
//! let validator = AudienceValidator::builder()
//!     .configuration(&binding)
//!     .build()?;
//!
//! let claims = serde_json::json!({ "scope": ["sb-orders!t42.Display"] });
//! let token = JwtToken::from_claims(Service::Xsuaa, claims.as_object().cloned().unwrap_or_default());
//!
//! validator.validate(&token).into_result()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod token;
pub mod validation;

pub use tokenguard_config as config;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use token::{JwtToken, Token, TokenError};
#[doc(inline)]
pub use validation::{
    AudienceMatcher, AudienceValidator, AudienceValidatorBuilder, TrustedClientIds,
    ValidationFailure, ValidationResult, Validator,
};

pub use tokenguard_config::Service;
