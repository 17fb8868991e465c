//! Token abstraction consumed by validators
//!
//! Validators only read claims; they never decode or verify tokens themselves. Anything that
//! implements [`Token`] can be validated, [`JwtToken`] is the implementation over a decoded
//! JWT payload.

mod jwt;

pub use jwt::{JwtToken, TokenError};

use tokenguard_config::Service;

/// Claim names used by the validators
pub mod claims {
    /// Audience (aud) - identifies the recipients
    pub const AUDIENCE: &str = "aud";
    /// Authorized party (azp) - the client the token was issued to
    pub const AUTHORIZED_PARTY: &str = "azp";
    /// Issuer (iss)
    pub const ISSUER: &str = "iss";
    /// Subject (sub)
    pub const SUBJECT: &str = "sub";
    /// Expiration Time (exp)
    pub const EXPIRATION: &str = "exp";
    /// Client id of the token requester in XSUAA tokens
    pub const XSUAA_CLIENT_ID: &str = "cid";
    /// Granted scopes in XSUAA tokens
    pub const XSUAA_SCOPES: &str = "scope";
}

/// Read-only view of an already decoded access token
///
/// Implementations treat claims as well-formed: a claim that is absent or of an unexpected
/// type reads as `None` or as an empty list.
pub trait Token {
    /// Identity service that issued the token
    fn service(&self) -> Service;

    /// Whether the token carries a non-null claim with this name
    fn has_claim(&self, name: &str) -> bool;

    /// Claim value as a string
    fn claim_as_string(&self, name: &str) -> Option<String>;

    /// Claim value as an ordered list of strings
    ///
    /// A single string claim reads as a one-element list.
    fn claim_as_string_list(&self, name: &str) -> Vec<String>;

    /// Declared audiences in token order
    fn audiences(&self) -> Vec<String> {
        self.claim_as_string_list(claims::AUDIENCE)
    }
}
