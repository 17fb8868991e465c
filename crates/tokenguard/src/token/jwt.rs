use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Header, decode_header};
use serde_json::{Map, Value};
use thiserror::Error;
use tokenguard_config::Service;

use super::Token;

/// Errors raised while decoding an encoded JWT
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// Not three dot separated segments
    #[error("Invalid JWT format")]
    InvalidFormat,

    /// Header or payload segment could not be decoded
    #[error("Failed to decode token: {0}")]
    Decode(String),

    /// Payload is not a JSON object of claims
    #[error("Invalid JWT claims: {0}")]
    InvalidClaims(String),
}

/// Access token backed by a decoded JWT payload
///
/// # Security
///
/// [`JwtToken::parse`] does **not** verify the signature, issuer or expiry. Only hand tokens
/// to validators after the surrounding pipeline has checked them, or alongside validators
/// that do.
#[derive(Clone)]
pub struct JwtToken {
    service: Service,
    header: Option<Header>,
    encoded: Option<String>,
    claims: Map<String, Value>,
}

// Manual Debug impl keeps the bearer value out of logs
impl std::fmt::Debug for JwtToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtToken")
            .field("service", &self.service)
            .field("header", &self.header)
            .field("encoded", &self.encoded.as_ref().map(|_| "<redacted>"))
            .field("claims", &self.claims)
            .finish()
    }
}

impl JwtToken {
    /// Create a token from already decoded claims
    pub fn from_claims(service: Service, claims: Map<String, Value>) -> Self {
        Self {
            service,
            header: None,
            encoded: None,
            claims,
        }
    }

    /// Decode an encoded JWT without verifying it
    ///
    /// A leading `Bearer ` prefix is accepted.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The value does not have three segments
    /// - The header is not a valid JOSE header
    /// - The payload is not base64url encoded JSON object
    pub fn parse(encoded: &str, service: Service) -> Result<Self, TokenError> {
        let encoded = encoded.trim();
        let encoded = encoded.strip_prefix("Bearer ").unwrap_or(encoded).trim();

        let parts: Vec<&str> = encoded.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::InvalidFormat);
        }

        let header = decode_header(encoded)
            .map_err(|e| TokenError::Decode(format!("invalid header: {e}")))?;

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| TokenError::Decode(format!("invalid payload encoding: {e}")))?;

        let claims = match serde_json::from_slice::<Value>(&payload) {
            Ok(Value::Object(claims)) => claims,
            Ok(_) => {
                return Err(TokenError::InvalidClaims(
                    "payload is not a JSON object".to_string(),
                ));
            }
            Err(e) => return Err(TokenError::InvalidClaims(e.to_string())),
        };

        Ok(Self {
            service,
            header: Some(header),
            encoded: Some(encoded.to_string()),
            claims,
        })
    }

    /// JOSE header, present for parsed tokens
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Encoded form, present for parsed tokens
    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    /// All claims of the payload
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name).filter(|value| !value.is_null())
    }
}

impl Token for JwtToken {
    fn service(&self) -> Service {
        self.service
    }

    fn has_claim(&self, name: &str) -> bool {
        self.claim(name).is_some()
    }

    fn claim_as_string(&self, name: &str) -> Option<String> {
        self.claim(name).and_then(Value::as_str).map(str::to_string)
    }

    fn claim_as_string_list(&self, name: &str) -> Vec<String> {
        match self.claim(name) {
            Some(Value::String(value)) => vec![value.clone()],
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}
