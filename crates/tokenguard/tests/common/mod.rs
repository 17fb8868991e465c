//! Common test utilities for integration tests
//!
//! Builders for decoded tokens, real encoded JWTs, and a minimal custom [`Token`].

#![allow(dead_code)]

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tokenguard::{JwtToken, Service, Token};

/// Signing key for HS256 test tokens (signatures are never verified by tokenguard)
const TEST_SIGNING_KEY: &[u8] = b"test_secret_key_at_least_32_bytes_long_12345678";

/// Decoded XSUAA token with the given claims
pub fn xsuaa_token(claims: Value) -> JwtToken {
    JwtToken::from_claims(Service::Xsuaa, into_object(claims))
}

/// Decoded IAS token with the given claims
pub fn ias_token(claims: Value) -> JwtToken {
    JwtToken::from_claims(Service::Ias, into_object(claims))
}

/// Encode claims as a signed JWT
pub fn encode_token(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("test-key".to_string());

    encode(&header, claims, &EncodingKey::from_secret(TEST_SIGNING_KEY))
        .expect("Failed to encode JWT")
}

fn into_object(claims: Value) -> serde_json::Map<String, Value> {
    match claims {
        Value::Object(map) => map,
        other => panic!("claims must be a JSON object, got {other}"),
    }
}

/// Token implementation that is not backed by a JWT
#[derive(Debug, Default)]
pub struct StaticToken {
    pub service: Option<Service>,
    pub client_id: Option<String>,
    pub audiences: Vec<String>,
    pub scopes: Vec<String>,
}

impl Token for StaticToken {
    fn service(&self) -> Service {
        self.service.unwrap_or(Service::Ias)
    }

    fn has_claim(&self, name: &str) -> bool {
        match name {
            "cid" => self.client_id.is_some(),
            "aud" => !self.audiences.is_empty(),
            "scope" => !self.scopes.is_empty(),
            _ => false,
        }
    }

    fn claim_as_string(&self, name: &str) -> Option<String> {
        match name {
            "cid" => self.client_id.clone(),
            _ => None,
        }
    }

    fn claim_as_string_list(&self, name: &str) -> Vec<String> {
        match name {
            "aud" => self.audiences.clone(),
            "scope" => self.scopes.clone(),
            _ => Vec::new(),
        }
    }
}
