//! Audience validation
//!
//! Decides whether an access token was issued for the OAuth2 client(s) of this application.
//!
//! # Algorithm
//!
//! 1. Compute the token's candidate audiences with [`allowed_audiences`]
//! 2. Run the matcher chain ([`DefaultMatcher`], then [`BrokerCloneMatcher`]); the first match
//!    accepts the token
//! 3. Otherwise reject with [`ValidationFailure::AudienceMismatch`]
//!
//! # Candidate audiences
//!
//! - XSUAA tokens with a `cid` claim contribute that client id first
//! - Every declared audience contributes itself, or the segment before its first dot when it
//!   is namespaced (`app1.read` → `app1`)
//! - XSUAA tokens that produced nothing so far fall back to the segments before the first dot
//!   of their scopes

use std::sync::Arc;

use tokenguard_config::ServiceConfiguration;
use tracing::{debug, info};

use super::matcher::{AudienceMatcher, BrokerCloneMatcher, DefaultMatcher};
use super::{ValidationFailure, ValidationResult, Validator};
use crate::token::{Token, claims};
use crate::{Error, Result};

/// Insertion-ordered, deduplicated set of trusted client ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedClientIds {
    ids: Vec<String>,
}

impl TrustedClientIds {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client id
    ///
    /// Surrounding whitespace is trimmed, matching [`OAuth2ServiceConfiguration`] client ids.
    /// Returns `false` when the id was already registered; its original position is kept.
    ///
    /// [`OAuth2ServiceConfiguration`]: tokenguard_config::OAuth2ServiceConfiguration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a blank id, which is not added.
    pub fn insert(&mut self, client_id: impl Into<String>) -> Result<bool> {
        let client_id = client_id.into();
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(Error::InvalidConfiguration(
                "AudienceValidator requires a non-blank clientId".to_string(),
            ));
        }

        if self.contains(client_id) {
            debug!(client_id = %client_id, "Trusted client id already configured");
            return Ok(false);
        }

        info!(client_id = %client_id, "Configured audience validator with trusted client id");
        self.ids.push(client_id.to_string());
        Ok(true)
    }

    /// Whether the id is trusted
    pub fn contains(&self, client_id: &str) -> bool {
        self.ids.iter().any(|id| id == client_id)
    }

    /// Iterate in registration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of trusted ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no id is trusted
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Trusted ids in registration order
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

/// Validates that a token's audience names one of the trusted client ids
///
/// Built once through [`AudienceValidator::builder`] and immutable afterwards, so a single
/// instance can serve concurrent requests.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tokenguard::{AudienceValidator, JwtToken, Service};
///
/// let validator = AudienceValidator::builder()
///     .trusted_client_id("sb-orders!t42")
///     .trusted_client_id("sb-orders!b42")
///     .build()?;
///
/// let claims = json!({ "aud": ["sb-orders!t42.read"] });
/// let token = JwtToken::from_claims(Service::Xsuaa, claims.as_object().unwrap().clone());
///
/// assert!(validator.validate(&token).is_valid());
/// # Ok::<(), tokenguard::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AudienceValidator {
    client_ids: TrustedClientIds,
    matchers: Vec<Arc<dyn AudienceMatcher>>,
}

impl AudienceValidator {
    /// Create a validator trusting a single client id
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a blank id.
    pub fn new(client_id: impl Into<String>) -> Result<Self> {
        Self::builder().trusted_client_id(client_id).build()
    }

    /// Create a validator trusting the client id of a service configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the configuration's client id is blank.
    pub fn from_configuration(configuration: &dyn ServiceConfiguration) -> Result<Self> {
        Self::builder().configuration(configuration).build()
    }

    /// Start building a validator
    pub fn builder() -> AudienceValidatorBuilder {
        AudienceValidatorBuilder::new()
    }

    /// Trusted client ids in registration order
    pub fn trusted_client_ids(&self) -> &TrustedClientIds {
        &self.client_ids
    }

    /// Names of the matchers in evaluation order
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|matcher| matcher.name()).collect()
    }

    /// Decide whether the token was issued for one of the trusted client ids
    pub fn validate<T: Token + ?Sized>(&self, token: &T) -> ValidationResult {
        let audiences = allowed_audiences(token);

        for matcher in &self.matchers {
            if let Some(client_id) = matcher.find_match(&audiences, &self.client_ids) {
                debug!(
                    matcher = matcher.name(),
                    client_id = %client_id,
                    "Token audience accepted"
                );
                return ValidationResult::Valid;
            }
        }

        debug!(
            audiences = ?audiences,
            client_ids = ?self.client_ids.as_slice(),
            "Token audience rejected"
        );
        ValidationResult::Invalid(ValidationFailure::AudienceMismatch {
            audiences,
            client_ids: self.client_ids.as_slice().to_vec(),
        })
    }
}

impl<T: Token + ?Sized> Validator<T> for AudienceValidator {
    fn validate(&self, token: &T) -> ValidationResult {
        AudienceValidator::validate(self, token)
    }
}

/// Builder for [`AudienceValidator`]
#[derive(Debug)]
pub struct AudienceValidatorBuilder {
    client_ids: Vec<String>,
    broker_clone_matching: bool,
    extra_matchers: Vec<Arc<dyn AudienceMatcher>>,
}

impl Default for AudienceValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudienceValidatorBuilder {
    /// Create a builder with broker-clone matching enabled
    pub fn new() -> Self {
        Self {
            client_ids: Vec::new(),
            broker_clone_matching: true,
            extra_matchers: Vec::new(),
        }
    }

    /// Trust a client id
    pub fn trusted_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_ids.push(client_id.into());
        self
    }

    /// Trust several client ids
    pub fn trusted_client_ids<I, S>(mut self, client_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.client_ids
            .extend(client_ids.into_iter().map(Into::into));
        self
    }

    /// Trust the client id of a service configuration
    ///
    /// Call once per binding when the application holds several OAuth2 clients.
    pub fn configuration(self, configuration: &dyn ServiceConfiguration) -> Self {
        self.trusted_client_id(configuration.client_id())
    }

    /// Enable or disable the broker-clone matcher (enabled by default)
    pub fn broker_clone_matching(mut self, enabled: bool) -> Self {
        self.broker_clone_matching = enabled;
        self
    }

    /// Append a matcher after the built-in ones
    pub fn matcher(mut self, matcher: impl AudienceMatcher + 'static) -> Self {
        self.extra_matchers.push(Arc::new(matcher));
        self
    }

    /// Build the validator
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if any client id is blank or none was given.
    pub fn build(self) -> Result<AudienceValidator> {
        let mut client_ids = TrustedClientIds::new();
        for client_id in self.client_ids {
            client_ids.insert(client_id)?;
        }

        if client_ids.is_empty() {
            return Err(Error::InvalidConfiguration(
                "AudienceValidator requires at least one trusted clientId".to_string(),
            ));
        }

        let mut matchers: Vec<Arc<dyn AudienceMatcher>> = vec![Arc::new(DefaultMatcher)];
        if self.broker_clone_matching {
            matchers.push(Arc::new(BrokerCloneMatcher));
        }
        matchers.extend(self.extra_matchers);

        Ok(AudienceValidator {
            client_ids,
            matchers,
        })
    }
}

/// Compute the candidate audiences of a token
///
/// The result keeps first-occurrence order and contains no duplicates. Values taken from dot
/// segments are never empty, but an empty `cid` claim is kept as is and suppresses the scope
/// fallback.
pub fn allowed_audiences<T: Token + ?Sized>(token: &T) -> Vec<String> {
    let mut audiences = Vec::new();
    let scope_derived = token.service().derives_audience_from_scopes();

    if scope_derived
        && token.has_claim(claims::XSUAA_CLIENT_ID)
        && let Some(client_id) = token.claim_as_string(claims::XSUAA_CLIENT_ID)
    {
        push_unique(&mut audiences, client_id);
    }

    for audience in token.audiences() {
        if !audience.contains('.') {
            push_unique(&mut audiences, audience);
        } else if let Some(app_id) = first_segment_before_dot(&audience).filter(|id| !id.is_empty())
        {
            push_unique(&mut audiences, app_id.to_string());
        }
    }

    if audiences.is_empty() && scope_derived {
        for scope in token.claim_as_string_list(claims::XSUAA_SCOPES) {
            if let Some(app_id) = first_segment_before_dot(&scope).filter(|id| !id.is_empty()) {
                push_unique(&mut audiences, app_id.to_string());
            }
        }
    }

    audiences
}

/// Trimmed segment before the first `.`, or `None` when there is no dot
///
/// Namespaced audiences lose their namespace (`app1.read` → `app1`); scopes lose namespace and
/// scope name alike (`app1.sub.read` → `app1`). The segment may be empty (`.read` → `""`).
pub fn first_segment_before_dot(value: &str) -> Option<&str> {
    value.split_once('.').map(|(segment, _)| segment.trim())
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
