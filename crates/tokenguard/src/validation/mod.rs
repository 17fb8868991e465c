//! Token validation
//!
//! A [`Validator`] inspects one token and returns a [`ValidationResult`]. Expected rejections
//! are data, not errors: a validator never fails for a well-formed token.
//!
//! - [`audience`] - [`AudienceValidator`], the audience-trust decision
//! - [`matcher`] - The prioritized audience matchers the validator runs

pub mod audience;
pub mod matcher;

pub use audience::{
    AudienceValidator, AudienceValidatorBuilder, TrustedClientIds, allowed_audiences,
    first_segment_before_dot,
};
pub use matcher::{AudienceMatcher, BrokerCloneMatcher, DefaultMatcher};

/// A single validation step over tokens of type `T`
pub trait Validator<T: ?Sized> {
    /// Validate the token
    fn validate(&self, token: &T) -> ValidationResult;
}

/// Outcome of a validation step
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ValidationResult {
    /// The token passed
    Valid,
    /// The token was rejected
    Invalid(ValidationFailure),
}

impl ValidationResult {
    /// Whether the token passed
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Whether the token was rejected
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Rejection details, if any
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(failure),
        }
    }

    /// Convert into a `Result` so rejections can be propagated with `?`
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationFailure`] of an invalid result.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(failure) => Err(failure),
        }
    }
}

/// Why a token was rejected
///
/// The message is meant for logs and operators. Do not echo it back to the token presenter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    /// No audience of the token matches a trusted client id
    #[error("Jwt token with audience {audiences:?} is not issued for these clientIds: {client_ids:?}.")]
    AudienceMismatch {
        /// Audiences computed from the token
        audiences: Vec<String>,
        /// Trusted client ids of the validator
        client_ids: Vec<String>,
    },
}

impl ValidationFailure {
    /// Message template with `{}` placeholders for the structured values
    pub fn template(&self) -> &'static str {
        match self {
            Self::AudienceMismatch { .. } => {
                "Jwt token with audience {} is not issued for these clientIds: {}."
            }
        }
    }
}
