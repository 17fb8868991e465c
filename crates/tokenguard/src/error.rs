//! Error types

use crate::token::TokenError;

/// Result alias for fallible tokenguard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors
///
/// Per-token audience mismatches are not errors; they are reported as
/// [`ValidationResult::Invalid`](crate::ValidationResult::Invalid).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The validator was set up with an unusable trusted client id set
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An encoded token could not be decoded
    #[error(transparent)]
    Token(#[from] TokenError),
}
