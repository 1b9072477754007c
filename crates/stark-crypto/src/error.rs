//! Error types for STARK curve operations.

use thiserror::Error;

/// Errors that can occur while validating inputs to curve arithmetic or signing.
///
/// Messages never carry key material; private key failures only report which
/// check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The private key is not a valid scalar in `[1, N)`.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(&'static str),

    /// A field element, scalar or point is out of range or off the curve.
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// The message hash is not a valid field element.
    #[error("Invalid message hash: {0}")]
    InvalidMessageHash(String),

    /// Attempted to invert zero.
    #[error("Division by zero")]
    DivisionByZero,
}

impl CryptoError {
    /// Check if this error was caused by the private key.
    pub fn is_private_key_error(&self) -> bool {
        matches!(self, CryptoError::InvalidPrivateKey(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CryptoError>;
