use stark_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while loading credentials or building adapters.
///
/// Signing itself reports [`CryptoError`] unchanged; this type only adds the
/// configuration failures around it.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The account id is not a non-negative integer.
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    /// The signing adapter name is not recognized.
    #[error("Invalid signing adapter '{0}', expected 'stark' or 'mock'")]
    InvalidAdapterKind(String),

    /// The private key or another input failed validation.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl AuthError {
    /// Check if this error was caused by the private key.
    pub fn is_private_key_error(&self) -> bool {
        matches!(self, AuthError::Crypto(err) if err.is_private_key_error())
    }
}
