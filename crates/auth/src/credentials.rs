//! Secure STARK credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the private key
//! and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Prefix used by [`StarkCredentials::from_env`].
pub const DEFAULT_ENV_PREFIX: &str = "EDGEX";

/// Account id and STARK private key for authenticated requests.
///
/// The private key is kept as the hex string from configuration, wrapped in
/// `SecretString`, until an adapter parses it.
#[derive(Clone)]
pub struct StarkCredentials {
    account_id: u64,
    stark_private_key: SecretString,
}

impl StarkCredentials {
    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `EDGEX_ACCOUNT_ID` - The account id (public)
    /// - `EDGEX_STARK_PRIVATE_KEY` - The hex private key (secret)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set and
    /// `AuthError::InvalidAccountId` if the account id is not an integer.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_env_with_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Load credentials from `{prefix}_ACCOUNT_ID` and `{prefix}_STARK_PRIVATE_KEY`.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let account_var = format!("{}_ACCOUNT_ID", prefix);
        let key_var = format!("{}_STARK_PRIVATE_KEY", prefix);

        let account_id = std::env::var(&account_var)
            .map_err(|_| AuthError::MissingEnvVar(account_var))?;
        let stark_private_key =
            std::env::var(&key_var).map_err(|_| AuthError::MissingEnvVar(key_var))?;

        Ok(Self::new(parse_account_id(&account_id)?, stark_private_key))
    }

    /// Create credentials from explicit values.
    ///
    /// Useful for testing or when credentials come from other sources.
    pub fn new(account_id: u64, stark_private_key: String) -> Self {
        Self {
            account_id,
            stark_private_key: SecretString::from(stark_private_key),
        }
    }

    /// Get the account id (public, safe to log).
    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// Expose the hex private key for parsing.
    ///
    /// **WARNING**: Only use this to construct a signing adapter.
    /// Never log or display the return value.
    pub fn expose_private_key(&self) -> &str {
        self.stark_private_key.expose_secret()
    }
}

fn parse_account_id(value: &str) -> Result<u64, AuthError> {
    value
        .trim()
        .parse()
        .map_err(|_| AuthError::InvalidAccountId(value.to_string()))
}

impl std::fmt::Debug for StarkCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarkCredentials")
            .field("account_id", &self.account_id)
            .field("stark_private_key", &"[REDACTED]")
            .finish()
    }
}
