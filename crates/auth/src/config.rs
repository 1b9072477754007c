//! Environment-driven configuration.

use common::EdgexEnvironment;

use crate::adapter::{build_signing_adapter, SigningAdapter, SigningAdapterKind};
use crate::authenticator::RequestAuthenticator;
use crate::credentials::StarkCredentials;
use crate::error::AuthError;

/// Everything needed to authenticate against one edgeX environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub environment: EdgexEnvironment,
    pub credentials: StarkCredentials,
    pub adapter_kind: SigningAdapterKind,
}

impl AuthConfig {
    /// Load from `EDGEX_ENVIRONMENT`, `EDGEX_ACCOUNT_ID`,
    /// `EDGEX_STARK_PRIVATE_KEY` and `EDGEX_SIGNING_ADAPTER`.
    pub fn from_env() -> Result<Self, AuthError> {
        let credentials = StarkCredentials::from_env()?;
        let config = Self {
            environment: EdgexEnvironment::from_env(),
            credentials,
            adapter_kind: SigningAdapterKind::from_env()?,
        };
        tracing::info!(
            environment = %config.environment,
            account_id = config.credentials.account_id(),
            adapter = %config.adapter_kind,
            "Loaded auth config"
        );
        Ok(config)
    }

    /// Build the configured adapter and wrap it in an authenticator.
    pub fn authenticator(&self) -> Result<RequestAuthenticator<Box<dyn SigningAdapter>>, AuthError> {
        let adapter = build_signing_adapter(self.adapter_kind, &self.credentials)?;
        Ok(RequestAuthenticator::new(adapter, self.credentials.account_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_config_builds_authenticator() {
        let config = AuthConfig {
            environment: EdgexEnvironment::Testnet,
            credentials: StarkCredentials::new(99, "not a key".into()),
            adapter_kind: SigningAdapterKind::Mock,
        };
        let auth = config.authenticator().unwrap();
        assert_eq!(auth.account_id(), 99);
    }

    #[test]
    fn test_authenticator_debug_hides_key() {
        let config = AuthConfig {
            environment: EdgexEnvironment::Testnet,
            credentials: StarkCredentials::new(
                99,
                "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".into(),
            ),
            adapter_kind: SigningAdapterKind::Stark,
        };
        let debug_str = format!("{:?}", config.authenticator().unwrap());

        assert!(debug_str.contains("account_id: 99"));
        assert!(!debug_str.contains("0123456789abcdef0123"));
    }

    #[test]
    fn test_stark_config_rejects_bad_key() {
        let config = AuthConfig {
            environment: EdgexEnvironment::Testnet,
            credentials: StarkCredentials::new(99, "not a key".into()),
            adapter_kind: SigningAdapterKind::Stark,
        };
        assert!(config.authenticator().unwrap_err().is_private_key_error());
    }
}
