//! edgeX environment configuration.
//!
//! Supports mainnet and testnet environments with their REST and WebSocket URLs.

use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the edgeX environment.
const ENVIRONMENT_VAR: &str = "EDGEX_ENVIRONMENT";

/// edgeX environment (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgexEnvironment {
    /// Mainnet (real funds).
    Mainnet,
    /// Testnet. The default, so a missing setting never signs live requests.
    #[default]
    Testnet,
}

impl EdgexEnvironment {
    /// REST API base URL.
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://pro.edgex.exchange",
            Self::Testnet => "https://testnet.edgex.exchange",
        }
    }

    /// WebSocket base URL for public and private streams.
    pub fn ws_base_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "wss://quote.edgex.exchange",
            Self::Testnet => "wss://quote-testnet.edgex.exchange",
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }

    /// Load environment from the `EDGEX_ENVIRONMENT` env var.
    ///
    /// Returns `Testnet` if not set or invalid.
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var(ENVIRONMENT_VAR) else {
            return Self::default();
        };
        value.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "Falling back to default environment");
            Self::default()
        })
    }
}

impl fmt::Display for EdgexEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for EdgexEnvironment {
    type Err = ParseEnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" | "production" | "prod" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            _ => Err(ParseEnvironmentError(s.to_string())),
        }
    }
}

/// Error parsing environment string.
#[derive(Debug, Clone)]
pub struct ParseEnvironmentError(String);

impl fmt::Display for ParseEnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid environment '{}', expected 'mainnet' or 'testnet'",
            self.0
        )
    }
}

impl std::error::Error for ParseEnvironmentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_urls() {
        let env = EdgexEnvironment::Mainnet;
        assert_eq!(env.rest_base_url(), "https://pro.edgex.exchange");
        assert_eq!(env.ws_base_url(), "wss://quote.edgex.exchange");
        assert!(env.is_mainnet());
        assert!(!env.is_testnet());
    }

    #[test]
    fn test_testnet_urls() {
        let env = EdgexEnvironment::Testnet;
        assert_eq!(env.rest_base_url(), "https://testnet.edgex.exchange");
        assert_eq!(env.ws_base_url(), "wss://quote-testnet.edgex.exchange");
        assert!(!env.is_mainnet());
        assert!(env.is_testnet());
    }

    #[test]
    fn test_parse_mainnet() {
        for input in ["mainnet", "prod", "PRODUCTION", " Main "] {
            assert_eq!(
                input.parse::<EdgexEnvironment>().unwrap(),
                EdgexEnvironment::Mainnet
            );
        }
    }

    #[test]
    fn test_parse_testnet() {
        assert_eq!(
            "testnet".parse::<EdgexEnvironment>().unwrap(),
            EdgexEnvironment::Testnet
        );
        assert_eq!(
            "TEST".parse::<EdgexEnvironment>().unwrap(),
            EdgexEnvironment::Testnet
        );
    }

    #[test]
    fn test_parse_invalid() {
        let err = "staging".parse::<EdgexEnvironment>().unwrap_err();
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn test_default_is_testnet() {
        assert_eq!(EdgexEnvironment::default(), EdgexEnvironment::Testnet);
    }

    #[test]
    fn test_display_roundtrip() {
        for env in [EdgexEnvironment::Mainnet, EdgexEnvironment::Testnet] {
            assert_eq!(env.to_string().parse::<EdgexEnvironment>().unwrap(), env);
        }
    }
}
