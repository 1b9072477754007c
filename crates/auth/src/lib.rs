//! Authentication and signing for the edgeX exchange API.
//!
//! This crate turns STARK key material into the signed headers edgeX expects
//! on private REST calls and WebSocket handshakes.
//!
//! # Features
//!
//! - **Secure Credentials**: The STARK private key is wrapped in `SecretString`
//!   to prevent accidental logging and ensure memory is zeroed on drop.
//! - **Pluggable Signing**: Callers depend on the `SigningAdapter` trait; a real
//!   STARK adapter and a mock adapter are provided.
//! - **Canonical Payloads**: Requests are rendered, hashed with Keccak-256 and
//!   signed exactly as the exchange verifies them.
//! - **Environment Loading**: Credentials can be loaded from environment variables
//!   or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{AuthRequest, HttpMethod, RequestAuthenticator, StarkCredentials, StarkSigningAdapter};
//!
//! // Load credentials from environment
//! let credentials = StarkCredentials::from_env()?;
//!
//! // Create an authenticator
//! let adapter = StarkSigningAdapter::from_credentials(&credentials)?;
//! let auth = RequestAuthenticator::new(adapter, credentials.account_id());
//!
//! // Sign an account-scoped request
//! let request = auth.account_request(HttpMethod::Get, "/api/v1/private/account/getAccountAsset");
//! let headers = auth.build_auth_headers(&request)?;
//! ```

mod adapter;
mod authenticator;
mod clock;
mod config;
mod credentials;
mod error;
mod payload;

pub use adapter::{
    build_signing_adapter, MockSigningAdapter, SigningAdapter, SigningAdapterKind,
    StarkSigningAdapter, MOCK_SIGNATURE_R, MOCK_SIGNATURE_S,
};
pub use authenticator::{
    HeaderSet, RequestAuthenticator, PRIVATE_STREAM_PATH, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AuthConfig;
pub use credentials::{StarkCredentials, DEFAULT_ENV_PREFIX};
pub use error::AuthError;
pub use payload::{
    flatten_value, hash_sign_content, AuthRequest, HttpMethod, ACCOUNT_ID_PARAM,
};
