//! edgeX request authentication headers.

use std::fmt;

use serde::Serialize;
use stark_crypto::{CryptoError, MessageHash, Signature};

use crate::adapter::SigningAdapter;
use crate::clock::{Clock, SystemClock};
use crate::payload::{AuthRequest, HttpMethod};

pub const TIMESTAMP_HEADER: &str = "X-edgeX-Api-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-edgeX-Api-Signature";

/// Path of the private WebSocket stream.
pub const PRIVATE_STREAM_PATH: &str = "/api/v1/private/ws";

/// The two authentication headers of a signed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSet {
    #[serde(rename = "X-edgeX-Api-Timestamp")]
    timestamp: String,
    #[serde(rename = "X-edgeX-Api-Signature")]
    signature: String,
}

impl HeaderSet {
    fn new(timestamp_ms: i64, signature: &Signature) -> Self {
        Self {
            timestamp: timestamp_ms.to_string(),
            signature: signature.to_hex(),
        }
    }

    /// Timestamp header value, decimal milliseconds.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Signature header value, `r || s` as 128 hex characters.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `(name, value)` pairs ready to attach to an HTTP or WebSocket request.
    pub fn as_pairs(&self) -> [(&'static str, &str); 2] {
        [
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }
}

/// Builds signed headers for one account.
///
/// Holds no mutable state besides the clock, so one instance can serve many
/// threads. Errors from the adapter are returned unchanged; nothing is retried.
pub struct RequestAuthenticator<A, C = SystemClock> {
    adapter: A,
    clock: C,
    account_id: u64,
}

impl<A, C> fmt::Debug for RequestAuthenticator<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl<A: SigningAdapter> RequestAuthenticator<A> {
    pub fn new(adapter: A, account_id: u64) -> Self {
        Self {
            adapter,
            clock: SystemClock::new(),
            account_id,
        }
    }
}

impl<A: SigningAdapter, C: Clock> RequestAuthenticator<A, C> {
    /// Replace the timestamp source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> RequestAuthenticator<A, C2> {
        RequestAuthenticator {
            adapter: self.adapter,
            clock,
            account_id: self.account_id,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    /// A request scoped to this authenticator's account.
    pub fn account_request(&self, method: HttpMethod, path: &str) -> AuthRequest {
        AuthRequest::new(method, path).with_account_id(self.account_id)
    }

    /// Sign `request` with a fresh timestamp.
    pub fn build_auth_headers(&self, request: &AuthRequest) -> Result<HeaderSet, CryptoError> {
        self.build_auth_headers_at(request, self.clock.now_ms())
    }

    /// Sign `request` at an explicit timestamp.
    pub fn build_auth_headers_at(
        &self,
        request: &AuthRequest,
        timestamp_ms: i64,
    ) -> Result<HeaderSet, CryptoError> {
        let message_hash = request.message_hash(timestamp_ms).hash;
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            timestamp_ms,
            "Signing request"
        );
        self.sign_hash(&message_hash, timestamp_ms)
    }

    fn sign_hash(&self, message_hash: &MessageHash, timestamp_ms: i64) -> Result<HeaderSet, CryptoError> {
        let signature = self.adapter.sign(message_hash)?;
        Ok(HeaderSet::new(timestamp_ms, &signature))
    }

    /// Headers for the private WebSocket handshake.
    pub fn private_stream_headers(&self) -> Result<HeaderSet, CryptoError> {
        let request = self.account_request(HttpMethod::Get, PRIVATE_STREAM_PATH);
        self.build_auth_headers(&request)
    }

    /// Private WebSocket URL under `ws_base_url`.
    pub fn private_stream_url(&self, ws_base_url: &str) -> String {
        format!(
            "{}{}?accountId={}",
            ws_base_url.trim_end_matches('/'),
            PRIVATE_STREAM_PATH,
            self.account_id
        )
    }

    /// Public WebSocket URL with the `timestamp` parameter appended.
    ///
    /// Public streams are not signed.
    pub fn public_stream_url(&self, url: &str) -> String {
        append_timestamp(url, self.clock.now_ms())
    }
}

fn append_timestamp(url: &str, timestamp_ms: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}timestamp={}", url, separator, timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{MockSigningAdapter, StarkSigningAdapter};
    use crate::clock::FixedClock;
    use crate::payload::hash_sign_content;
    use serde_json::json;
    use stark_crypto::{verify, U256};

    const TEST_KEY_HEX: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
    const TS: i64 = 1_700_000_000_000;

    fn mock_authenticator() -> RequestAuthenticator<MockSigningAdapter, FixedClock> {
        RequestAuthenticator::new(MockSigningAdapter::recording(), 12345).with_clock(FixedClock(TS))
    }

    #[test]
    fn test_mock_signature_slotted_verbatim() {
        let auth = mock_authenticator();
        let headers = auth
            .build_auth_headers(&AuthRequest::get("/api/v1/public/meta/getMetaData"))
            .unwrap();

        let expected = Signature::new(
            crate::adapter::MOCK_SIGNATURE_R,
            crate::adapter::MOCK_SIGNATURE_S,
        )
        .unwrap();
        assert_eq!(headers.timestamp(), "1700000000000");
        assert_eq!(headers.signature(), expected.to_hex());
        assert_eq!(
            headers.signature(),
            format!("{}{}", expected.r_hex(), expected.s_hex())
        );
    }

    #[test]
    fn test_signs_canonical_payload_hash() {
        let auth = mock_authenticator();
        let request = auth.account_request(HttpMethod::Get, "/api/v1/private/account/getAccountAsset");
        auth.build_auth_headers(&request).unwrap();

        let expected = hash_sign_content(
            "1700000000000GET/api/v1/private/account/getAccountAssetaccountId=12345",
        );
        assert_eq!(auth.adapter().signed_hashes(), vec![expected.hash]);
    }

    #[test]
    fn test_body_request_signed_once() {
        let auth = mock_authenticator();
        let request = AuthRequest::post("/api/v1/private/order/createOrder", json!({"size": "1"}))
            .with_account_id(auth.account_id());
        auth.build_auth_headers(&request).unwrap();

        let expected =
            hash_sign_content("1700000000000POST/api/v1/private/order/createOrderaccountId=12345&size=1");
        assert_eq!(auth.adapter().signed_hashes(), vec![expected.hash]);
    }

    #[test]
    fn test_private_stream_headers() {
        let auth = mock_authenticator();
        let headers = auth.private_stream_headers().unwrap();

        let expected = hash_sign_content("1700000000000GET/api/v1/private/wsaccountId=12345");
        assert_eq!(headers.timestamp(), "1700000000000");
        assert_eq!(auth.adapter().signed_hashes(), vec![expected.hash]);
        assert_eq!(
            auth.private_stream_url("wss://quote-testnet.edgex.exchange/"),
            "wss://quote-testnet.edgex.exchange/api/v1/private/ws?accountId=12345"
        );
    }

    #[test]
    fn test_public_stream_url() {
        let auth = mock_authenticator();
        assert_eq!(
            auth.public_stream_url("wss://quote.edgex.exchange/api/v1/public/ws"),
            "wss://quote.edgex.exchange/api/v1/public/ws?timestamp=1700000000000"
        );
        assert_eq!(
            auth.public_stream_url("wss://quote.edgex.exchange/api/v1/public/ws?x=1"),
            "wss://quote.edgex.exchange/api/v1/public/ws?x=1&timestamp=1700000000000"
        );
        assert!(auth.adapter().signed_hashes().is_empty());
    }

    #[test]
    fn test_real_signature_verifies() {
        let adapter = StarkSigningAdapter::from_hex(TEST_KEY_HEX).unwrap();
        let public_key = adapter.public_key();
        let auth = RequestAuthenticator::new(adapter, 7).with_clock(FixedClock(TS));

        let request = auth.account_request(HttpMethod::Get, "/api/v1/private/order/getActiveOrderPage");
        let headers = auth.build_auth_headers(&request).unwrap();

        let signature = Signature::from_hex(headers.signature()).unwrap();
        let hash = request.message_hash(TS).hash;
        assert!(verify(&public_key, &hash, &signature));
    }

    #[test]
    fn test_system_clock_timestamps_differ() {
        let auth = RequestAuthenticator::new(MockSigningAdapter::new(), 1);
        let request = AuthRequest::get("/p");
        let a = auth.build_auth_headers(&request).unwrap();
        let b = auth.build_auth_headers(&request).unwrap();
        assert_ne!(a.timestamp(), b.timestamp());
    }

    #[test]
    fn test_adapter_errors_propagate_unchanged() {
        #[derive(Debug)]
        struct FailingAdapter;

        impl SigningAdapter for FailingAdapter {
            fn sign(&self, _: &MessageHash) -> Result<Signature, CryptoError> {
                Err(CryptoError::DivisionByZero)
            }

            fn public_key(&self) -> stark_crypto::PublicKey {
                stark_crypto::PublicKey::generator()
            }
        }

        let auth = RequestAuthenticator::new(FailingAdapter, 1);
        let err = auth.build_auth_headers(&AuthRequest::get("/p")).unwrap_err();
        assert_eq!(err, CryptoError::DivisionByZero);
    }

    #[test]
    fn test_header_set_serializes_with_header_names() {
        let sig = Signature::new(U256::from_u8(1), U256::from_u8(2)).unwrap();
        let headers = HeaderSet::new(5, &sig);
        let value = serde_json::to_value(&headers).unwrap();

        assert_eq!(value[TIMESTAMP_HEADER], "5");
        assert_eq!(value[SIGNATURE_HEADER], sig.to_hex());
        assert_eq!(headers.as_pairs()[0], (TIMESTAMP_HEADER, "5"));
    }

    #[test]
    fn test_boxed_adapter_works() {
        let boxed: Box<dyn SigningAdapter> = Box::new(MockSigningAdapter::new());
        let auth = RequestAuthenticator::new(boxed, 1).with_clock(FixedClock(TS));
        assert!(auth.build_auth_headers(&AuthRequest::get("/p")).is_ok());
    }
}
