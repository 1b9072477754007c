//! Signing adapters.
//!
//! Callers depend only on [`SigningAdapter`]. The real adapter owns a STARK key
//! pair; the mock returns a fixed signature and public key without touching any
//! key material, so integration harnesses can run without secrets.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use stark_crypto::{
    sign, verify, CryptoError, KeyPair, MessageHash, PublicKey, Signature, U256,
};

use crate::credentials::StarkCredentials;
use crate::error::AuthError;

/// Environment variable selecting the adapter implementation.
const ADAPTER_ENV_VAR: &str = "EDGEX_SIGNING_ADAPTER";

/// Something that can sign normalized message hashes.
///
/// Implementations hold only immutable key material and are shared freely
/// between threads. `Debug` output must never include key material.
pub trait SigningAdapter: fmt::Debug + Send + Sync {
    /// Sign a normalized message hash.
    fn sign(&self, message_hash: &MessageHash) -> Result<Signature, CryptoError>;

    /// The public key matching the signatures this adapter produces.
    fn public_key(&self) -> PublicKey;
}

impl<A: SigningAdapter + ?Sized> SigningAdapter for Box<A> {
    fn sign(&self, message_hash: &MessageHash) -> Result<Signature, CryptoError> {
        (**self).sign(message_hash)
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }
}

impl<A: SigningAdapter + ?Sized> SigningAdapter for Arc<A> {
    fn sign(&self, message_hash: &MessageHash) -> Result<Signature, CryptoError> {
        (**self).sign(message_hash)
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }
}

/// Adapter backed by a real STARK private key.
///
/// The key is parsed and its public key derived once, at construction.
pub struct StarkSigningAdapter {
    key_pair: KeyPair,
}

impl StarkSigningAdapter {
    pub fn new(key_pair: KeyPair) -> Self {
        tracing::info!(
            stark_key = %key_pair.public_key(),
            "STARK signing adapter ready"
        );
        Self { key_pair }
    }

    /// Parse a hex private key.
    ///
    /// # Errors
    /// Returns `CryptoError::InvalidPrivateKey` for malformed or out-of-range keys.
    pub fn from_hex(private_key_hex: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(KeyPair::from_hex(private_key_hex)?))
    }

    pub fn from_credentials(credentials: &StarkCredentials) -> Result<Self, CryptoError> {
        Self::from_hex(credentials.expose_private_key())
    }

    /// Check a signature against this adapter's public key.
    pub fn verify(&self, message_hash: &MessageHash, signature: &Signature) -> bool {
        verify(self.key_pair.public_key(), message_hash, signature)
    }
}

impl SigningAdapter for StarkSigningAdapter {
    fn sign(&self, message_hash: &MessageHash) -> Result<Signature, CryptoError> {
        Ok(sign(self.key_pair.private_key(), message_hash))
    }

    fn public_key(&self) -> PublicKey {
        *self.key_pair.public_key()
    }
}

impl fmt::Debug for StarkSigningAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StarkSigningAdapter")
            .field("public_key", self.key_pair.public_key())
            .finish_non_exhaustive()
    }
}

/// `r` returned by the mock when no other signature is configured.
pub const MOCK_SIGNATURE_R: U256 =
    U256::from_be_hex("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef");

/// `s` returned by the mock when no other signature is configured.
pub const MOCK_SIGNATURE_S: U256 =
    U256::from_be_hex("00fedcba9876543210fedcba9876543210fedcba9876543210fedcba98765432");

/// Adapter returning a fixed signature and public key.
///
/// A mock built with [`MockSigningAdapter::recording`] also keeps every hash
/// passed to [`SigningAdapter::sign`] so tests can check what was signed. The
/// plain mock keeps nothing and takes no lock.
#[derive(Debug)]
pub struct MockSigningAdapter {
    r: U256,
    s: U256,
    public_key: PublicKey,
    signed: Option<Mutex<Vec<MessageHash>>>,
}

impl MockSigningAdapter {
    /// Mock with the default signature and the generator as public key.
    pub fn new() -> Self {
        Self {
            r: MOCK_SIGNATURE_R,
            s: MOCK_SIGNATURE_S,
            public_key: PublicKey::generator(),
            signed: None,
        }
    }

    /// Like [`MockSigningAdapter::new`], but recording signed hashes.
    pub fn recording() -> Self {
        Self {
            signed: Some(Mutex::new(Vec::new())),
            ..Self::new()
        }
    }

    /// Return `signature` from every call to `sign`.
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.r = signature.r();
        self.s = signature.s();
        self
    }

    pub fn with_public_key(mut self, public_key: PublicKey) -> Self {
        self.public_key = public_key;
        self
    }

    /// Hashes signed so far, oldest first. Always empty unless recording.
    pub fn signed_hashes(&self) -> Vec<MessageHash> {
        self.signed
            .as_ref()
            .map(|signed| signed.lock().clone())
            .unwrap_or_default()
    }
}

impl Default for MockSigningAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningAdapter for MockSigningAdapter {
    fn sign(&self, message_hash: &MessageHash) -> Result<Signature, CryptoError> {
        if let Some(signed) = &self.signed {
            signed.lock().push(*message_hash);
        }
        Signature::new(self.r, self.s)
    }

    fn public_key(&self) -> PublicKey {
        self.public_key
    }
}

/// Which adapter implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAdapterKind {
    /// [`StarkSigningAdapter`].
    #[default]
    Stark,
    /// [`MockSigningAdapter`].
    Mock,
}

impl SigningAdapterKind {
    /// Load the kind from `EDGEX_SIGNING_ADAPTER`.
    ///
    /// Returns `Stark` if the variable is not set.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidAdapterKind` if the variable holds an unknown name.
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(ADAPTER_ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl fmt::Display for SigningAdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stark => write!(f, "stark"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl FromStr for SigningAdapterKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stark" => Ok(Self::Stark),
            "mock" => Ok(Self::Mock),
            _ => Err(AuthError::InvalidAdapterKind(s.to_string())),
        }
    }
}

/// Construct the adapter selected by `kind`.
///
/// The mock ignores the credentials entirely.
///
/// # Errors
/// Returns `AuthError::Crypto` if the stark adapter is selected and the
/// private key is invalid.
pub fn build_signing_adapter(
    kind: SigningAdapterKind,
    credentials: &StarkCredentials,
) -> Result<Box<dyn SigningAdapter>, AuthError> {
    match kind {
        SigningAdapterKind::Stark => Ok(Box::new(StarkSigningAdapter::from_credentials(
            credentials,
        )?)),
        SigningAdapterKind::Mock => {
            tracing::warn!("Using mock signing adapter; signatures will not verify");
            Ok(Box::new(MockSigningAdapter::new()))
        }
    }
}
