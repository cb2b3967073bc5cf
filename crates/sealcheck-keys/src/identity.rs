//! Synthetic identity generation.
//!
//! A `SyntheticIdentity` is an ephemeral Ed25519 key pair used to drive
//! one conformance check. The checker addresses messages to the
//! identity's own feed id, making it both sender and sole recipient.

use std::fmt;
use std::sync::{Arc, OnceLock};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

/// Suffix of the feed-id text form.
const FEED_SUFFIX: &str = ".ed25519";

/// Errors from identity and feed-id handling.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Feed id does not have the `@<base64>.ed25519` shape.
    #[error("malformed feed id: {id}")]
    MalformedFeedId {
        /// The offending id string.
        id: String,
    },

    /// Feed id decoded to a key of the wrong length.
    #[error("feed id public key has {actual} bytes, expected 32")]
    BadKeyLength {
        /// Decoded length.
        actual: usize,
    },
}

/// Textual identity reference: `@<base64(public key)>.ed25519`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    /// Build a feed id from raw public key bytes.
    pub fn from_public_key(public: &[u8; 32]) -> Self {
        Self(format!("@{}{FEED_SUFFIX}", STANDARD.encode(public)))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the public key bytes encoded in the id.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the id is not `@<base64>.ed25519` or
    /// the decoded key is not 32 bytes.
    pub fn public_key(&self) -> Result<[u8; 32], IdentityError> {
        let malformed = || IdentityError::MalformedFeedId { id: self.0.clone() };

        let encoded = self
            .0
            .strip_prefix('@')
            .and_then(|rest| rest.strip_suffix(FEED_SUFFIX))
            .ok_or_else(|| malformed())?;

        let bytes = STANDARD.decode(encoded).map_err(|_| malformed())?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| IdentityError::BadKeyLength { actual: len })
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ephemeral Ed25519 key pair for a single conformance check.
///
/// Clones share the derived-key cache, so a format's `decrypt` can
/// cache exchange material across the multiple encrypt/decrypt calls
/// the checker issues within one invocation. The cache is an
/// implementation convenience for formats, never a checked property.
#[derive(Clone)]
pub struct SyntheticIdentity {
    id: FeedId,
    signing: SigningKey,
    cache: Arc<OnceLock<[u8; 32]>>,
}

impl SyntheticIdentity {
    /// Generate a fresh identity from OS entropy.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build an identity from a fixed seed.
    ///
    /// Deterministic, for tests only. Production checks always use
    /// [`SyntheticIdentity::generate`].
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(&seed))
    }

    fn from_signing_key(signing: SigningKey) -> Self {
        let id = FeedId::from_public_key(&signing.verifying_key().to_bytes());
        Self { id, signing, cache: Arc::new(OnceLock::new()) }
    }

    /// The identity's feed id.
    pub fn id(&self) -> &FeedId {
        &self.id
    }

    /// Raw public key bytes.
    pub fn public_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// Raw private key bytes.
    pub fn private_bytes(&self) -> [u8; 32] {
        self.signing.to_bytes()
    }

    /// Fetch the cached derived key, deriving and caching it on first
    /// use.
    ///
    /// Formats that derive expensive exchange material from the private
    /// key may route the derivation through here; repeated calls within
    /// one check reuse the first result.
    pub fn derived_key(&self, derive: impl FnOnce() -> [u8; 32]) -> [u8; 32] {
        *self.cache.get_or_init(derive)
    }
}

impl fmt::Debug for SyntheticIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Private key bytes stay out of debug output.
        f.debug_struct("SyntheticIdentity").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_distinct_identities() {
        let a = SyntheticIdentity::generate();
        let b = SyntheticIdentity::generate();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn feed_id_has_expected_shape() {
        let identity = SyntheticIdentity::generate();
        let id = identity.id().as_str();
        assert!(id.starts_with('@'));
        assert!(id.ends_with(".ed25519"));
    }

    #[test]
    fn feed_id_round_trips_public_key() {
        let identity = SyntheticIdentity::from_seed([7u8; 32]);
        let recovered = identity.id().public_key().unwrap();
        assert_eq!(recovered, identity.public_bytes());
    }

    #[test]
    fn malformed_feed_id_is_rejected() {
        let id = FeedId("not-a-feed-id".to_string());
        assert!(matches!(id.public_key(), Err(IdentityError::MalformedFeedId { .. })));
    }

    #[test]
    fn truncated_key_is_rejected() {
        use base64::{Engine as _, engine::general_purpose::STANDARD};
        let id = FeedId(format!("@{}.ed25519", STANDARD.encode([1u8; 16])));
        assert!(matches!(id.public_key(), Err(IdentityError::BadKeyLength { actual: 16 })));
    }

    #[test]
    fn from_seed_is_deterministic() {
        let a = SyntheticIdentity::from_seed([42u8; 32]);
        let b = SyntheticIdentity::from_seed([42u8; 32]);
        assert_eq!(a.id(), b.id());
        assert_eq!(hex::encode(a.private_bytes()), hex::encode(b.private_bytes()));
    }

    #[test]
    fn derived_key_caches_first_result() {
        let identity = SyntheticIdentity::generate();
        let first = identity.derived_key(|| [1u8; 32]);
        let second = identity.derived_key(|| [2u8; 32]);
        assert_eq!(first, second);
    }

    #[test]
    fn clones_share_the_cache() {
        let identity = SyntheticIdentity::generate();
        let clone = identity.clone();
        identity.derived_key(|| [9u8; 32]);
        assert_eq!(clone.derived_key(|| [0u8; 32]), [9u8; 32]);
    }
}
