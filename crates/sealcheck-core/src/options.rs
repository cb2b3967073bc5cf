//! Call-site options handed to a format's encrypt/decrypt.
//!
//! Each assertion builds its options from one of the constructors here
//! instead of assembling fields ad hoc, so the shapes a format can
//! receive are enumerable: self-addressed, with a declared author, and
//! (under the suffixed contract) with a previous-message pointer.

use sealcheck_keys::{FeedId, SyntheticIdentity};

/// Fixed plaintext driving the behavioral assertions.
pub const PLAINTEXT_FIXTURE: &[u8] = b"hello world";

/// Fixed previous-message pointer used under the suffixed contract.
///
/// A synthetic token with the shape of a real log-entry reference; it
/// points at nothing.
pub const PREVIOUS_FIXTURE: &str = "%XphMUkWQtomKjXQvFGfsGYpt69sgEY7Y4Vou9cEuJho=.sha256";

/// Context for an encrypt call.
#[derive(Debug, Clone)]
pub struct EncryptOpts {
    /// Recipients the message is encrypted for.
    pub recps: Vec<FeedId>,
    /// Key material of the sender.
    pub keys: SyntheticIdentity,
    /// Pointer to the previous log entry, when the contract carries one.
    pub previous: Option<String>,
}

impl EncryptOpts {
    /// Message addressed to the identity's own feed id.
    ///
    /// The checker has no second participant, so the synthetic identity
    /// is always both sender and sole recipient.
    pub fn self_addressed(keys: &SyntheticIdentity) -> Self {
        Self { recps: vec![keys.id().clone()], keys: keys.clone(), previous: None }
    }

    /// Self-addressed message carrying the previous-message pointer.
    pub fn with_previous(keys: &SyntheticIdentity) -> Self {
        Self { previous: Some(PREVIOUS_FIXTURE.to_string()), ..Self::self_addressed(keys) }
    }
}

/// Context for a decrypt call.
#[derive(Debug, Clone)]
pub struct DecryptOpts {
    /// Key material of the reader.
    pub keys: SyntheticIdentity,
    /// Declared author of the message, when known to the call site.
    pub author: Option<FeedId>,
    /// Pointer to the previous log entry, when the contract carries one.
    pub previous: Option<String>,
}

impl DecryptOpts {
    /// Reader context with no author declared.
    pub fn self_addressed(keys: &SyntheticIdentity) -> Self {
        Self { keys: keys.clone(), author: None, previous: None }
    }

    /// Reader context declaring the identity itself as author.
    pub fn with_author(keys: &SyntheticIdentity) -> Self {
        Self { author: Some(keys.id().clone()), ..Self::self_addressed(keys) }
    }

    /// Author-declaring context carrying the previous-message pointer.
    pub fn with_author_and_previous(keys: &SyntheticIdentity) -> Self {
        Self { previous: Some(PREVIOUS_FIXTURE.to_string()), ..Self::with_author(keys) }
    }
}
