//! Ephemeral identities for conformance runs.
//!
//! Every conformance check generates one synthetic identity: a fresh
//! Ed25519 key pair with a feed-id text form (`@<base64>.ed25519`).
//! Identities are never persisted and never shared across checks.
//!
//! # Design
//!
//! Identity generation is the only collaborator the checker consumes
//! besides the format under test, so it lives in its own crate. The
//! identity carries a single derived-key cache slot that a format's
//! `decrypt` may populate across the calls of one check invocation.
//! The checker itself never reads the cache.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod identity;

pub use identity::{FeedId, IdentityError, SyntheticIdentity};
