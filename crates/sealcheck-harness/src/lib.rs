//! Example formats and end-to-end tests for the sealcheck checker.
//!
//! This crate is disposable example usage: a realistic encryption
//! format (`sealed`, XChaCha20-Poly1305 keyed from the recipient's
//! public key) plus deliberately corrupted variants, and the
//! integration tests under `tests/` that drive the checker against
//! them. Nothing here is part of the checker's contract.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod formats;

pub use formats::{SEALED_NAME, corrupted_decrypt, corrupted_encrypt, sealed};
