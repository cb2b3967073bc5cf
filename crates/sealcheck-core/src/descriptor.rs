//! Descriptor model for the format under test.
//!
//! A format arrives from outside the trust boundary, so its shape is
//! unconstrained until the checker validates it. `FormatDescriptor`
//! therefore keeps every field optional — structural assertions need to
//! observe absence — and its callables return a dynamically typed
//! [`FormatValue`] so the buffer-type assertions have something to
//! check. A conforming callable returns [`bytes::Bytes`] or `Vec<u8>`.

use std::any::Any;

use bytes::Bytes;
use sealcheck_keys::SyntheticIdentity;
use tokio::sync::oneshot;

use crate::options::{DecryptOpts, EncryptOpts};

/// Dynamically typed return value of a format callable.
///
/// The checker downcasts this to a byte buffer; anything else fails the
/// buffer-type assertions.
pub type FormatValue = Box<dyn Any + Send>;

/// Setup callable: receives the run configuration and a completion
/// handle it must eventually fire.
pub type SetupFn = dyn Fn(SetupConfig, SetupHandle) + Send + Sync;

/// Encrypt callable: plaintext bytes plus call-site options.
pub type EncryptFn = dyn Fn(&[u8], &EncryptOpts) -> FormatValue + Send + Sync;

/// Decrypt callable: ciphertext bytes plus call-site options.
pub type DecryptFn = dyn Fn(&[u8], &DecryptOpts) -> FormatValue + Send + Sync;

/// Configuration handed to a format's `setup`.
///
/// Owned by the format once handed over; the checker never reads it
/// back. Carries the synthetic identity generated for this check so a
/// format can pre-derive material from it.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// The synthetic identity driving this check.
    pub keys: SyntheticIdentity,
}

/// Single-shot completion signal for the setup handshake.
///
/// `done` consumes the handle, so setup can signal completion at most
/// once. Dropping the handle without calling `done` aborts the check
/// with [`crate::CheckError::SetupAborted`].
#[derive(Debug)]
pub struct SetupHandle {
    tx: oneshot::Sender<()>,
}

impl SetupHandle {
    pub(crate) fn new(tx: oneshot::Sender<()>) -> Self {
        Self { tx }
    }

    /// Signal that setup has finished and assertions may begin.
    pub fn done(self) {
        // The receiver only disappears if the check was dropped, in
        // which case nobody is waiting for the signal anyway.
        let _ = self.tx.send(());
    }
}

/// Candidate encryption format, shape unconstrained until checked.
///
/// Built with the builder-style constructors so call sites read close
/// to a plugin manifest:
///
/// ```
/// use bytes::Bytes;
/// use sealcheck_core::FormatDescriptor;
///
/// let format = FormatDescriptor::named("cool")
///     .encrypt(|plaintext, _opts| Box::new(Bytes::copy_from_slice(plaintext)))
///     .decrypt(|ciphertext, _opts| Box::new(Bytes::copy_from_slice(ciphertext)));
/// ```
#[derive(Default)]
pub struct FormatDescriptor {
    name: Option<String>,
    suffix: Option<String>,
    setup: Option<Box<SetupFn>>,
    encrypt: Option<Box<EncryptFn>>,
    decrypt: Option<Box<DecryptFn>>,
}

impl FormatDescriptor {
    /// Descriptor with no fields at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Descriptor with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    /// Set the secondary on-wire tag.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Set the setup callable.
    #[must_use]
    pub fn setup(mut self, setup: impl Fn(SetupConfig, SetupHandle) + Send + Sync + 'static) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Set the encrypt callable.
    #[must_use]
    pub fn encrypt(
        mut self,
        encrypt: impl Fn(&[u8], &EncryptOpts) -> FormatValue + Send + Sync + 'static,
    ) -> Self {
        self.encrypt = Some(Box::new(encrypt));
        self
    }

    /// Set the decrypt callable.
    #[must_use]
    pub fn decrypt(
        mut self,
        decrypt: impl Fn(&[u8], &DecryptOpts) -> FormatValue + Send + Sync + 'static,
    ) -> Self {
        self.decrypt = Some(Box::new(decrypt));
        self
    }

    /// Replace the encrypt callable, keeping everything else.
    ///
    /// Used by harnesses that corrupt a working format on purpose.
    #[must_use]
    pub fn override_encrypt(
        self,
        encrypt: impl Fn(&[u8], &EncryptOpts) -> FormatValue + Send + Sync + 'static,
    ) -> Self {
        Self { encrypt: Some(Box::new(encrypt)), ..self }
    }

    /// Replace the decrypt callable, keeping everything else.
    #[must_use]
    pub fn override_decrypt(
        self,
        decrypt: impl Fn(&[u8], &DecryptOpts) -> FormatValue + Send + Sync + 'static,
    ) -> Self {
        Self { decrypt: Some(Box::new(decrypt)), ..self }
    }

    /// The declared name, if any non-empty string was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The declared suffix, if any non-empty string was set.
    pub fn declared_suffix(&self) -> Option<&str> {
        self.suffix.as_deref().filter(|s| !s.is_empty())
    }

    /// Name for error messages, tolerating a missing one.
    pub(crate) fn display_name(&self) -> String {
        self.name().unwrap_or("<unnamed>").to_string()
    }

    pub(crate) fn setup_fn(&self) -> Option<&SetupFn> {
        self.setup.as_deref()
    }

    pub(crate) fn encrypt_fn(&self) -> Option<&EncryptFn> {
        self.encrypt.as_deref()
    }

    pub(crate) fn decrypt_fn(&self) -> Option<&DecryptFn> {
        self.decrypt.as_deref()
    }
}

impl std::fmt::Debug for FormatDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatDescriptor")
            .field("name", &self.name)
            .field("suffix", &self.suffix)
            .field("setup", &self.setup.is_some())
            .field("encrypt", &self.encrypt.is_some())
            .field("decrypt", &self.decrypt.is_some())
            .finish()
    }
}

/// Downcast a [`FormatValue`] to a byte buffer.
///
/// Accepts `Bytes` and `Vec<u8>`; everything else is not a buffer.
pub(crate) fn into_buffer(value: FormatValue) -> Option<Bytes> {
    match value.downcast::<Bytes>() {
        Ok(bytes) => Some(*bytes),
        Err(other) => match other.downcast::<Vec<u8>>() {
            Ok(vec) => Some(Bytes::from(*vec)),
            Err(_) => None,
        },
    }
}
