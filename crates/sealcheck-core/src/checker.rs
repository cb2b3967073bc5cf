//! The conformance check routine.
//!
//! A check moves through `NotStarted → AwaitingSetup → Ready → Running
//! → Done`: generate a synthetic identity, run the format's setup
//! handshake, then execute the contract's assertion battery strictly in
//! order. The first violated rule aborts the battery, so a check
//! resolves to `Ok(())` or exactly one [`CheckError`].
//!
//! The handshake is the only suspension point. The checker places no
//! timeout on it unless one is configured; a format that drops its
//! completion handle without signalling resolves the check with
//! [`CheckError::SetupAborted`] instead of hanging.

use std::time::Duration;

use bytes::Bytes;
use sealcheck_keys::SyntheticIdentity;
use tokio::sync::oneshot;

use crate::contract::ContractVersion;
use crate::descriptor::{FormatDescriptor, SetupConfig, SetupHandle, into_buffer};
use crate::error::CheckError;
use crate::options::{DecryptOpts, EncryptOpts, PLAINTEXT_FIXTURE};

/// A single rule in the battery. Passes silently or reports the
/// violated rule.
pub(crate) type Assertion = fn(&CheckContext<'_>) -> Result<(), CheckError>;

/// Everything an assertion may look at: the descriptor, the identity
/// generated for this check, and the contract being enforced.
pub(crate) struct CheckContext<'a> {
    format: &'a FormatDescriptor,
    keys: &'a SyntheticIdentity,
    version: ContractVersion,
}

impl CheckContext<'_> {
    fn encrypt_opts(&self) -> EncryptOpts {
        match self.version {
            ContractVersion::Bare => EncryptOpts::self_addressed(self.keys),
            ContractVersion::Suffixed => EncryptOpts::with_previous(self.keys),
        }
    }

    fn decrypt_opts_with_author(&self) -> DecryptOpts {
        match self.version {
            ContractVersion::Bare => DecryptOpts::with_author(self.keys),
            ContractVersion::Suffixed => DecryptOpts::with_author_and_previous(self.keys),
        }
    }

    fn round_trip_decrypt_opts(&self) -> DecryptOpts {
        match self.version {
            ContractVersion::Bare => DecryptOpts::self_addressed(self.keys),
            ContractVersion::Suffixed => DecryptOpts::with_author_and_previous(self.keys),
        }
    }

    /// Encrypt the fixture plaintext, requiring a buffer back.
    fn run_encrypt(&self) -> Result<Bytes, CheckError> {
        let encrypt = self.format.encrypt_fn().ok_or_else(|| CheckError::MissingMethod {
            name: self.format.display_name(),
            method: "encrypt",
        })?;
        into_buffer(encrypt(PLAINTEXT_FIXTURE, &self.encrypt_opts()))
            .ok_or_else(|| CheckError::EncryptNotBuffer { name: self.format.display_name() })
    }

    /// Decrypt a ciphertext, requiring a buffer back.
    fn run_decrypt(&self, ciphertext: &[u8], opts: &DecryptOpts) -> Result<Bytes, CheckError> {
        let decrypt = self.format.decrypt_fn().ok_or_else(|| CheckError::MissingMethod {
            name: self.format.display_name(),
            method: "decrypt",
        })?;
        into_buffer(decrypt(ciphertext, opts))
            .ok_or_else(|| CheckError::DecryptNotBuffer { name: self.format.display_name() })
    }
}

pub(crate) fn assert_name_field(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    ctx.format.name().map(drop).ok_or(CheckError::MissingField { field: "name" })
}

pub(crate) fn assert_suffix_field(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    ctx.format.declared_suffix().map(drop).ok_or(CheckError::MissingField { field: "suffix" })
}

pub(crate) fn assert_encrypt_present(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    if ctx.format.encrypt_fn().is_some() {
        Ok(())
    } else {
        Err(CheckError::MissingMethod { name: ctx.format.display_name(), method: "encrypt" })
    }
}

pub(crate) fn assert_decrypt_present(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    if ctx.format.decrypt_fn().is_some() {
        Ok(())
    } else {
        Err(CheckError::MissingMethod { name: ctx.format.display_name(), method: "decrypt" })
    }
}

/// Dot-free lowercase alphanumerics. The tag becomes part of an
/// on-wire field where `.` is the separator, and anything outside
/// `[a-z0-9]` could collide with reserved tokens.
fn assert_tag_syntax(name: &str, value: &str) -> Result<(), CheckError> {
    if value.contains('.') {
        return Err(CheckError::InvalidNameDot { name: name.to_string(), value: value.to_string() });
    }
    if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(CheckError::InvalidNameChars {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn assert_name_syntax(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    let name = ctx.format.display_name();
    assert_tag_syntax(&name, &name)
}

pub(crate) fn assert_suffix_syntax(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    let name = ctx.format.display_name();
    let suffix = ctx.format.declared_suffix().unwrap_or_default();
    assert_tag_syntax(&name, suffix)
}

pub(crate) fn assert_encrypt_returns_buffer(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    ctx.run_encrypt().map(drop)
}

pub(crate) fn assert_decrypt_returns_buffer(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    let ciphertext = ctx.run_encrypt()?;
    ctx.run_decrypt(&ciphertext, &ctx.decrypt_opts_with_author()).map(drop)
}

pub(crate) fn assert_round_trip(ctx: &CheckContext<'_>) -> Result<(), CheckError> {
    let ciphertext = ctx.run_encrypt()?;
    let plaintext = ctx.run_decrypt(&ciphertext, &ctx.round_trip_decrypt_opts())?;
    if plaintext.as_ref() == PLAINTEXT_FIXTURE {
        Ok(())
    } else {
        Err(CheckError::RoundTripMismatch { name: ctx.format.display_name() })
    }
}

/// Conformance checker for one contract version.
///
/// Stateless across checks: every invocation generates its own
/// synthetic identity and setup configuration, so concurrent checks of
/// different formats never interfere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checker {
    version: ContractVersion,
    setup_timeout: Option<Duration>,
}

impl Checker {
    /// Checker for the given contract version, with no setup timeout.
    pub fn new(version: ContractVersion) -> Self {
        Self { version, setup_timeout: None }
    }

    /// Bound the setup handshake.
    ///
    /// Off by default: a well-behaved format signals completion on its
    /// own, and some formats legitimately take a while (network calls,
    /// key pre-derivation). Hosts that cannot afford to wait opt in.
    #[must_use]
    pub fn with_setup_timeout(mut self, timeout: Duration) -> Self {
        self.setup_timeout = Some(timeout);
        self
    }

    /// Check a format against this contract.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`CheckError`].
    pub async fn check(&self, format: &FormatDescriptor) -> Result<(), CheckError> {
        self.run(format, None).await
    }

    /// Check a format, observing the moment setup completes.
    ///
    /// The hook fires strictly after the format's setup signals
    /// completion and strictly before the first assertion runs.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a [`CheckError`].
    pub async fn check_with_setup_hook(
        &self,
        format: &FormatDescriptor,
        on_setup_complete: impl FnOnce() + Send,
    ) -> Result<(), CheckError> {
        self.run(format, Some(Box::new(on_setup_complete))).await
    }

    async fn run(
        &self,
        format: &FormatDescriptor,
        on_setup_complete: Option<Box<dyn FnOnce() + Send + '_>>,
    ) -> Result<(), CheckError> {
        let keys = SyntheticIdentity::generate();
        tracing::debug!(
            name = %format.display_name(),
            version = ?self.version,
            "conformance check started"
        );

        // AwaitingSetup: hand the format its config and the one-shot
        // completion handle. Absent setup completes immediately.
        let (tx, rx) = oneshot::channel();
        let handle = SetupHandle::new(tx);
        let config = SetupConfig { keys: keys.clone() };
        match format.setup_fn() {
            Some(setup) => setup(config, handle),
            None => handle.done(),
        }

        let completed = match self.setup_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, rx).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(CheckError::SetupTimeout {
                        name: format.display_name(),
                        timeout,
                    });
                },
            },
            None => rx.await,
        };
        if completed.is_err() {
            return Err(CheckError::SetupAborted { name: format.display_name() });
        }
        tracing::trace!(name = %format.display_name(), "setup complete");

        if let Some(hook) = on_setup_complete {
            hook();
        }

        // Running: strictly sequential, fail-fast.
        let ctx = CheckContext { format, keys: &keys, version: self.version };
        for assertion in self.version.assertions() {
            assertion(&ctx)?;
        }

        tracing::debug!(name = %format.display_name(), "conformance check passed");
        Ok(())
    }
}

/// Check a format against the bare contract with no setup timeout.
///
/// Convenience wrapper over [`Checker`] for hosts that only speak the
/// original contract.
///
/// # Errors
///
/// Returns the first violated rule as a [`CheckError`].
pub async fn check(format: &FormatDescriptor) -> Result<(), CheckError> {
    Checker::default().check(format).await
}
