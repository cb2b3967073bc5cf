//! Contract versions.
//!
//! The host protocol grew a second descriptor contract over time: the
//! original one keyed on `name` alone, the newer one additionally
//! requiring a `suffix` tag and richer call-site options. Both are the
//! same checker with a different ordered assertion list, so the version
//! is a small enum rather than two checkers.

use crate::checker::{
    Assertion, assert_decrypt_present, assert_decrypt_returns_buffer, assert_encrypt_present,
    assert_encrypt_returns_buffer, assert_name_field, assert_name_syntax, assert_round_trip,
    assert_suffix_field, assert_suffix_syntax,
};

/// Ordered battery for the bare (name-only) contract.
static BARE_ASSERTIONS: &[Assertion] = &[
    assert_name_field,
    assert_encrypt_present,
    assert_decrypt_present,
    assert_name_syntax,
    assert_encrypt_returns_buffer,
    assert_decrypt_returns_buffer,
    assert_round_trip,
];

/// Ordered battery for the suffixed contract.
///
/// The suffix checks slot in directly after their name counterparts.
static SUFFIXED_ASSERTIONS: &[Assertion] = &[
    assert_name_field,
    assert_suffix_field,
    assert_encrypt_present,
    assert_decrypt_present,
    assert_name_syntax,
    assert_suffix_syntax,
    assert_encrypt_returns_buffer,
    assert_decrypt_returns_buffer,
    assert_round_trip,
];

/// Which descriptor contract a format is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractVersion {
    /// Original contract: `name` only, self-addressed options.
    #[default]
    Bare,
    /// Newer contract: `name` plus `suffix`, options carrying the
    /// previous-message pointer and a declared author.
    Suffixed,
}

impl ContractVersion {
    /// Whether this contract requires the `suffix` field.
    pub fn requires_suffix(self) -> bool {
        matches!(self, Self::Suffixed)
    }

    /// The ordered assertion battery for this contract.
    pub(crate) fn assertions(self) -> &'static [Assertion] {
        match self {
            Self::Bare => BARE_ASSERTIONS,
            Self::Suffixed => SUFFIXED_ASSERTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_is_the_default() {
        assert_eq!(ContractVersion::default(), ContractVersion::Bare);
        assert!(!ContractVersion::Bare.requires_suffix());
    }

    #[test]
    fn suffixed_battery_extends_the_bare_one() {
        assert!(ContractVersion::Suffixed.requires_suffix());
        assert_eq!(
            ContractVersion::Suffixed.assertions().len(),
            ContractVersion::Bare.assertions().len() + 2
        );
    }
}
