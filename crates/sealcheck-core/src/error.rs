//! Checker error taxonomy.
//!
//! One variant per violated rule. A failed check surfaces exactly one
//! of these: the battery is fail-fast, so later violations are never
//! observed once an earlier one fires. The `Display` wording is stable;
//! hosts match on it when surfacing format-author-facing diagnostics.

use std::time::Duration;

use thiserror::Error;

/// A single violated conformance rule.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Required descriptor field absent or not a usable string.
    #[error("your encryption format requires the field \"{field}\" as a string")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },

    /// Required callable absent.
    #[error("your encryption format \"{name}\" requires the function \"{method}()\"")]
    MissingMethod {
        /// Declared format name.
        name: String,
        /// The missing callable.
        method: &'static str,
    },

    /// Name or suffix contains a dot, which collides with the on-wire
    /// tag separator.
    #[error("your encryption format \"{name}\" has a name \"{value}\" with a dot. This is not allowed.")]
    InvalidNameDot {
        /// Declared format name.
        name: String,
        /// The offending name or suffix.
        value: String,
    },

    /// Name or suffix falls outside lowercase alphanumerics.
    #[error(
        "your encryption format \"{name}\" has a name \"{value}\" with invalid characters. This is not allowed."
    )]
    InvalidNameChars {
        /// Declared format name.
        name: String,
        /// The offending name or suffix.
        value: String,
    },

    /// `encrypt` returned something other than a byte buffer.
    #[error("your encryption format \"{name}\" encrypt() function must return a buffer")]
    EncryptNotBuffer {
        /// Declared format name.
        name: String,
    },

    /// `decrypt` returned something other than a byte buffer.
    #[error("your encryption format \"{name}\" decrypt() function must return a buffer")]
    DecryptNotBuffer {
        /// Declared format name.
        name: String,
    },

    /// Decrypted output differs from the plaintext encrypt received.
    #[error(
        "your encryption format \"{name}\" decrypt() function must return the same plaintext as encrypt() received"
    )]
    RoundTripMismatch {
        /// Declared format name.
        name: String,
    },

    /// `setup` dropped its completion handle without signalling.
    #[error("your encryption format \"{name}\" setup() was aborted before signalling completion")]
    SetupAborted {
        /// Declared format name.
        name: String,
    },

    /// `setup` did not complete within the configured timeout.
    #[error("your encryption format \"{name}\" setup() did not complete within {timeout:?}")]
    SetupTimeout {
        /// Declared format name.
        name: String,
        /// The configured timeout.
        timeout: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_method_wording_is_stable() {
        let err = CheckError::MissingMethod { name: "cool".to_string(), method: "encrypt" };
        assert_eq!(
            err.to_string(),
            "your encryption format \"cool\" requires the function \"encrypt()\""
        );
    }

    #[test]
    fn dot_error_names_the_offending_value() {
        let err =
            CheckError::InvalidNameDot { name: ".cool".to_string(), value: ".cool".to_string() };
        assert!(err.to_string().contains("has a name \".cool\" with a dot"));
    }

    #[test]
    fn round_trip_wording_is_stable() {
        let err = CheckError::RoundTripMismatch { name: "cool".to_string() };
        assert!(
            err.to_string()
                .contains("decrypt() function must return the same plaintext as encrypt() received")
        );
    }

    #[test]
    fn setup_timeout_reports_the_duration() {
        let err = CheckError::SetupTimeout {
            name: "cool".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().contains("250ms"));
    }
}
