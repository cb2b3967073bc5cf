//! Conformance checker for pluggable encryption formats.
//!
//! Third parties can author new encryption formats for the host
//! messaging protocol. Before the host trusts a format with real user
//! data, it runs the format through this checker: an asynchronous setup
//! handshake followed by a fixed battery of assertions covering the
//! structural contract (required fields, naming rules) and the
//! behavioral contract (encrypt/decrypt is an invertible pair returning
//! byte buffers).
//!
//! ## Architecture
//!
//! ```text
//! sealcheck-core
//!   ├─ FormatDescriptor   (dynamic shape of the module under test)
//!   ├─ ContractVersion    (Bare / Suffixed assertion lists)
//!   ├─ EncryptOpts/DecryptOpts (per-assertion call-site context)
//!   ├─ Checker            (setup handshake + assertion battery)
//!   └─ CheckError         (one violated rule per failed check)
//! ```
//!
//! The checker is fail-fast: assertions run in a fixed order and the
//! first violation aborts the rest, so a caller always sees exactly one
//! error per check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod contract;
mod descriptor;
mod error;
mod options;

pub use checker::{Checker, check};
pub use contract::ContractVersion;
pub use descriptor::{FormatDescriptor, FormatValue, SetupConfig, SetupHandle};
pub use error::CheckError;
pub use options::{DecryptOpts, EncryptOpts, PLAINTEXT_FIXTURE, PREVIOUS_FIXTURE};
