//! Foundation utilities shared across the `foundrydata` workspace.
//!
//! This crate carries the ambient concerns every other crate needs and
//! should not reimplement: a closed error taxonomy mapped to stable CLI
//! exit codes, tracing bootstrap, atomic file writes (for coverage
//! reports and resolver snapshots), process memory sampling (for the
//! metrics snapshot's memory peak), and content-hash helpers used for
//! target ids and the resolver fingerprint.

pub mod atomic_write;
pub mod error;
pub mod exit_codes;
pub mod hashing;
pub mod logging;
pub mod paths;
pub mod process_memory;

pub use error::FoundryError;
pub use exit_codes::ExitCode;
