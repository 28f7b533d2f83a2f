//! # unlockr - concurrent brute-force password recovery
//!
//! Enumerates every candidate over a character set and length range, feeds
//! them through a bounded queue to a pool of workers, and stops everything
//! the moment one worker's validator accepts a candidate.
//!
//! ## Features
//!
//! - **Bounded work queue**: a slow validator throttles generation instead of exhausting memory
//! - **Early termination**: one cancellation token stops the generator and every worker
//! - **Pluggable validation**: SHA-256 digests, external programs, or any closure
//! - **Layered configuration**: defaults, config files, environment and flags
//!
//! ## Quick Start
//!
//! ```bash
//! # Recover a 4-digit PIN from its SHA-256 digest
//! echo -n 4711 | sha256sum | cut -d' ' -f1 > pin.sha256
//! unlockr crack pin.sha256 --charset digits --min 1 --max 4
//!
//! # Let qpdf check candidates against a locked PDF
//! unlockr crack locked.pdf --validator command \
//!     --command "qpdf --password={password} --check {file}"
//! ```

pub mod cli;
pub mod config;
pub mod search;
pub mod validate;

pub use cli::{Cli, Output};
pub use config::UnlockrConfig;

/// Result type alias for unlockr operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
