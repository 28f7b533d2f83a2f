//! Candidate validation
//!
//! The search engine knows nothing about what it is attacking. It only calls a
//! [`Validator`] with each candidate; whatever the validator is bound to (a file
//! read into memory, an external tool) stays on this side of the boundary.
//!
//! Two validators ship with the binary:
//! - [`DigestValidator`]: the target holds a hex SHA-256 digest of the password
//! - [`CommandValidator`]: an external program decides, e.g.
//!   `qpdf --password={password} --check {file}`
//!
//! Any closure `Fn(&str) -> Result<bool, E>` is also a validator.

pub mod command;
pub mod digest;

pub use command::CommandValidator;
pub use digest::DigestValidator;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// A candidate could not be checked. Treated the same as a wrong password.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Decides whether one candidate unlocks the target.
///
/// Called concurrently from every worker, so implementations must only read
/// shared state.
pub trait Validator: Send + Sync {
    fn validate(&self, candidate: &str) -> Result<bool, ValidationError>;
}

impl<F, E> Validator for F
where
    F: Fn(&str) -> Result<bool, E> + Send + Sync,
    E: fmt::Display,
{
    fn validate(&self, candidate: &str) -> Result<bool, ValidationError> {
        self(candidate).map_err(|e| ValidationError::new(e.to_string()))
    }
}

/// Problems with the target, reported before a search starts.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is empty")]
    Empty(PathBuf),

    #[error("invalid SHA-256 digest: {0}")]
    InvalidDigest(String),

    #[error("validator command is empty")]
    EmptyCommand,

    #[error("validator program '{0}' not found on PATH")]
    MissingProgram(String),
}

/// The target file, read once and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct Payload {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl Payload {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PayloadError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|source| PayloadError::Read {
            path: path.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(PayloadError::Empty(path));
        }
        tracing::debug!("Loaded {} bytes from {}", bytes.len(), path.display());

        Ok(Self {
            path,
            bytes: bytes.into(),
        })
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
