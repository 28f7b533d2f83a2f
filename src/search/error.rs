//! Error types for the search engine.
//!
//! Only configuration problems and abnormal shutdowns propagate out of a search.
//! Per-candidate validation failures never leave the worker pool.

use thiserror::Error;

/// Rejected search configuration, detected before any component starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    #[error("alphabet contains '{0}' more than once")]
    DuplicateSymbol(char),

    #[error("minimum length must be greater than zero")]
    ZeroMinLength,

    #[error("minimum length {min} is greater than maximum length {max}")]
    LengthRange { min: usize, max: usize },

    #[error("worker count must be greater than zero")]
    ZeroWorkers,

    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("unknown character set '{0}'")]
    UnknownCharset(String),
}

/// Failure of a search invocation as a whole.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    /// The caller triggered cancellation before any candidate matched.
    #[error("search cancelled before a match was found")]
    Cancelled,

    #[error("a search thread panicked")]
    WorkerPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::LengthRange { min: 4, max: 2 };
        assert_eq!(
            err.to_string(),
            "minimum length 4 is greater than maximum length 2"
        );

        let err: SearchError = ConfigError::ZeroWorkers.into();
        assert!(err.to_string().contains("worker count"));
    }
}
