//! Concurrent exhaustive search engine
//!
//! Enumerates every string over an alphabet within a length range and tests
//! each one with a [`Validator`](crate::validate::Validator) until one succeeds.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   bounded    ┌──────────────┐   first match   ┌─────────────┐
//! │  Generator  │───  queue ──▶│  Worker pool │───── slot ─────▶│ Coordinator │
//! │ (1 thread)  │  (blocks     │  (N threads) │                 │             │
//! └─────────────┘   when full) └──────────────┘                 └─────────────┘
//!        ▲                            │                                │
//!        └──────── CancellationToken ◀┴────────────────────────────────┘
//! ```
//!
//! - The generator is the only producer and closes the queue when it is done
//!   or cancelled.
//! - Workers pull until the queue is closed and drained. The first success
//!   claims the result slot and triggers the token.
//! - The coordinator waits for either a published match or every worker
//!   exiting, joins everything, stops the progress reporter and returns one
//!   [`SearchResult`].
//!
//! # Example
//!
//! ```rust
//! use unlockr::search::{Alphabet, SearchConfig, SearchCoordinator};
//!
//! let config = SearchConfig::new(Alphabet::new("0123456789").unwrap(), 1, 4).with_workers(2);
//! let coordinator =
//!     SearchCoordinator::new(config, |pin: &str| Ok::<_, String>(pin == "0815")).unwrap();
//!
//! let outcome = coordinator.run().unwrap();
//! assert_eq!(outcome.result.password(), Some("0815"));
//! ```

pub mod cancel;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod generator;
pub mod progress;
pub mod queue;
pub mod worker;

// Re-export main types for easier access
pub use cancel::CancellationToken;
pub use config::{Alphabet, Charset, SearchConfig, default_workers};
pub use coordinator::{SearchCoordinator, SearchOutcome, SearchResult, SearchStats};
pub use error::{ConfigError, SearchError};
pub use generator::{CandidateGenerator, Candidates};
pub use progress::{ProgressSnapshot, SearchCounters};
pub use queue::{Candidate, WorkQueue};
