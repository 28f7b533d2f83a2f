use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot cancellation signal scoped to a single search.
///
/// Clones share the same flag. Triggering is irreversible and idempotent;
/// checking never blocks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation. Returns `true` only for the call that flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
