//! Bounded FIFO between the candidate generator and the worker pool.
//!
//! A full queue blocks the producer, which is what throttles generation to the
//! pace of validation. The producer half is consumed on close, so the queue is
//! closed exactly once; consumers see the end of the stream once it is both
//! closed and drained.

use super::cancel::CancellationToken;
use crossbeam::channel::{Receiver, SendTimeoutError, Sender, bounded};
use std::time::Duration;

/// One guess, drawn from the configured alphabet.
pub type Candidate = String;

/// Result of trying to hand a candidate to the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Cancellation was observed while waiting for room.
    Cancelled,
    /// Every consumer has gone away.
    Disconnected,
}

pub struct WorkQueue;

impl WorkQueue {
    /// Create a queue holding at most `capacity` candidates.
    ///
    /// `poll` bounds how long a blocked push waits before re-checking cancellation.
    pub fn bounded(capacity: usize, poll: Duration) -> (QueueProducer, QueueConsumer) {
        let (tx, rx): (Sender<Candidate>, Receiver<Candidate>) = bounded(capacity);
        (QueueProducer { tx, poll }, QueueConsumer { rx })
    }
}

/// Sole writer of the queue.
pub struct QueueProducer {
    tx: Sender<Candidate>,
    poll: Duration,
}

impl QueueProducer {
    /// Insert a candidate, blocking while the queue is full.
    pub fn push(&self, candidate: Candidate, token: &CancellationToken) -> PushOutcome {
        let mut pending = candidate;
        loop {
            if token.is_cancelled() {
                return PushOutcome::Cancelled;
            }
            match self.tx.send_timeout(pending, self.poll) {
                Ok(()) => return PushOutcome::Queued,
                Err(SendTimeoutError::Timeout(candidate)) => pending = candidate,
                Err(SendTimeoutError::Disconnected(_)) => return PushOutcome::Disconnected,
            }
        }
    }

    /// Number of candidates currently buffered.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// Close the queue. Buffered candidates stay available to consumers.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Shared reading end; clone one per worker.
#[derive(Clone)]
pub struct QueueConsumer {
    rx: Receiver<Candidate>,
}

impl QueueConsumer {
    /// Next candidate in FIFO order, or `None` once the queue is closed and empty.
    pub fn pop(&self) -> Option<Candidate> {
        self.rx.recv().ok()
    }
}
