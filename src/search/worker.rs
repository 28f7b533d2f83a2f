//! Validation workers and the single-slot result channel.

use super::cancel::CancellationToken;
use super::progress::SearchCounters;
use super::queue::{Candidate, QueueConsumer};
use crate::validate::Validator;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Write-once result channel: the first successful worker claims it, every
/// later attempt is refused without blocking.
#[derive(Clone)]
pub struct ResultSlot {
    claimed: Arc<AtomicBool>,
    tx: Sender<Candidate>,
}

impl ResultSlot {
    /// The receiver yields the winning candidate, or disconnects once every
    /// clone of the slot is dropped without a publication.
    pub fn new() -> (Self, Receiver<Candidate>) {
        let (tx, rx) = bounded(1);
        let slot = Self {
            claimed: Arc::new(AtomicBool::new(false)),
            tx,
        };
        (slot, rx)
    }

    /// Returns `true` if this call won the slot.
    pub fn publish(&self, candidate: Candidate) -> bool {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.tx.try_send(candidate).is_ok()
    }
}

/// What a worker did before it exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub tested: u64,
    /// This worker's match was the one published
    pub published: bool,
}

/// One consumer of the work queue.
pub struct Worker<'a> {
    id: usize,
    queue: QueueConsumer,
    slot: ResultSlot,
    token: CancellationToken,
    validator: &'a dyn Validator,
    counters: &'a SearchCounters,
}

impl Worker<'_> {
    /// Test candidates until the queue is closed and drained, or the search is cancelled.
    pub fn run(self) -> WorkerReport {
        debug!("Worker {} started", self.id);
        let mut report = WorkerReport {
            worker_id: self.id,
            tested: 0,
            published: false,
        };

        while !self.token.is_cancelled() {
            let Some(candidate) = self.queue.pop() else {
                break;
            };
            if self.token.is_cancelled() {
                break;
            }

            report.tested += 1;
            self.counters.record_tested();

            match self.validator.validate(&candidate) {
                Ok(true) => {
                    report.published = self.slot.publish(candidate);
                    self.token.cancel();
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    self.counters.record_validation_error();
                    trace!("Worker {}: candidate rejected: {}", self.id, e);
                }
            }
        }

        debug!(
            "Worker {} exiting after {} candidates",
            self.id, report.tested
        );
        report
    }
}

/// Fixed-size set of workers sharing one validator.
pub struct WorkerPool<'a> {
    size: usize,
    validator: &'a dyn Validator,
    counters: &'a SearchCounters,
}

impl<'a> WorkerPool<'a> {
    pub fn new(size: usize, validator: &'a dyn Validator, counters: &'a SearchCounters) -> Self {
        Self {
            size,
            validator,
            counters,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Build the workers, each attached to the shared queue and result slot.
    ///
    /// The passed-in queue and slot handles are consumed so that only workers
    /// keep them alive.
    pub fn workers(
        &self,
        queue: QueueConsumer,
        slot: ResultSlot,
        token: &CancellationToken,
    ) -> Vec<Worker<'a>> {
        (0..self.size)
            .map(|id| Worker {
                id,
                queue: queue.clone(),
                slot: slot.clone(),
                token: token.clone(),
                validator: self.validator,
                counters: self.counters,
            })
            .collect()
    }
}
