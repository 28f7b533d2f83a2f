use crossbeam::channel::{Receiver, select, tick};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Search statistics tracked atomically across threads
#[derive(Debug, Default)]
pub struct SearchCounters {
    generated: AtomicU64,
    tested: AtomicU64,
    validation_errors: AtomicU64,
    current_length: AtomicUsize,
}

impl SearchCounters {
    pub fn record_generated(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tested(&self) {
        self.tested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_error(&self) {
        self.validation_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn begin_length(&self, length: usize) {
        self.current_length.store(length, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            tested: self.tested.load(Ordering::Relaxed),
            validation_errors: self.validation_errors.load(Ordering::Relaxed),
            current_length: self.current_length.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub generated: u64,
    pub tested: u64,
    pub validation_errors: u64,
    /// Length the generator is currently enumerating (0 before it starts)
    pub current_length: usize,
}

/// What the reporter hands to its sink on every tick.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot {
    pub elapsed: Duration,
    pub counts: CounterSnapshot,
}

impl ProgressSnapshot {
    /// Candidates tested per second so far.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.counts.tested as f64 / secs
        } else {
            0.0
        }
    }
}

/// Callback receiving periodic progress snapshots.
pub type ProgressSink = Box<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Emits elapsed time and counters on a fixed interval until told to stop.
///
/// Purely observational; a slow sink delays only the next tick.
pub struct ProgressReporter<'a> {
    interval: Duration,
    started: Instant,
    counters: &'a SearchCounters,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(interval: Duration, started: Instant, counters: &'a SearchCounters) -> Self {
        Self {
            interval,
            started,
            counters,
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            elapsed: self.started.elapsed(),
            counts: self.counters.snapshot(),
        }
    }

    /// Tick until `stop` is signalled or its sender is dropped.
    pub fn run<F>(&self, stop: Receiver<()>, sink: F)
    where
        F: Fn(&ProgressSnapshot),
    {
        let ticker = tick(self.interval);
        loop {
            select! {
                recv(ticker) -> _ => sink(&self.snapshot()),
                recv(stop) -> _ => break,
            }
        }
    }
}

/// Default sink: one log line per tick.
pub fn log_progress(snapshot: &ProgressSnapshot) {
    tracing::info!(
        "Working... (elapsed {:.0}s, length {}, {} tested, {:.0}/s)",
        snapshot.elapsed.as_secs_f64(),
        snapshot.counts.current_length,
        snapshot.counts.tested,
        snapshot.rate()
    );
}
