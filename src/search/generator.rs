//! Lazy enumeration of the candidate space.
//!
//! Each length is walked like an odometer in base `|alphabet|`: the rightmost
//! position turns fastest, so candidates come out in strictly increasing order
//! relative to the alphabet's ordering, with no gaps and no repeats.

use super::cancel::CancellationToken;
use super::config::SearchConfig;
use super::progress::SearchCounters;
use super::queue::{Candidate, PushOutcome, QueueProducer};
use tracing::{debug, info};

/// Every string of exactly one length over an alphabet.
pub struct Candidates<'a> {
    symbols: &'a [char],
    digits: Vec<usize>,
    exhausted: bool,
}

impl<'a> Candidates<'a> {
    pub fn new(symbols: &'a [char], length: usize) -> Self {
        Self {
            symbols,
            digits: vec![0; length],
            exhausted: symbols.is_empty(),
        }
    }

    /// Advance to the next digit combination. Returns `false` after the last one.
    fn advance(&mut self) -> bool {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.symbols.len() {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let candidate = self.digits.iter().map(|&d| self.symbols[d]).collect();
        self.exhausted = !self.advance();
        Some(candidate)
    }
}

/// Why the generator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorExit {
    /// The whole configured space was queued.
    Completed,
    Cancelled,
    /// No worker was left to consume candidates.
    Disconnected,
}

/// Sole producer of the work queue.
pub struct CandidateGenerator<'a> {
    config: &'a SearchConfig,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// All candidates from the minimum to the maximum length, in enumeration order.
    pub fn sequence(&self) -> impl Iterator<Item = Candidate> + use<'a> {
        let symbols = self.config.alphabet.symbols();
        (self.config.min_length..=self.config.max_length)
            .flat_map(move |length| Candidates::new(symbols, length))
    }

    /// Feed the queue until the space is exhausted or the token is triggered,
    /// then close the queue.
    pub fn run(
        &self,
        producer: QueueProducer,
        token: &CancellationToken,
        counters: &SearchCounters,
    ) -> GeneratorExit {
        let exit = self.fill(&producer, token, counters);
        debug!(
            "Generator stopped ({:?}) with {} candidates still buffered",
            exit,
            producer.len()
        );
        producer.close();
        exit
    }

    fn fill(
        &self,
        producer: &QueueProducer,
        token: &CancellationToken,
        counters: &SearchCounters,
    ) -> GeneratorExit {
        let symbols = self.config.alphabet.symbols();

        for length in self.config.min_length..=self.config.max_length {
            if token.is_cancelled() {
                return GeneratorExit::Cancelled;
            }

            counters.begin_length(length);
            match self.config.candidates_of_length(length) {
                Some(count) => {
                    info!("Starting brute-force for length {length} ({count} candidates)")
                }
                None => info!("Starting brute-force for length {length}"),
            }

            for candidate in Candidates::new(symbols, length) {
                if token.is_cancelled() {
                    return GeneratorExit::Cancelled;
                }
                match producer.push(candidate, token) {
                    PushOutcome::Queued => counters.record_generated(),
                    PushOutcome::Cancelled => return GeneratorExit::Cancelled,
                    PushOutcome::Disconnected => return GeneratorExit::Disconnected,
                }
            }
        }

        GeneratorExit::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::config::Alphabet;
    use crate::search::queue::WorkQueue;
    use std::collections::HashSet;
    use std::thread;
    use std::time::Duration;

    fn config(alphabet: &str, min: usize, max: usize) -> SearchConfig {
        SearchConfig::new(Alphabet::new(alphabet).unwrap(), min, max)
            .with_queue_capacity(8)
            .with_push_poll(Duration::from_millis(5))
    }

    #[test]
    fn test_binary_sequence_two_to_three() {
        let config = config("01", 2, 3);
        let sequence: Vec<String> = CandidateGenerator::new(&config).sequence().collect();
        assert_eq!(
            sequence,
            vec![
                "00", "01", "10", "11", "000", "001", "010", "011", "100", "101", "110", "111"
            ]
        );
    }

    #[test]
    fn test_each_length_is_complete_unique_and_ordered() {
        let symbols: Vec<char> = "abcd".chars().collect();
        for length in 1..=4 {
            let all: Vec<String> = Candidates::new(&symbols, length).collect();
            assert_eq!(all.len(), 4usize.pow(length as u32));

            let unique: HashSet<&String> = all.iter().collect();
            assert_eq!(unique.len(), all.len());

            // "abcd" is already in char order, so plain string order applies
            assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(all.iter().all(|c| c.chars().count() == length));
        }
    }

    #[test]
    fn test_order_follows_alphabet_order() {
        let symbols: Vec<char> = "ba".chars().collect();
        let all: Vec<String> = Candidates::new(&symbols, 2).collect();
        assert_eq!(all, vec!["bb", "ba", "ab", "aa"]);
    }

    #[test]
    fn test_run_queues_everything_then_closes() {
        let config = config("xyz", 1, 2);
        let (producer, consumer) = WorkQueue::bounded(config.queue_capacity, config.push_poll);
        let token = CancellationToken::new();
        let counters = SearchCounters::default();

        let reader = thread::spawn(move || {
            let mut seen = Vec::new();
            while let Some(candidate) = consumer.pop() {
                seen.push(candidate);
            }
            seen
        });

        let exit = CandidateGenerator::new(&config).run(producer, &token, &counters);
        let seen = reader.join().unwrap();

        assert_eq!(exit, GeneratorExit::Completed);
        assert_eq!(seen.len(), 12);
        assert_eq!(seen.first().map(String::as_str), Some("x"));
        assert_eq!(seen.last().map(String::as_str), Some("zz"));
        assert_eq!(counters.snapshot().generated, 12);
    }

    #[test]
    fn test_run_stops_promptly_after_cancel() {
        let config = config("0123456789", 6, 8);
        let (producer, consumer) = WorkQueue::bounded(config.queue_capacity, config.push_poll);
        let token = CancellationToken::new();
        let counters = SearchCounters::default();

        // Nobody consumes; the generator fills the queue and blocks until cancelled
        let canceller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            canceller.cancel();
        });

        let exit = CandidateGenerator::new(&config).run(producer, &token, &counters);
        handle.join().unwrap();

        assert_eq!(exit, GeneratorExit::Cancelled);
        assert_eq!(counters.snapshot().generated, config.queue_capacity as u64);
        drop(consumer);
    }

    #[test]
    fn test_run_with_pre_cancelled_token_queues_nothing() {
        let config = config("01", 1, 4);
        let (producer, consumer) = WorkQueue::bounded(config.queue_capacity, config.push_poll);
        let token = CancellationToken::new();
        token.cancel();

        let counters = SearchCounters::default();
        let exit = CandidateGenerator::new(&config).run(producer, &token, &counters);

        assert_eq!(exit, GeneratorExit::Cancelled);
        assert_eq!(consumer.pop(), None);
    }
}
