//! Search configuration: alphabet, length range and pool sizing.

use super::error::ConfigError;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DIGITS: &str = "0123456789";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const HEX: &str = "0123456789abcdef";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

/// Named character sets accepted wherever an alphabet is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Digits,
    Lower,
    Upper,
    Alpha,
    Alnum,
    Hex,
    Symbols,
    Printable,
}

impl Charset {
    pub const ALL: [Charset; 8] = [
        Charset::Digits,
        Charset::Lower,
        Charset::Upper,
        Charset::Alpha,
        Charset::Alnum,
        Charset::Hex,
        Charset::Symbols,
        Charset::Printable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Charset::Digits => "digits",
            Charset::Lower => "lower",
            Charset::Upper => "upper",
            Charset::Alpha => "alpha",
            Charset::Alnum => "alnum",
            Charset::Hex => "hex",
            Charset::Symbols => "symbols",
            Charset::Printable => "printable",
        }
    }

    /// Characters of this set, in enumeration order.
    pub fn symbols(self) -> String {
        match self {
            Charset::Digits => DIGITS.to_string(),
            Charset::Lower => LOWER.to_string(),
            Charset::Upper => UPPER.to_string(),
            Charset::Alpha => [LOWER, UPPER].concat(),
            Charset::Alnum => [DIGITS, LOWER, UPPER].concat(),
            Charset::Hex => HEX.to_string(),
            Charset::Symbols => SYMBOLS.to_string(),
            Charset::Printable => [DIGITS, LOWER, UPPER, SYMBOLS].concat(),
        }
    }
}

impl FromStr for Charset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::ALL
            .into_iter()
            .find(|charset| charset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownCharset(s.to_string()))
    }
}

const LITERAL_PREFIX: &str = "literal:";

/// Ordered set of unique characters candidates are drawn from.
///
/// The order given at construction is the lexicographic order of the search:
/// for the alphabet `"10"`, `"1"` sorts before `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self, ConfigError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        for &symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(ConfigError::DuplicateSymbol(symbol));
            }
        }

        Ok(Self { symbols })
    }

    /// Resolve either a preset name (`digits`, `alnum`, ...) or a literal set of characters.
    ///
    /// Preset names take precedence; `literal:` forces the rest to be read as characters.
    pub fn from_spec(spec: &str) -> Result<Self, ConfigError> {
        if let Some(literal) = spec.strip_prefix(LITERAL_PREFIX) {
            return Self::new(literal);
        }
        match spec.parse::<Charset>() {
            Ok(charset) => Ok(charset.into()),
            Err(_) => Self::new(spec),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl From<Charset> for Alphabet {
    fn from(charset: Charset) -> Self {
        Self {
            symbols: charset.symbols().chars().collect(),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Charset::Digits.into()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Configuration of one search. Immutable once the search starts.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub alphabet: Alphabet,
    pub min_length: usize,
    pub max_length: usize,
    /// Capacity of the bounded queue between the generator and the workers
    pub queue_capacity: usize,
    /// Number of concurrent validation workers
    pub workers: usize,
    /// How often the progress reporter emits a snapshot
    pub progress_interval: Duration,
    /// Longest the generator waits on a full queue before re-checking cancellation
    pub push_poll: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            min_length: 6,
            max_length: 10,
            queue_capacity: 1000,
            workers: default_workers(),
            progress_interval: Duration::from_secs(2),
            push_poll: Duration::from_millis(50),
        }
    }
}

impl SearchConfig {
    pub fn new(alphabet: Alphabet, min_length: usize, max_length: usize) -> Self {
        Self {
            alphabet,
            min_length,
            max_length,
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_push_poll(mut self, poll: Duration) -> Self {
        self.push_poll = poll;
        self
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if self.min_length == 0 {
            return Err(ConfigError::ZeroMinLength);
        }
        if self.min_length > self.max_length {
            return Err(ConfigError::LengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.progress_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("progress"));
        }
        if self.push_poll.is_zero() {
            return Err(ConfigError::ZeroInterval("queue poll"));
        }
        Ok(())
    }

    /// Number of candidates of exactly `length` characters.
    pub fn candidates_of_length(&self, length: usize) -> Option<u128> {
        let exponent = u32::try_from(length).ok()?;
        (self.alphabet.len() as u128).checked_pow(exponent)
    }

    /// Total number of candidates in the configured space, `None` if it overflows `u128`.
    pub fn space_size(&self) -> Option<u128> {
        (self.min_length..=self.max_length).try_fold(0u128, |total, length| {
            total.checked_add(self.candidates_of_length(length)?)
        })
    }
}

/// Half the logical cores, rounded up, and never less than one.
pub fn default_workers() -> usize {
    std::cmp::max(1, num_cpus::get().div_ceil(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(min: usize, max: usize) -> SearchConfig {
        SearchConfig::new(Alphabet::new("01").unwrap(), min, max)
            .with_workers(2)
            .with_queue_capacity(4)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alphabet.to_string(), "0123456789");
        assert_eq!(config.queue_capacity, 1000);
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_alphabet_rejects_empty_and_duplicates() {
        assert_eq!(Alphabet::new(""), Err(ConfigError::EmptyAlphabet));
        assert_eq!(Alphabet::new("abca"), Err(ConfigError::DuplicateSymbol('a')));
    }

    #[test]
    fn test_alphabet_from_spec() {
        assert_eq!(Alphabet::from_spec("hex").unwrap().len(), 16);
        assert_eq!(Alphabet::from_spec("ALNUM").unwrap().len(), 62);
        assert_eq!(Alphabet::from_spec("xyz").unwrap().to_string(), "xyz");
        assert_eq!(Alphabet::from_spec("printable").unwrap().len(), 94);
    }

    #[test]
    fn test_literal_prefix_overrides_preset_names() {
        assert_eq!(Alphabet::from_spec("literal:hex").unwrap().symbols(), &['h', 'e', 'x']);
        assert_eq!(Alphabet::from_spec("literal:01").unwrap().to_string(), "01");
        assert_eq!(Alphabet::from_spec("literal:"), Err(ConfigError::EmptyAlphabet));
    }

    #[test]
    fn test_alphabet_keeps_unicode_symbols() {
        let alphabet = Alphabet::new("äöü").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbols(), &['ä', 'ö', 'ü']);
    }

    #[test]
    fn test_validation_rejections() {
        assert_eq!(binary(0, 3).validate(), Err(ConfigError::ZeroMinLength));
        assert_eq!(
            binary(3, 2).validate(),
            Err(ConfigError::LengthRange { min: 3, max: 2 })
        );
        assert_eq!(
            binary(1, 2).with_workers(0).validate(),
            Err(ConfigError::ZeroWorkers)
        );
        assert_eq!(
            binary(1, 2).with_queue_capacity(0).validate(),
            Err(ConfigError::ZeroQueueCapacity)
        );
        assert_eq!(
            binary(1, 2)
                .with_progress_interval(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroInterval("progress"))
        );
    }

    #[test]
    fn test_space_size() {
        assert_eq!(binary(2, 3).space_size(), Some(12));
        assert_eq!(binary(1, 1).space_size(), Some(2));

        let huge = SearchConfig::new(Charset::Printable.into(), 1, 40);
        assert_eq!(huge.space_size(), None);
    }
}
