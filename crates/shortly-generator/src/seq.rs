use crate::Generator;
use shortly_core::{Alias, CoreError};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic alias generator using a sequential counter.
///
/// This generator produces codes like "wh000000", "wh000001", etc. It is
/// meant for tests and tooling that need predictable aliases. With a
/// `period` the counter wraps around, which makes collisions with aliases
/// already in a store reproducible.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
    period: Option<u64>,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
            period: self.period,
        }
    }
}

impl SeqGenerator {
    /// Creates a new sequential generator with an alphanumeric prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Result<Self, CoreError> {
        Self::with_offset(prefix, 0)
    }

    /// Creates a new sequential generator starting from a specific counter value.
    ///
    /// Fails when the prefix would produce codes that are not valid aliases.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Result<Self, CoreError> {
        let prefix = prefix.into();
        Alias::new(format_code(&prefix, offset))?;
        Ok(Self {
            counter: AtomicU64::new(offset),
            prefix,
            period: None,
        })
    }

    /// Creates a generator that cycles through `period` distinct codes.
    pub fn cycling(prefix: impl Into<String>, period: u64) -> Result<Self, CoreError> {
        let prefix = prefix.into();
        let period = period.max(1);
        // the longest code in the cycle is the last one
        Alias::new(format_code(&prefix, period - 1))?;
        Ok(Self {
            counter: AtomicU64::new(0),
            prefix,
            period: Some(period),
        })
    }
}

fn format_code(prefix: &str, count: u64) -> String {
    format!("{prefix}{count:06}")
}

impl Generator for SeqGenerator {
    fn generate(&self) -> Alias {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let count = match self.period {
            Some(period) => count % period,
            None => count,
        };
        Alias::new_unchecked(format_code(&self.prefix, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_sequential_codes() {
        let generator = SeqGenerator::with_prefix("wh").unwrap();

        assert_eq!(generator.generate().as_str(), "wh000000");
        assert_eq!(generator.generate().as_str(), "wh000001");
        assert_eq!(generator.generate().as_str(), "wh000002");
    }

    #[test]
    fn with_offset() {
        let generator = SeqGenerator::with_offset("wh", 1000).unwrap();

        assert_eq!(generator.generate().as_str(), "wh001000");
        assert_eq!(generator.generate().as_str(), "wh001001");
    }

    #[test]
    fn cycling_wraps_around() {
        let generator = SeqGenerator::cycling("cy", 2).unwrap();

        assert_eq!(generator.generate().as_str(), "cy000000");
        assert_eq!(generator.generate().as_str(), "cy000001");
        assert_eq!(generator.generate().as_str(), "cy000000");
    }

    #[test]
    fn rejects_prefixes_outside_the_alphabet() {
        assert!(matches!(
            SeqGenerator::with_prefix("node-a"),
            Err(CoreError::InvalidAlias(_))
        ));
        assert!(SeqGenerator::cycling("wh_", 3).is_err());
    }

    #[test]
    fn rejects_prefixes_that_overflow_alias_length() {
        // 26 + 6 digits is the longest valid code
        assert!(SeqGenerator::with_prefix("a".repeat(26)).is_ok());
        assert!(SeqGenerator::with_prefix("a".repeat(27)).is_err());
        assert!(SeqGenerator::with_offset("a".repeat(26), 10_000_000).is_err());
        assert!(SeqGenerator::cycling("a".repeat(26), 10_000_001).is_err());
    }

    #[test]
    fn generated_codes_are_valid_aliases() {
        let generator = SeqGenerator::with_prefix("node").unwrap();
        let alias = generator.generate();
        assert!(Alias::new(alias.as_str()).is_ok());
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::with_prefix("wh").unwrap();
        generator.generate();
        generator.generate();

        let cloned = generator.clone();

        assert_eq!(generator.generate().as_str(), "wh000002");
        assert_eq!(cloned.generate().as_str(), "wh000002");
    }
}
