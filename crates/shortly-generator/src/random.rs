use crate::Generator;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shortly_core::{Alias, CoreError, ALPHABET, DEFAULT_ALIAS_LENGTH};

enum Source {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Samples each character independently and uniformly from [`ALPHABET`].
///
/// With the default length of 6 there are 62^6 possible aliases, so
/// collisions stay rare until the store holds billions of mappings.
pub struct RandomGenerator {
    length: usize,
    source: Source,
}

impl RandomGenerator {
    /// Creates a generator of [`DEFAULT_ALIAS_LENGTH`]-character aliases
    /// backed by the thread-local RNG.
    pub fn new() -> Self {
        Self {
            length: DEFAULT_ALIAS_LENGTH,
            source: Source::Thread,
        }
    }

    /// Creates a generator with a reproducible stream of aliases.
    pub fn seeded(seed: u64) -> Self {
        Self {
            length: DEFAULT_ALIAS_LENGTH,
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Changes the alias length. The length must itself be a valid alias
    /// length.
    pub fn with_length(mut self, length: usize) -> Result<Self, CoreError> {
        Alias::new("a".repeat(length))?;
        self.length = length;
        Ok(self)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of distinct aliases this generator can produce.
    pub fn keyspace(&self) -> u128 {
        (ALPHABET.len() as u128).saturating_pow(self.length as u32)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Alias {
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Alias::new_unchecked(code)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            Source::Thread => "thread",
            Source::Seeded(_) => "seeded",
        };
        f.debug_struct("RandomGenerator")
            .field("length", &self.length)
            .field("source", &source)
            .finish()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> Alias {
        match &self.source {
            Source::Thread => self.sample(&mut rand::rng()),
            Source::Seeded(rng) => self.sample(&mut *rng.lock()),
        }
    }
}
