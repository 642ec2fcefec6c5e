pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use shortly_core::Alias;
use std::sync::Arc;

/// Trait for producing candidate aliases.
///
/// Implementations are pure generators that don't interact with storage.
/// A candidate may collide with an alias already in use; the store rejects
/// such candidates and asks again.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate alias.
    fn generate(&self) -> Alias;
}

impl<G: Generator + ?Sized> Generator for Arc<G> {
    fn generate(&self) -> Alias {
        (**self).generate()
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self) -> Alias {
        (**self).generate()
    }
}
