//! Identifier allocation for the Snip URL shortener.
//!
//! Generators are pure: they produce candidate identifiers without talking
//! to storage. Uniqueness is settled by the store's conditional insert; a
//! caller that loses the race asks for a fresh candidate and tries again.

pub mod random;

pub use random::RandomGenerator;
use snip_core::ShortId;

/// Trait for producing candidate identifiers.
///
/// A generated identifier is a candidate, not an allocation: collisions are
/// statistically rare but possible, so every candidate must be validated
/// against the store before it is considered assigned.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate identifier.
    ///
    /// Successive candidates must be independent, so that retrying after a
    /// collision draws from the full identifier space again.
    fn generate(&self) -> ShortId;
}
