//! Shortener service for the Snip URL shortener.
//!
//! [`ShortenerService`] composes an identifier generator with a mapping
//! store: it validates the incoming URL, asks the generator for a candidate
//! identifier, and settles the candidate against the store's conditional
//! insert, retrying with fresh candidates on collision up to a bounded
//! attempt budget.
//!
//! # Example
//!
//! ```no_run
//! use snip_core::Shortener;
//! use snip_generator::RandomGenerator;
//! use snip_shortener::ShortenerService;
//! use snip_storage::InMemoryMappingStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ShortenerService::new(InMemoryMappingStore::new(), RandomGenerator::new());
//!
//! let id = service.shorten("https://example.com/very/long/path").await?;
//! if let Some(mapping) = service.resolve(&id).await? {
//!     println!("{} -> {}", id, mapping.target_url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod service;

pub use service::{ShortenerService, ShortenerSettings};
