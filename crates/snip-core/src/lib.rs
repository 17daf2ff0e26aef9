//! Core types and traits for the Snip URL shortener.
//!
//! This crate defines the shared vocabulary of the workspace: the validated
//! [`ShortId`] identifier, the persisted [`UrlMapping`], the [`MappingStore`]
//! contract that storage backends implement, the [`Shortener`] service trait,
//! and the error taxonomy.

pub mod error;
pub mod short_id;
pub mod shortener;
pub mod store;

pub use error::{ShortenerError, StorageError};
pub use short_id::ShortId;
pub use shortener::Shortener;
pub use store::{MappingStore, PutOutcome, UrlMapping};
