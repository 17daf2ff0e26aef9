use crate::error::StorageError;
use crate::short_id::ShortId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, StorageError>;

/// The persisted association between an identifier and its target URL.
///
/// Mappings are insert-only: once committed under an identifier they are
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// The original long URL the identifier redirects to.
    pub target_url: String,
}

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The mapping was committed by this call.
    Created,
    /// The identifier already holds a committed mapping; nothing was written.
    AlreadyExists,
}

/// Durable, uniqueness-preserving storage for URL mappings, keyed by the
/// identifier itself.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Inserts a mapping only if the identifier is unassigned.
    ///
    /// Atomic per identifier: under concurrent calls with the same `id`, at
    /// most one caller observes [`PutOutcome::Created`]; every other caller
    /// observes [`PutOutcome::AlreadyExists`]. The existing mapping is never
    /// overwritten.
    async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> Result<PutOutcome>;

    /// Retrieves the mapping for an identifier.
    /// Returns `None` if the identifier was never assigned.
    async fn get(&self, id: &ShortId) -> Result<Option<UrlMapping>>;

    /// Checks whether an identifier already holds a mapping.
    async fn exists(&self, id: &ShortId) -> Result<bool>;
}
