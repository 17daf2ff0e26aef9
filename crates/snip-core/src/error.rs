use thiserror::Error;

/// Errors reported by [`MappingStore`](crate::store::MappingStore) backends.
///
/// A lost insert race is not represented here: the conditional insert reports
/// it as [`PutOutcome::AlreadyExists`](crate::store::PutOutcome), since it is
/// an expected outcome callers recover from, not a backend fault.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors reported by the [`Shortener`](crate::shortener::Shortener) boundary.
///
/// The four kinds stay distinct all the way to the caller: an invalid input
/// is the caller's mistake, an exhausted allocation budget signals identifier
/// contention, and a storage failure means the backend misbehaved. A resolve
/// miss is not an error at all; it surfaces as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid identifier: {0}")]
    InvalidId(String),
    #[error("identifier allocation failed after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
