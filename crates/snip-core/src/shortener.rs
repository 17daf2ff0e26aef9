use crate::short_id::ShortId;
use crate::store::UrlMapping;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// The boundary exposed to transport layers (HTTP handlers, RPC servers).
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates an identifier for `target_url`, persists the mapping, and
    /// returns the identifier.
    async fn shorten(&self, target_url: &str) -> Result<ShortId>;

    /// Resolves an identifier to its stored mapping.
    /// Returns `None` if the identifier was never assigned.
    async fn resolve(&self, id: &ShortId) -> Result<Option<UrlMapping>>;
}
