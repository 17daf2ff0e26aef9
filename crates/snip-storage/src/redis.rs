use async_trait::async_trait;
use redis::AsyncCommands;
use snip_core::{MappingStore, PutOutcome, ShortId, StorageError, UrlMapping};
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, StorageError>;

/// Redis-backed implementation of the [`MappingStore`] contract.
///
/// Each mapping is stored as a JSON string under `{prefix}{id}`, with the
/// identifier as the key. `SET NX` is Redis's native conditional write, so
/// the insert is atomic per key without any client-side coordination.
#[derive(Debug, Clone)]
pub struct RedisMappingStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        StorageError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisMappingStore {
    /// Creates a new Redis mapping store.
    ///
    /// The multiplexed connection is the long-lived handle shared by every
    /// request; open it once at process startup and clone it freely.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "snip:url:".to_string(),
        }
    }

    /// Creates a new Redis mapping store with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn storage_key(&self, id: &ShortId) -> String {
        storage_key(&self.key_prefix, id)
    }
}

/// Generates the storage key for an identifier.
fn storage_key(prefix: &str, id: &ShortId) -> String {
    format!("{}{}", prefix, id.as_str())
}

#[async_trait]
impl MappingStore for RedisMappingStore {
    async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> Result<PutOutcome> {
        let key = self.storage_key(id);
        trace!(id = %id, "conditionally inserting mapping into Redis");

        let json = serde_json::to_string(&mapping).map_err(|e| {
            StorageError::InvalidData(format!("failed to serialize mapping: {e}"))
        })?;

        let mut conn = self.conn.clone();
        match conn.set_nx::<_, _, bool>(&key, json).await {
            Ok(true) => {
                debug!(id = %id, "mapping committed in Redis");
                Ok(PutOutcome::Created)
            }
            Ok(false) => {
                debug!(id = %id, "identifier already assigned in Redis");
                Ok(PutOutcome::AlreadyExists)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Redis error on conditional insert");
                Err(map_redis_error("failed to write mapping to Redis", e))
            }
        }
    }

    async fn get(&self, id: &ShortId) -> Result<Option<UrlMapping>> {
        let key = self.storage_key(id);
        trace!(id = %id, "fetching mapping from Redis");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(stored)) => match serde_json::from_str::<UrlMapping>(&stored) {
                Ok(mapping) => Ok(Some(mapping)),
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to deserialize stored mapping");
                    Err(StorageError::InvalidData(format!(
                        "invalid stored value for key '{key}': {e}"
                    )))
                }
            },
            Ok(None) => {
                trace!(id = %id, "identifier not assigned in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch mapping from Redis", e))
            }
        }
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        let key = self.storage_key(id);
        trace!(id = %id, "checking identifier existence in Redis");

        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(&key)
            .await
            .map_err(|e| map_redis_error("failed to check key existence in Redis", e))
    }
}
