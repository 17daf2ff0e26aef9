use async_trait::async_trait;
use snip_core::{MappingStore, PutOutcome, ShortId, StorageError, UrlMapping};
use sqlx::{MySqlPool, Row};

type Result<T> = std::result::Result<T, StorageError>;

/// MySQL implementation of the [`MappingStore`] contract.
///
/// `short_id` is the primary key, declared with a binary collation so
/// identifiers compare case-sensitively. The conditional insert is a plain
/// `INSERT`; a lost race surfaces as the duplicate-key error, which maps to
/// [`PutOutcome::AlreadyExists`]. Rows are never updated or deleted.
#[derive(Debug, Clone)]
pub struct MySqlMappingStore {
    pool: MySqlPool,
}

impl MySqlMappingStore {
    /// Creates a store from an existing MySQL connection pool.
    ///
    /// The pool is the long-lived handle shared by every request; open it
    /// once at process startup.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl MappingStore for MySqlMappingStore {
    async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> Result<PutOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_mappings (short_id, target_url)
            VALUES (?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(mapping.target_url)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(err) if is_unique_violation(&err) => Ok(PutOutcome::AlreadyExists),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, id: &ShortId) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT target_url
            FROM url_mappings
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;

        Ok(Some(UrlMapping { target_url }))
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM url_mappings
            WHERE short_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }
}
