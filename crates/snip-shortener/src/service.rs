use async_trait::async_trait;
use snip_core::{
    MappingStore, PutOutcome, ShortId, Shortener, ShortenerError, StorageError, UrlMapping,
};
use snip_generator::Generator;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Configures a [`ShortenerService`] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many candidate identifiers to try before giving up on a request.
    ///
    /// Exhausting the budget means the identifier space is under unexpected
    /// contention; it is reported as a distinct failure, not a storage error.
    #[builder(default = 5)]
    pub max_attempts: u32,

    /// Upper bound on a single store operation.
    ///
    /// An elapsed timer is a [`StorageError::Timeout`], never treated as a
    /// collision: retrying a timed-out write as if the identifier were taken
    /// would burn the attempt budget on a backend that is merely slow.
    #[builder(default = Duration::from_secs(2))]
    pub op_timeout: Duration,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// Wraps a [`MappingStore`] and a [`Generator`]. The generator produces
/// candidates only; uniqueness is decided by the store's conditional insert,
/// which is the single point of coordination between concurrent requests.
/// Both collaborators are injected once at construction and shared for the
/// life of the process.
#[derive(Debug, Clone)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<S: MappingStore, G: Generator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_settings(store, generator, ShortenerSettings::default())
    }

    /// Creates a new `ShortenerService` with custom settings.
    pub fn with_settings(store: S, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Validates that the URL has an http or https scheme and a host part.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a scheme and host: {}",
                url
            )));
        };

        if rest.is_empty() {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {}",
                url
            )));
        }

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        Ok(())
    }

    /// Runs a store operation under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, ShortenerError> {
        match tokio::time::timeout(self.settings.op_timeout, fut).await {
            Ok(result) => result.map_err(ShortenerError::from),
            Err(_) => Err(ShortenerError::Storage(StorageError::Timeout(format!(
                "{} did not complete within {:?}",
                operation, self.settings.op_timeout
            )))),
        }
    }
}

#[async_trait]
impl<S: MappingStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, target_url: &str) -> Result<ShortId, ShortenerError> {
        // Reject bad input before any store traffic.
        Self::validate_url(target_url)?;

        let mapping = UrlMapping {
            target_url: target_url.to_owned(),
        };

        for attempt in 1..=self.settings.max_attempts {
            let id = self.generator.generate();

            let outcome = self
                .bounded(
                    "conditional insert",
                    self.store.put_if_absent(&id, mapping.clone()),
                )
                .await?;

            match outcome {
                PutOutcome::Created => {
                    debug!(id = %id, attempt, "mapping committed");
                    return Ok(id);
                }
                PutOutcome::AlreadyExists => {
                    warn!(id = %id, attempt, "identifier collision, drawing a new candidate");
                }
            }
        }

        Err(ShortenerError::AllocationExhausted {
            attempts: self.settings.max_attempts,
        })
    }

    async fn resolve(&self, id: &ShortId) -> Result<Option<UrlMapping>, ShortenerError> {
        trace!(id = %id, "resolving identifier");

        let result = self.bounded("lookup", self.store.get(id)).await?;

        match &result {
            Some(mapping) => debug!(id = %id, url = %mapping.target_url, "resolved identifier"),
            None => trace!(id = %id, "identifier not assigned"),
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_generator::RandomGenerator;
    use snip_storage::InMemoryMappingStore;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    type StoreResult<T> = Result<T, StorageError>;

    /// Store decorator that counts conditional inserts.
    struct CountingStore<S> {
        inner: S,
        writes: AtomicUsize,
    }

    impl<S> CountingStore<S> {
        fn new(inner: S) -> Self {
            Self {
                inner,
                writes: AtomicUsize::new(0),
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<S: MappingStore> MappingStore for CountingStore<S> {
        async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> StoreResult<PutOutcome> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.put_if_absent(id, mapping).await
        }

        async fn get(&self, id: &ShortId) -> StoreResult<Option<UrlMapping>> {
            self.inner.get(id).await
        }

        async fn exists(&self, id: &ShortId) -> StoreResult<bool> {
            self.inner.exists(id).await
        }
    }

    /// Store decorator that reports a lost race for the first N inserts.
    struct ContendedStore<S> {
        inner: S,
        rejections: AtomicU32,
    }

    impl<S> ContendedStore<S> {
        fn new(inner: S, rejections: u32) -> Self {
            Self {
                inner,
                rejections: AtomicU32::new(rejections),
            }
        }
    }

    #[async_trait]
    impl<S: MappingStore> MappingStore for ContendedStore<S> {
        async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> StoreResult<PutOutcome> {
            let lost_race = self
                .rejections
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();

            if lost_race {
                return Ok(PutOutcome::AlreadyExists);
            }

            self.inner.put_if_absent(id, mapping).await
        }

        async fn get(&self, id: &ShortId) -> StoreResult<Option<UrlMapping>> {
            self.inner.get(id).await
        }

        async fn exists(&self, id: &ShortId) -> StoreResult<bool> {
            self.inner.exists(id).await
        }
    }

    /// Store whose operations never complete.
    struct StalledStore;

    #[async_trait]
    impl MappingStore for StalledStore {
        async fn put_if_absent(
            &self,
            _id: &ShortId,
            _mapping: UrlMapping,
        ) -> StoreResult<PutOutcome> {
            std::future::pending().await
        }

        async fn get(&self, _id: &ShortId) -> StoreResult<Option<UrlMapping>> {
            std::future::pending().await
        }

        async fn exists(&self, _id: &ShortId) -> StoreResult<bool> {
            std::future::pending().await
        }
    }

    /// Store whose operations always fail.
    struct FailingStore {
        writes: AtomicUsize,
    }

    impl FailingStore {
        fn new() -> Self {
            Self {
                writes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MappingStore for FailingStore {
        async fn put_if_absent(
            &self,
            _id: &ShortId,
            _mapping: UrlMapping,
        ) -> StoreResult<PutOutcome> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("backend is down".to_string()))
        }

        async fn get(&self, _id: &ShortId) -> StoreResult<Option<UrlMapping>> {
            Err(StorageError::Unavailable("backend is down".to_string()))
        }

        async fn exists(&self, _id: &ShortId) -> StoreResult<bool> {
            Err(StorageError::Unavailable("backend is down".to_string()))
        }
    }

    fn test_service() -> ShortenerService<InMemoryMappingStore, RandomGenerator> {
        ShortenerService::new(InMemoryMappingStore::new(), RandomGenerator::new())
    }

    #[tokio::test]
    async fn shorten_then_resolve_round_trips() {
        let service = test_service();

        let id = service
            .shorten("https://example.com/very/long/path")
            .await
            .unwrap();
        assert_eq!(id.as_str().len(), ShortId::LENGTH);

        let mapping = service.resolve(&id).await.unwrap().unwrap();
        assert_eq!(mapping.target_url, "https://example.com/very/long/path");
    }

    #[tokio::test]
    async fn shorten_accepts_http_and_https() {
        let service = test_service();

        assert!(service.shorten("http://example.com").await.is_ok());
        assert!(service.shorten("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn shorten_rejects_invalid_urls() {
        let service = test_service();

        for input in ["", "not-a-valid-url", "ftp://example.com", "https://"] {
            let err = service.shorten(input).await.unwrap_err();
            assert!(
                matches!(err, ShortenerError::InvalidUrl(_)),
                "expected InvalidUrl for {:?}, got {:?}",
                input,
                err
            );
        }
    }

    #[tokio::test]
    async fn rejected_input_writes_nothing() {
        let store = CountingStore::new(InMemoryMappingStore::new());
        let service = ShortenerService::new(store, RandomGenerator::new());

        let err = service.shorten("not-a-valid-url").await.unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));

        assert_eq!(service.store.writes(), 0);
    }

    #[tokio::test]
    async fn resolve_unassigned_is_none() {
        let service = test_service();

        let result = service
            .resolve(&ShortId::new_unchecked("zzzzzzz"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn repeated_resolves_are_stable() {
        let service = test_service();

        let id = service.shorten("https://example.com").await.unwrap();

        for _ in 0..5 {
            let mapping = service.resolve(&id).await.unwrap().unwrap();
            assert_eq!(mapping.target_url, "https://example.com");
        }
    }

    #[tokio::test]
    async fn collisions_within_budget_still_succeed() {
        let store = CountingStore::new(ContendedStore::new(InMemoryMappingStore::new(), 2));
        let service = ShortenerService::new(store, RandomGenerator::new());

        let id = service.shorten("https://example.com").await.unwrap();

        // Two lost races plus the committed attempt.
        assert_eq!(service.store.writes(), 3);

        let mapping = service.resolve(&id).await.unwrap().unwrap();
        assert_eq!(mapping.target_url, "https://example.com");
    }

    #[tokio::test]
    async fn exhausted_budget_is_allocation_failure() {
        let settings = ShortenerSettings::builder().max_attempts(5).build();
        let store = ContendedStore::new(InMemoryMappingStore::new(), 5);
        let service = ShortenerService::with_settings(store, RandomGenerator::new(), settings);

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(
            matches!(err, ShortenerError::AllocationExhausted { attempts: 5 }),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn storage_failure_aborts_without_retry() {
        let service = ShortenerService::new(FailingStore::new(), RandomGenerator::new());

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Unavailable(_))
        ));

        // A backend fault is not a collision; the budget is not spent on it.
        assert_eq!(service.store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stalled_store_reports_timeout() {
        let settings = ShortenerSettings::builder()
            .op_timeout(Duration::from_millis(10))
            .build();
        let service =
            ShortenerService::with_settings(StalledStore, RandomGenerator::new(), settings);

        let err = service.shorten("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Timeout(_))
        ));

        let err = service
            .resolve(&ShortId::new_unchecked("abc1234"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_shortens_yield_distinct_ids() {
        let service = Arc::new(test_service());
        let mut handles = vec![];

        for i in 0..32u64 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let url = format!("https://example.com/page/{}", i);
                let id = service.shorten(&url).await.unwrap();
                (id, url)
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let (id, url) = handle.await.unwrap();

            assert!(ids.insert(id.clone()), "duplicate identifier {}", id);

            let mapping = service.resolve(&id).await.unwrap().unwrap();
            assert_eq!(mapping.target_url, url);
        }

        assert_eq!(ids.len(), 32);
    }
}
