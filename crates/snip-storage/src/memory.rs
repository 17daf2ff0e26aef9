use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use snip_core::{MappingStore, PutOutcome, ShortId, StorageError, UrlMapping};

type Result<T> = std::result::Result<T, StorageError>;

/// In-memory implementation of the [`MappingStore`] contract using DashMap.
///
/// The entry API makes the conditional insert a single atomic step on the
/// key's shard, so two tasks racing on the same identifier cannot both
/// observe [`PutOutcome::Created`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryMappingStore {
    entries: DashMap<String, UrlMapping>,
}

impl InMemoryMappingStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl MappingStore for InMemoryMappingStore {
    async fn put_if_absent(&self, id: &ShortId, mapping: UrlMapping) -> Result<PutOutcome> {
        match self.entries.entry(id.as_str().to_owned()) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(mapping);
                Ok(PutOutcome::Created)
            }
        }
    }

    async fn get(&self, id: &ShortId) -> Result<Option<UrlMapping>> {
        Ok(self.entries.get(id.as_str()).map(|entry| entry.clone()))
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        Ok(self.entries.contains_key(id.as_str()))
    }
}
