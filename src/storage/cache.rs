use mini_moka::sync::Cache;

use crate::lookup::types::OutputRef;
use crate::storage::encdec::Encode;
use crate::storage::tokens::StoredToken;

/// Read-through cache in front of the token table. Writes populate it and deletes
/// invalidate it, so a read for a key always observes the latest write made through
/// the owning store (records themselves are immutable, only presence changes).
pub struct RecordCache {
    cache: Cache<OutputRef, StoredToken>,
}

impl RecordCache {
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            cache: Cache::builder()
                .weigher(|_key: &OutputRef, value: &StoredToken| -> u32 {
                    // serialized record plus the 36 key bytes
                    value.encode().len() as u32 + 36
                })
                .max_capacity(max_size_bytes)
                .build(),
        }
    }

    pub fn get(&self, outpoint: &OutputRef) -> Option<StoredToken> {
        self.cache.get(outpoint)
    }

    pub fn insert(&self, outpoint: OutputRef, token: StoredToken) {
        self.cache.insert(outpoint, token);
    }

    pub fn invalidate(&self, outpoint: &OutputRef) {
        self.cache.invalidate(outpoint);
    }
}
