use async_trait::async_trait;
use tracing::debug;

use crate::define_table;
use crate::lookup::types::{OutputRef, TokenRecord};
use crate::storage::cache::RecordCache;
use crate::storage::encdec::{Decode, DecodingResult, Encode, EncodeBuilder};
use crate::storage::kv_store::StorageHandler;
use crate::storage::{StorageError, TokenStore};

define_table! {
    name: TokenByOutpointKV,
    key_type: OutputRef,
    value_type: StoredToken,
    table: 0
}

/// Value half of a token record; the key half is the [`OutputRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub amount: u64,
    pub owner_key: Vec<u8>,
}

impl Encode for OutputRef {
    fn encode(&self) -> Vec<u8> {
        EncodeBuilder::new()
            .append(&self.tx_hash)
            .append(&self.vout)
            .build()
    }
}

impl Decode for OutputRef {
    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let (tx_hash, bytes) = <[u8; 32]>::decode(bytes)?;
        let (vout, bytes) = u32::decode(bytes)?;

        Ok((Self { tx_hash, vout }, bytes))
    }
}

impl Encode for StoredToken {
    fn encode(&self) -> Vec<u8> {
        EncodeBuilder::new()
            .append(&self.amount)
            .append(&self.owner_key)
            .build()
    }
}

impl Decode for StoredToken {
    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let (amount, bytes) = u64::decode(bytes)?;
        let (owner_key, bytes) = Vec::<u8>::decode(bytes)?;

        Ok((Self { amount, owner_key }, bytes))
    }
}

fn assemble(outpoint: OutputRef, token: StoredToken) -> TokenRecord {
    TokenRecord {
        outpoint,
        amount: token.amount,
        owner_key: token.owner_key,
    }
}

/// RocksDB-backed [`TokenStore`], optionally fronted by a [`RecordCache`].
pub struct RocksTokenStore {
    db: StorageHandler,
    cache: Option<RecordCache>,
}

impl RocksTokenStore {
    pub fn new(db: StorageHandler, record_cache_bytes: Option<u64>) -> Self {
        Self {
            db,
            cache: record_cache_bytes.map(RecordCache::new),
        }
    }
}

#[async_trait]
impl TokenStore for RocksTokenStore {
    async fn store_record(&self, record: TokenRecord) -> Result<(), StorageError> {
        let token = StoredToken {
            amount: record.amount,
            owner_key: record.owner_key,
        };

        self.db.put::<TokenByOutpointKV>(&record.outpoint, &token)?;

        if let Some(cache) = &self.cache {
            cache.insert(record.outpoint, token);
        }

        Ok(())
    }

    async fn delete_record(&self, outpoint: &OutputRef) -> Result<(), StorageError> {
        self.db.delete::<TokenByOutpointKV>(outpoint)?;

        if let Some(cache) = &self.cache {
            cache.invalidate(outpoint);
        }

        Ok(())
    }

    async fn find_by_outpoint(
        &self,
        outpoint: &OutputRef,
    ) -> Result<Option<TokenRecord>, StorageError> {
        if let Some(token) = self.cache.as_ref().and_then(|c| c.get(outpoint)) {
            debug!("record cache hit for {}#{}", outpoint.txid(), outpoint.vout);
            return Ok(Some(assemble(*outpoint, token)));
        }

        let found = self.db.get::<TokenByOutpointKV>(outpoint)?;

        if let (Some(cache), Some(token)) = (&self.cache, &found) {
            cache.insert(*outpoint, token.clone());
        }

        Ok(found.map(|token| assemble(*outpoint, token)))
    }

    async fn find_all(&self) -> Result<Vec<TokenRecord>, StorageError> {
        let mut records = Vec::new();

        for kv in self.db.iter_kvs::<TokenByOutpointKV>() {
            let (outpoint, token) = kv?;

            records.push(assemble(outpoint, token));
        }

        Ok(records)
    }
}
