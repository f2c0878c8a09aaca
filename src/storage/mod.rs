use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::lookup::types::{OutputRef, TokenRecord};

pub mod cache;
pub mod encdec;
pub mod kv_store;
pub mod table;
pub mod tokens;

const MB: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("rocksdb error: {0}")]
    Rocks(#[from] rocksdb::Error),

    #[error("decoding error: {0}")]
    Decoding(#[from] encdec::DecodingError),
}

/// The storage engine the lookup service delegates all durable state to. Operations
/// are atomic per key; `store_record` has upsert semantics and `delete_record` is
/// idempotent (deleting an absent key succeeds).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn store_record(&self, record: TokenRecord) -> Result<(), StorageError>;

    async fn delete_record(&self, outpoint: &OutputRef) -> Result<(), StorageError>;

    async fn find_by_outpoint(
        &self,
        outpoint: &OutputRef,
    ) -> Result<Option<TokenRecord>, StorageError>;

    async fn find_all(&self) -> Result<Vec<TokenRecord>, StorageError>;
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub path: PathBuf,

    /// RocksDB block cache size in MB (default 64)
    pub block_cache_mb: Option<u64>,

    /// Record cache size in MB (default 16, 0 disables)
    pub record_cache_mb: Option<u64>,
}

impl Config {
    pub fn block_cache_bytes(&self) -> u64 {
        self.block_cache_mb.unwrap_or(64) * MB
    }

    pub fn record_cache_bytes(&self) -> Option<u64> {
        match self.record_cache_mb.unwrap_or(16) {
            0 => None,
            mb => Some(mb * MB),
        }
    }
}
