use std::{path::PathBuf, sync::Arc};

use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options,
    ReadOptions, SliceTransform,
};
use tracing::{info, trace};

use super::StorageError;
use super::encdec::{Decode, Encode};
use super::table::{Table, TableIterator};

static TOKENS_CF_NAME: &str = "tokens";

/// Handle on the RocksDB instance backing the token index. Point writes are atomic,
/// which is all the consistency the record tables require: records are immutable
/// once created, so there is no read-modify-write cycle to protect.
#[derive(Clone)]
pub struct StorageHandler {
    pub db: Arc<DB>,
}

impl StorageHandler {
    pub fn open(path: PathBuf, block_cache_bytes: u64) -> Result<Self, StorageError> {
        info!("opening db at {}...", path.display());

        let mut db_opts = Options::default();
        db_opts.create_missing_column_families(true);
        db_opts.create_if_missing(true);

        let cache = Cache::new_lru_cache(block_cache_bytes as usize);

        let mut cf_opts = Options::default();

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        cf_opts.set_block_based_table_factory(&block_opts);

        // table ids are the first key byte
        cf_opts.set_prefix_extractor(SliceTransform::create_fixed_prefix(1));

        let cfs = vec![ColumnFamilyDescriptor::new(TOKENS_CF_NAME, cf_opts)];

        let db = DB::open_cf_descriptors(&db_opts, path, cfs)?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn cf_handle(&self) -> &ColumnFamily {
        self.db.cf_handle(TOKENS_CF_NAME).expect("cf missing")
    }

    pub fn get<T>(&self, key: &T::Key) -> Result<Option<T::Value>, StorageError>
    where
        T: Table,
    {
        let encoded_key = T::encode_key(key);

        trace!("fetching {}", hex::encode(&encoded_key));

        self.db
            .get_cf(self.cf_handle(), &encoded_key)?
            .map(|bytes| T::Value::decode_all(&bytes).map_err(|e| e.into()))
            .transpose()
    }

    pub fn put<T>(&self, key: &T::Key, value: &T::Value) -> Result<(), StorageError>
    where
        T: Table,
    {
        let encoded_key = T::encode_key(key);
        let encoded_value = value.encode();

        trace!("setting {}", hex::encode(&encoded_key));

        self.db.put_cf(self.cf_handle(), encoded_key, encoded_value)?;

        Ok(())
    }

    pub fn delete<T>(&self, key: &T::Key) -> Result<(), StorageError>
    where
        T: Table,
    {
        let encoded_key = T::encode_key(key);

        trace!("deleting {}", hex::encode(&encoded_key));

        self.db.delete_cf(self.cf_handle(), encoded_key)?;

        Ok(())
    }

    /// Iterate every entry of a table in key order.
    pub fn iter_kvs<T: Table>(&self) -> TableIterator<'_, T> {
        let mut read_opts = ReadOptions::default();
        read_opts.set_iterate_range(T::full_range());

        let iter = self
            .db
            .iterator_cf_opt(self.cf_handle(), read_opts, IteratorMode::Start);

        TableIterator::<T>::new(iter)
    }
}
