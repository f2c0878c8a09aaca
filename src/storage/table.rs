use std::marker::PhantomData;
use std::ops::Range;

use rocksdb::{DB, DBIteratorWithThreadMode};

use super::StorageError;
use super::encdec::{Decode, DecodingError, Encode, EncodeBuilder, prefix_key_range};

/// Defines a Table.
///
/// # Example
/// ```ignore
/// define_table! {
///     name: TokenByOutpointKV,
///     key_type: OutputRef,
///     value_type: StoredToken,
///     table: 0
/// }
/// ```
#[macro_export]
macro_rules! define_table {
    {
        name: $name:ident,
        key_type: $key_type:ty,
        value_type: $value_type:ty,
        table: $table_id:expr
    } => {
        pub struct $name;

        impl $crate::storage::table::Table for $name {
            type Key = $key_type;
            type Value = $value_type;

            const TABLE_ID: u8 = $table_id;
        }
    };
}

/// A keyed table within the single column family. Each table owns a unique one-byte
/// prefix, so iterating a table reduces to a prefix range scan.
pub trait Table {
    /// Key type for the table.
    type Key: Encode + Decode;

    /// Value type for the table.
    type Value: Encode + Decode;

    /// The unique prefix for this table.
    const TABLE_ID: u8;

    /// Encodes the full key by combining the table prefix and the encoded key.
    fn encode_key(key: &Self::Key) -> Vec<u8> {
        EncodeBuilder::new()
            .append(&Self::TABLE_ID)
            .append(key)
            .build()
    }

    /// Decodes a full key back into the table's key type, checking the prefix.
    fn decode_key(bytes: &[u8]) -> Result<Self::Key, DecodingError> {
        let (prefix, rest) = u8::decode(bytes)?;

        if prefix != Self::TABLE_ID {
            return Err(DecodingError::InvalidTablePrefix(prefix));
        }

        Self::Key::decode_all(rest)
    }

    /// The key range covering every entry of this table.
    fn full_range() -> Range<Vec<u8>> {
        prefix_key_range(&[Self::TABLE_ID])
    }
}

/// Iterator over the raw kv pairs of a table, decoding each entry into the
/// table's key and value types.
pub struct TableIterator<'a, T: Table> {
    inner: DBIteratorWithThreadMode<'a, DB>,
    marker: PhantomData<T>,
}

impl<'a, T: Table> TableIterator<'a, T> {
    pub fn new(inner: DBIteratorWithThreadMode<'a, DB>) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T: Table> Iterator for TableIterator<'_, T> {
    type Item = Result<(T::Key, T::Value), StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|res| {
            let (raw_key, raw_value) = res?;

            let key = T::decode_key(&raw_key)?;
            let value = T::Value::decode_all(&raw_value)?;

            Ok((key, value))
        })
    }
}
