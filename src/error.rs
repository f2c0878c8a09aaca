use thiserror::Error;

use crate::script::pushdrop::ScriptError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed locking script: {0}")]
    MalformedScript(#[from] ScriptError),

    #[error("lookup requires a query")]
    InvalidQuery,

    #[error("query must supply both txid and vout, or request find_all")]
    InsufficientQueryParameters,

    #[error("invalid token data: {0}")]
    InvalidTokenData(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom(error: impl ToString) -> Error {
        Error::Custom(error.to_string())
    }
}
