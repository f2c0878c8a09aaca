use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::lookup::types::TokenRecord;

// -- request types

/// Body of `POST /lookup`. The `query` member is required; omitting it is the
/// "no query supplied" client error.
#[derive(Deserialize, Debug, ToSchema)]
pub struct LookupRequest {
    pub query: Option<LookupQueryParams>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LookupQueryParams {
    /// Transaction id of the output, hex encoded
    pub txid: Option<String>,
    /// Index of the output within the transaction
    pub vout: Option<u32>,
    /// Return every live token record
    #[serde(default)]
    pub find_all: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct OutputAddedRequest {
    /// Transaction id of the new output, hex encoded
    pub txid: String,
    /// Index of the output within the transaction
    pub vout: u32,
    /// Locking script of the output, hex encoded
    pub output_script: String,
    /// Topic the output was admitted under
    pub topic: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct OutputSpentRequest {
    /// Transaction id of the spent output, hex encoded
    pub txid: String,
    /// Index of the output within the transaction
    pub vout: u32,
    /// Topic the spend was reported under
    pub topic: String,
}

// -- response types

#[derive(Serialize, Debug, ToSchema)]
pub struct TokenUtxo {
    pub txid: String,
    pub vout: u32,
    pub amount: String,
    pub owner_key: String,
}

impl From<&TokenRecord> for TokenUtxo {
    fn from(record: &TokenRecord) -> Self {
        Self {
            txid: record.outpoint.txid().to_string(),
            vout: record.outpoint.vout,
            amount: record.amount.to_string(),
            owner_key: hex::encode(&record.owner_key),
        }
    }
}
