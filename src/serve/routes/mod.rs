pub mod lookup;
pub mod outputs;

use std::str::FromStr;

use bitcoin::Txid;

use crate::serve::error::ServeError;

pub(crate) fn parse_txid(txid: &str) -> Result<Txid, ServeError> {
    Txid::from_str(txid).map_err(|_| ServeError::malformed_request("invalid txid"))
}
