use bitcoin::Txid;
use bitcoin::hashes::Hash;

/// Reference to a specific transaction output, the natural key of the token index:
/// at most one live token record exists per output reference at any time.
#[derive(PartialEq, Hash, Eq, Clone, Copy, Debug)]
pub struct OutputRef {
    pub tx_hash: [u8; 32],
    pub vout: u32,
}

impl OutputRef {
    pub fn new(txid: Txid, vout: u32) -> Self {
        Self {
            tx_hash: txid.to_byte_array(),
            vout,
        }
    }

    pub fn txid(&self) -> Txid {
        Txid::from_byte_array(self.tx_hash)
    }
}

impl From<bitcoin::OutPoint> for OutputRef {
    fn from(outpoint: bitcoin::OutPoint) -> Self {
        Self {
            tx_hash: outpoint.txid.to_byte_array(),
            vout: outpoint.vout,
        }
    }
}

/// The materialized view of one live token-bearing output. Records are immutable:
/// they are inserted when the output is reported added and deleted when it is
/// reported spent, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub outpoint: OutputRef,
    /// Token quantity carried by the output.
    pub amount: u64,
    /// Serialized public key embedded in the locking script.
    pub owner_key: Vec<u8>,
}

/// A lookup request. Either `txid` and `vout` select a single output, or
/// `find_all` requests every live record. No other query shape is supported.
#[derive(Debug, Clone, Default)]
pub struct LookupQuery {
    pub txid: Option<Txid>,
    pub vout: Option<u32>,
    pub find_all: bool,
}

impl LookupQuery {
    pub fn by_outpoint(txid: Txid, vout: u32) -> Self {
        Self {
            txid: Some(txid),
            vout: Some(vout),
            find_all: false,
        }
    }

    pub fn all() -> Self {
        Self {
            find_all: true,
            ..Self::default()
        }
    }
}
