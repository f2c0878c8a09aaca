use serde::Deserialize;

/// Revision of the token protocol carried in pushdrop fields. The decoder exposes
/// fields as opaque byte sequences; which field index carries which meaning is a
/// per-revision contract pinned here, so new revisions become new variants without
/// touching the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenProtocol {
    #[default]
    V1,
}

impl TokenProtocol {
    /// Index of the data field holding the token amount as base-10 text.
    pub const fn amount_field(self) -> usize {
        match self {
            TokenProtocol::V1 => 0,
        }
    }
}
