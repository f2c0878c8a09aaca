pub mod error;
pub mod lookup;
pub mod script;
pub mod serve;
pub mod shutdown;
pub mod storage;

pub use error::Error;
pub use storage::encdec::{DecodingError, DecodingResult};
