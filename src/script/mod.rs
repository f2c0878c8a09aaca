pub mod protocol;
pub mod pushdrop;

pub use protocol::TokenProtocol;
pub use pushdrop::{DecodedOutput, ScriptError};
