//! Parser and builder for pushdrop locking scripts.
//!
//! A pushdrop script spends to a public key and smuggles arbitrary data fields
//! into the output by pushing them after the signature check and immediately
//! dropping them from the stack:
//!
//! `<pubkey> OP_CHECKSIG <field 1> .. <field n> <signature> OP_2DROP.. OP_DROP?`
//!
//! The trailing drop opcodes must clear exactly the n+1 pushed items (each
//! `OP_2DROP` removes two, each `OP_DROP` one). The last pushed item is a
//! signature by the locking key over the fields; it is returned separately and
//! is not a data field.

use bitcoin::PublicKey;
use bitcoin::opcodes::all::{OP_2DROP, OP_CHECKSIG, OP_DROP};
use bitcoin::script::{Builder, Instruction, Instructions, PushBytesBuf, Script, ScriptBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    #[error("script ended before the template was complete")]
    Truncated,

    #[error("locking key is not a valid public key")]
    InvalidLockingKey,

    #[error("expected {expected}, found {found}")]
    UnexpectedOpcode {
        expected: &'static str,
        found: String,
    },

    #[error("drop opcodes clear {dropped} stack items but {pushed} were pushed")]
    DropCountMismatch { pushed: usize, dropped: usize },

    #[error("unparseable script: {0}")]
    InvalidStructure(String),

    #[error("field too large for a single push: {0} bytes")]
    OversizedField(usize),
}

/// A parsed pushdrop output. Fields are raw byte sequences; interpreting them
/// (e.g. which index is the token amount) is the caller's protocol contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOutput {
    /// Public key the output spends to.
    pub locking_key: PublicKey,
    /// The embedded data fields, in push order.
    pub fields: Vec<Vec<u8>>,
    /// Signature over the data fields by the locking key.
    pub signature: Vec<u8>,
}

/// Parse a locking script against the pushdrop template.
///
/// Deterministic and total over well-formed scripts; any deviation from the
/// template fails with a [`ScriptError`] and no partial result.
pub fn decode(script: &Script) -> Result<DecodedOutput, ScriptError> {
    let mut instructions = script.instructions();

    let locking_key = match next(&mut instructions)? {
        Some(Instruction::PushBytes(push)) => {
            PublicKey::from_slice(push.as_bytes()).map_err(|_| ScriptError::InvalidLockingKey)?
        }
        Some(Instruction::Op(op)) => {
            return Err(ScriptError::UnexpectedOpcode {
                expected: "locking key push",
                found: format!("{op:?}"),
            });
        }
        None => return Err(ScriptError::Truncated),
    };

    match next(&mut instructions)? {
        Some(Instruction::Op(op)) if op == OP_CHECKSIG => (),
        Some(other) => {
            return Err(ScriptError::UnexpectedOpcode {
                expected: "OP_CHECKSIG",
                found: describe(&other),
            });
        }
        None => return Err(ScriptError::Truncated),
    }

    // data fields and signature, then the drop tail
    let mut pushes: Vec<Vec<u8>> = Vec::new();
    let mut dropped = 0usize;

    loop {
        match next(&mut instructions)? {
            Some(Instruction::PushBytes(push)) => {
                if dropped > 0 {
                    return Err(ScriptError::UnexpectedOpcode {
                        expected: "drop opcode",
                        found: "data push".to_string(),
                    });
                }

                pushes.push(push.as_bytes().to_vec());
            }
            Some(Instruction::Op(op)) if op == OP_DROP => dropped += 1,
            Some(Instruction::Op(op)) if op == OP_2DROP => dropped += 2,
            Some(Instruction::Op(op)) => {
                return Err(ScriptError::UnexpectedOpcode {
                    expected: "data push or drop opcode",
                    found: format!("{op:?}"),
                });
            }
            None => break,
        }
    }

    if pushes.is_empty() {
        // the template requires at least the signature push
        return Err(ScriptError::Truncated);
    }

    if dropped != pushes.len() {
        return Err(ScriptError::DropCountMismatch {
            pushed: pushes.len(),
            dropped,
        });
    }

    let signature = pushes.pop().expect("pushes is non-empty");

    Ok(DecodedOutput {
        locking_key,
        fields: pushes,
        signature,
    })
}

/// Build the canonical pushdrop locking script for a key, data fields and
/// signature. `decode(build(..))` returns the inputs unchanged.
pub fn build(
    locking_key: &PublicKey,
    fields: &[Vec<u8>],
    signature: &[u8],
) -> Result<ScriptBuf, ScriptError> {
    let mut builder = Builder::new()
        .push_key(locking_key)
        .push_opcode(OP_CHECKSIG);

    for field in fields {
        builder = builder.push_slice(push_bytes(field)?);
    }

    builder = builder.push_slice(push_bytes(signature)?);

    let mut remaining = fields.len() + 1;
    while remaining >= 2 {
        builder = builder.push_opcode(OP_2DROP);
        remaining -= 2;
    }
    if remaining == 1 {
        builder = builder.push_opcode(OP_DROP);
    }

    Ok(builder.into_script())
}

fn next<'a>(
    instructions: &mut Instructions<'a>,
) -> Result<Option<Instruction<'a>>, ScriptError> {
    instructions
        .next()
        .transpose()
        .map_err(|e| ScriptError::InvalidStructure(e.to_string()))
}

fn describe(instruction: &Instruction) -> String {
    match instruction {
        Instruction::PushBytes(push) => format!("{}-byte push", push.len()),
        Instruction::Op(op) => format!("{op:?}"),
    }
}

fn push_bytes(data: &[u8]) -> Result<PushBytesBuf, ScriptError> {
    PushBytesBuf::try_from(data.to_vec()).map_err(|_| ScriptError::OversizedField(data.len()))
}
