//! Wire codec for the echo program's instruction data.
//!
//! `EchoInstruction` is Borsh-encoded the same way the on-chain program
//! decodes it: `[u8 variant][u32 little-endian length][length bytes]`.
//! The client only ever sends ASCII payloads.

use borsh::{ BorshDeserialize, BorshSerialize };

use crate::error::EncodingError;

/// Instructions of the echo program understood by this client
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum EchoInstruction {
    /// Copy `data` into the `echo_buffer` account.
    ///
    /// Accounts:
    /// | index | writable | signer | description                                  |
    /// |-------|----------|--------|----------------------------------------------|
    /// | 0     | ✅       | ❌     | echo_buffer: Destination account of the data |
    Echo { data: Vec<u8> },
}

/// Serialize `s` as echo instruction data.
///
/// Rejects non-ASCII input and input whose length does not fit the `u32`
/// length prefix.
pub fn encode_echo(s: &str) -> Result<Vec<u8>, EncodingError> {
    if let Some((offset, character)) = s.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(EncodingError::NonAscii { offset, character });
    }
    u32::try_from(s.len()).map_err(|_| EncodingError::TooLong(s.len()))?;

    let instruction = EchoInstruction::Echo { data: s.as_bytes().to_vec() };
    borsh::to_vec(&instruction).map_err(|e| EncodingError::Borsh(e.to_string()))
}

/// Parse instruction data produced by [`encode_echo`] back into the payload.
#[cfg(test)]
pub fn decode_echo(bytes: &[u8]) -> Result<String, EncodingError> {
    let EchoInstruction::Echo { data } = borsh::from_slice::<EchoInstruction>(bytes)
        .map_err(|e| EncodingError::Borsh(e.to_string()))?;

    if let Some(offset) = data.iter().position(|b| !b.is_ascii()) {
        return Err(EncodingError::NonAscii { offset, character: char::from(data[offset]) });
    }
    String::from_utf8(data).map_err(|e| EncodingError::Borsh(e.to_string()))
}
