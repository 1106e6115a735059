//! Error types for the echo client

use solana_client::client_error::ClientError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failure to turn a payload string into echo instruction bytes (or back)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("payload contains non-ASCII character {character:?} at byte offset {offset}")]
    NonAscii { offset: usize, character: char },

    #[error("payload of {0} bytes does not fit a u32 length prefix")]
    TooLong(usize),

    #[error("borsh: {0}")]
    Borsh(String),
}

#[derive(Error, Debug)]
pub enum EchoError {
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Invalid program ID: {0}")]
    InvalidProgramId(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Airdrop to {pubkey} not visible after {attempts} balance checks")]
    AirdropNotVisible { pubkey: Pubkey, attempts: usize },

    #[error("Failed to get account. address={0}")]
    MissingAccount(Pubkey),

    #[error("Invalid account data: {0}")]
    AccountData(String),
}

impl From<ClientError> for EchoError {
    fn from(err: ClientError) -> Self {
        EchoError::Rpc(err.to_string())
    }
}

pub type EchoResult<T> = std::result::Result<T, EchoError>;
