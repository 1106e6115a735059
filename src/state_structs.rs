use serde::{ Deserialize, Serialize };
use solana_sdk::pubkey::Pubkey;

/// Parameters of one echo instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoParams {
    pub program_id: Pubkey,
    pub echo_buffer: Pubkey,
    pub data: String,
}

// --- getAccountInfo result with base64 encoding ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedAccount {
    pub lamports: u64,
    pub owner: String, // base58 pubkey
    /// `[payload, encoding]` as returned by the node
    pub data: (String, String),
    pub executable: bool,
}

/// Everything a successful run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EchoReport {
    pub signature: String,
    pub explorer_url: String,
    pub echo_buffer: String,
    pub fee_payer: String,
    pub rent_lamports: u64,
    pub text: String,
}
