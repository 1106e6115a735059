//! Remote Ledger Client
//!
//! The calls the echo flow makes against a cluster, behind the `Ledger` trait
//! so the flow can run against a scripted ledger in tests.

use async_trait::async_trait;
use serde_json::json;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
    rpc_request::RpcRequest,
    rpc_response::Response,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::debug;

use crate::error::EchoResult;
use crate::state_structs::EncodedAccount;

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Request `lamports` of test funds for `pubkey`
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> EchoResult<Signature>;

    /// Balance of `pubkey` as seen at `commitment`
    async fn get_balance(&self, pubkey: &Pubkey, commitment: CommitmentConfig) -> EchoResult<u64>;

    /// Lamports needed for an account of `space` bytes to be rent exempt
    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> EchoResult<u64>;

    /// Blockhash to sign a new transaction against
    async fn get_latest_blockhash(&self) -> EchoResult<Hash>;

    /// Submit a signed transaction, optionally skipping preflight simulation
    async fn send_transaction(&self, tx: &Transaction, skip_preflight: bool) -> EchoResult<Signature>;

    /// Block until `signature` reaches `commitment`
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> EchoResult<()>;

    /// Raw base64 account info, `None` if the account does not exist
    async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        commitment: CommitmentConfig,
    ) -> EchoResult<Option<EncodedAccount>>;
}

/// `Ledger` backed by a JSON-RPC endpoint
pub struct RpcLedger {
    rpc_client: RpcClient,
}

impl RpcLedger {
    /// Create a ledger client talking to `rpc_url`
    pub fn new(rpc_url: &str) -> Self {
        let rpc_client = RpcClient::new_with_commitment(
            rpc_url.to_string(),
            CommitmentConfig::confirmed(),
        );

        Self { rpc_client }
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> String {
        self.rpc_client.url()
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> EchoResult<Signature> {
        Ok(self.rpc_client.request_airdrop(pubkey, lamports).await?)
    }

    async fn get_balance(&self, pubkey: &Pubkey, commitment: CommitmentConfig) -> EchoResult<u64> {
        let response = self.rpc_client.get_balance_with_commitment(pubkey, commitment).await?;
        Ok(response.value)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> EchoResult<u64> {
        Ok(self.rpc_client.get_minimum_balance_for_rent_exemption(space).await?)
    }

    async fn get_latest_blockhash(&self) -> EchoResult<Hash> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, tx: &Transaction, skip_preflight: bool) -> EchoResult<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight,
            preflight_commitment: Some(self.rpc_client.commitment().commitment),
            ..RpcSendTransactionConfig::default()
        };

        Ok(self.rpc_client.send_transaction_with_config(tx, config).await?)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> EchoResult<()> {
        debug!("Waiting for {} to reach {:?}", signature, commitment.commitment);
        Ok(self.rpc_client.poll_for_signature_with_commitment(signature, commitment).await?)
    }

    async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        commitment: CommitmentConfig,
    ) -> EchoResult<Option<EncodedAccount>> {
        // Fetched as raw JSON so the base64 payload reaches the caller undecoded
        let response: Response<Option<EncodedAccount>> = self.rpc_client
            .send(
                RpcRequest::GetAccountInfo,
                json!([
                    pubkey.to_string(),
                    { "encoding": "base64", "commitment": commitment.commitment },
                ]),
            )
            .await?;

        Ok(response.value)
    }
}
