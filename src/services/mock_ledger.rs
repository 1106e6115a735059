//! Scripted `Ledger` for driving the echo flow in tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::{ Engine as _, engine::general_purpose::STANDARD };
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};

use crate::error::{ EchoError, EchoResult };
use crate::onchain_instance::instruction::decode_echo;
use crate::services::ledger::Ledger;
use crate::state_structs::EncodedAccount;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    RequestAirdrop(Pubkey, u64),
    GetBalance(Pubkey),
    GetMinimumBalance(usize),
    GetLatestBlockhash,
    SendTransaction { skip_preflight: bool },
    ConfirmTransaction(Signature),
    GetAccountInfo(Pubkey),
}

/// How the mock answers `get_account_info`
#[derive(Debug, Clone)]
pub enum AccountBehavior {
    /// Serve whatever the last submitted echo instruction wrote
    Echoed,
    Missing,
    Fixed(EncodedAccount),
}

pub struct MockLedger {
    pub rent_lamports: u64,
    /// Balances returned by successive `get_balance` calls; the last one repeats
    balances: Mutex<VecDeque<u64>>,
    account: AccountBehavior,
    written: Mutex<Option<Vec<u8>>>,
    submitted: Mutex<Option<Transaction>>,
    calls: Mutex<Vec<LedgerCall>>,
    signature: Signature,
    fail_send: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            rent_lamports: 890_880,
            balances: Mutex::new(VecDeque::from([u64::MAX])),
            account: AccountBehavior::Echoed,
            written: Mutex::new(None),
            submitted: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            signature: Signature::new_unique(),
            fail_send: false,
        }
    }

    pub fn with_balances(self, balances: impl IntoIterator<Item = u64>) -> Self {
        *self.balances.lock().unwrap() = balances.into_iter().collect();
        self
    }

    pub fn with_account(mut self, account: AccountBehavior) -> Self {
        self.account = account;
        self
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Last transaction accepted by `send_transaction`
    pub fn submitted(&self) -> Option<Transaction> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: LedgerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> EchoResult<Signature> {
        self.record(LedgerCall::RequestAirdrop(*pubkey, lamports));
        Ok(Signature::new_unique())
    }

    async fn get_balance(&self, pubkey: &Pubkey, _commitment: CommitmentConfig) -> EchoResult<u64> {
        self.record(LedgerCall::GetBalance(*pubkey));
        let mut balances = self.balances.lock().unwrap();
        let balance = if balances.len() > 1 { balances.pop_front() } else { balances.front().copied() };
        Ok(balance.unwrap_or(0))
    }

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize) -> EchoResult<u64> {
        self.record(LedgerCall::GetMinimumBalance(space));
        Ok(self.rent_lamports)
    }

    async fn get_latest_blockhash(&self) -> EchoResult<Hash> {
        self.record(LedgerCall::GetLatestBlockhash);
        Ok(Hash::new_unique())
    }

    async fn send_transaction(&self, tx: &Transaction, skip_preflight: bool) -> EchoResult<Signature> {
        self.record(LedgerCall::SendTransaction { skip_preflight });
        if self.fail_send {
            return Err(EchoError::Rpc("connection refused".to_string()));
        }
        tx.verify().map_err(|e| EchoError::Rpc(e.to_string()))?;

        // The echo program copies the payload into the buffer account
        let echo_ix = tx.message.instructions.last().expect("transaction has instructions");
        let data = decode_echo(&echo_ix.data)?;
        *self.written.lock().unwrap() = Some(data.into_bytes());
        *self.submitted.lock().unwrap() = Some(tx.clone());
        Ok(self.signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> EchoResult<()> {
        self.record(LedgerCall::ConfirmTransaction(*signature));
        Ok(())
    }

    async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        _commitment: CommitmentConfig,
    ) -> EchoResult<Option<EncodedAccount>> {
        self.record(LedgerCall::GetAccountInfo(*pubkey));
        Ok(match &self.account {
            AccountBehavior::Missing => None,
            AccountBehavior::Fixed(account) => Some(account.clone()),
            AccountBehavior::Echoed => self.written.lock().unwrap().as_ref().map(|bytes| EncodedAccount {
                lamports: self.rent_lamports,
                owner: Pubkey::default().to_string(),
                data: (STANDARD.encode(bytes), "base64".to_string()),
                executable: false,
            }),
        })
    }
}
