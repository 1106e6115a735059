//! # Runner Module
//!
//! The echo round trip: fund a fee payer, create the buffer account and write
//! the payload in one transaction, then read the buffer back.

use backoff::{ ExponentialBackoff, backoff::Backoff };
use base64::{ Engine as _, engine::general_purpose::STANDARD };
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};
use tokio::time::sleep;
use tracing::{ debug, info, warn };

use crate::config::{ BalancePollConfig, Config };
use crate::error::{ EchoError, EchoResult };
use crate::onchain_instance::instance::EchoProgramInstance;
use crate::onchain_instance::instruction::encode_echo;
use crate::services::Ledger;
use crate::state_structs::{ EchoReport, EncodedAccount };

/// Parse a base58 program id.
///
/// Distinguishes input that is not base58 at all from input that decodes to
/// the wrong number of bytes.
pub fn parse_program_id(raw: &str) -> EchoResult<Pubkey> {
    let bytes = bs58::decode(raw)
        .into_vec()
        .map_err(|e| EchoError::InvalidProgramId(format!("'{}' is not base58: {}", raw, e)))?;

    Pubkey::try_from(bytes.as_slice()).map_err(|_| {
        EchoError::InvalidProgramId(format!("'{}' decodes to {} bytes, expected 32", raw, bytes.len()))
    })
}

/// Run the echo round trip with fresh buffer and fee payer key pairs.
///
/// # Flow
/// 1. Validate and encode the payload (no ledger call on failure)
/// 2. Airdrop `config.airdrop_lamports` to the fee payer and wait until the
///    balance is visible at `confirmed`
/// 3. Look up the rent-exempt minimum for `payload.len()` bytes
/// 4. Submit `[create_account, echo]` with preflight skipped
/// 5. Wait for `confirmed` commitment
/// 6. Read the buffer account back and decode its data as ASCII
///
/// # Errors
/// Every failure is fatal to the run. A buffer account that is absent after
/// confirmation yields [`EchoError::MissingAccount`] and ends the flow without
/// further ledger calls.
pub async fn run<L: Ledger + ?Sized>(
    ledger: &L,
    config: &Config,
    program_id: Pubkey,
    payload: &str,
) -> EchoResult<EchoReport> {
    run_with_keys(ledger, config, program_id, payload, Keypair::new(), Keypair::new()).await
}

/// [`run`] with caller-supplied key pairs
pub async fn run_with_keys<L: Ledger + ?Sized>(
    ledger: &L,
    config: &Config,
    program_id: Pubkey,
    payload: &str,
    buffer: Keypair,
    fee_payer: Keypair,
) -> EchoResult<EchoReport> {
    let confirmed = CommitmentConfig::confirmed();
    let program = EchoProgramInstance::new(program_id);

    // Fail on an unencodable payload before spending an airdrop
    encode_echo(payload)?;

    info!(
        "Requesting Airdrop of {} lamports to {}...",
        config.airdrop_lamports,
        fee_payer.pubkey()
    );
    let airdrop_sig = ledger
        .request_airdrop(&fee_payer.pubkey(), config.airdrop_lamports)
        .await?;
    debug!("Airdrop signature: {}", airdrop_sig);
    wait_for_balance(ledger, &fee_payer.pubkey(), config.airdrop_lamports, &config.balance_poll).await?;
    info!("Airdrop received");

    let rent_lamports = ledger.get_minimum_balance_for_rent_exemption(payload.len()).await?;
    debug!("Rent-exempt minimum for {} bytes: {} lamports", payload.len(), rent_lamports);

    let blockhash = ledger.get_latest_blockhash().await?;
    let tx = program.assemble(&fee_payer, &buffer, payload, rent_lamports, blockhash)?;
    debug!("Echo into {} via program {}", buffer.pubkey(), program.program_id());

    let signature = ledger.send_transaction(&tx, true).await?;
    info!("Submitted transaction {}", signature);
    ledger.confirm_transaction(&signature, confirmed).await?;
    info!("Transaction {} confirmed", signature);

    let account = ledger
        .get_account_info(&buffer.pubkey(), confirmed)
        .await?
        .ok_or(EchoError::MissingAccount(buffer.pubkey()))?;
    let text = decode_account_text(&account)?;

    Ok(EchoReport {
        signature: signature.to_string(),
        explorer_url: config.explorer_url(&signature.to_string()),
        echo_buffer: buffer.pubkey().to_string(),
        fee_payer: fee_payer.pubkey().to_string(),
        rent_lamports,
        text,
    })
}

/// Poll the balance of `pubkey` until it reaches `min_lamports`
pub async fn wait_for_balance<L: Ledger + ?Sized>(
    ledger: &L,
    pubkey: &Pubkey,
    min_lamports: u64,
    poll: &BalancePollConfig,
) -> EchoResult<u64> {
    let mut backoff = ExponentialBackoff {
        initial_interval: poll.initial_interval,
        current_interval: poll.initial_interval,
        max_elapsed_time: None,
        ..ExponentialBackoff::default()
    };

    for attempt in 1..=poll.max_polls {
        let balance = ledger.get_balance(pubkey, CommitmentConfig::confirmed()).await?;
        if balance >= min_lamports {
            return Ok(balance);
        }
        if attempt == poll.max_polls {
            break;
        }

        let delay = backoff.next_backoff().unwrap_or(poll.initial_interval);
        warn!(
            "Balance of {} is {} lamports (want {}), checking again in {:?}",
            pubkey, balance, min_lamports, delay
        );
        sleep(delay).await;
    }

    Err(EchoError::AirdropNotVisible { pubkey: *pubkey, attempts: poll.max_polls })
}

/// Decode the base64 data of an echo buffer account as ASCII text
pub fn decode_account_text(account: &EncodedAccount) -> EchoResult<String> {
    let (payload, encoding) = &account.data;
    if encoding != "base64" {
        return Err(EchoError::AccountData(format!("unexpected encoding '{}'", encoding)));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| EchoError::AccountData(format!("invalid base64: {}", e)))?;
    if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(EchoError::AccountData(format!(
            "non-ASCII byte {:#04x} at offset {}",
            bytes[offset], offset
        )));
    }

    String::from_utf8(bytes).map_err(|e| EchoError::AccountData(e.to_string()))
}
