use solana_sdk::{
    hash::Hash,
    instruction::{ AccountMeta, Instruction },
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_instruction,
    transaction::Transaction,
};

use crate::error::EncodingError;
use crate::onchain_instance::instruction::encode_echo;
use crate::state_structs::EchoParams;

/// Echo program client instance for building transactions
#[derive(Debug, Clone)]
pub struct EchoProgramInstance {
    program_id: Pubkey,
}

impl EchoProgramInstance {
    /// Create a new instance for the program deployed at `program_id`
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Program that owns created buffers and receives echo instructions
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Echo instruction writing `params.data` into `params.echo_buffer`
    pub fn echo_instruction(&self, params: &EchoParams) -> Result<Instruction, EncodingError> {
        let data = encode_echo(&params.data)?;

        Ok(Instruction::new_with_bytes(
            params.program_id,
            &data,
            vec![AccountMeta::new(params.echo_buffer, false)],
        ))
    }

    /// System instruction allocating `space` bytes for `buffer`, owned by this program
    pub fn create_buffer_instruction(
        &self,
        payer: &Pubkey,
        buffer: &Pubkey,
        lamports: u64,
        space: usize,
    ) -> Instruction {
        system_instruction::create_account(payer, buffer, lamports, space as u64, &self.program_id)
    }

    /// Build the signed `[create_account, echo]` transaction.
    ///
    /// The buffer account must co-sign because creating an account requires
    /// the new account's own signature.
    pub fn assemble(
        &self,
        payer: &Keypair,
        buffer: &Keypair,
        data: &str,
        rent_lamports: u64,
        recent_blockhash: Hash,
    ) -> Result<Transaction, EncodingError> {
        let create_ix = self.create_buffer_instruction(
            &payer.pubkey(),
            &buffer.pubkey(),
            rent_lamports,
            data.len(),
        );
        let echo_ix = self.echo_instruction(&EchoParams {
            program_id: self.program_id,
            echo_buffer: buffer.pubkey(),
            data: data.to_string(),
        })?;

        Ok(Transaction::new_signed_with_payer(
            &[create_ix, echo_ix],
            Some(&payer.pubkey()),
            &[payer, buffer],
            recent_blockhash,
        ))
    }
}
