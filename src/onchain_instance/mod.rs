//! # Onchain Program Instance Module
//!
//! Builds instructions and transactions for the echo program.
//!
//! ## Features
//! - Echo instruction wire codec
//! - Buffer account creation sized to the payload
//! - Transaction assembly signed by fee payer and buffer

/// Echo program instance and transaction builder
pub mod instance;
/// Instruction data encoding
pub mod instruction;
