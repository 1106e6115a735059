//! # Services Module
//!
//! Ledger access for the echo client: the `Ledger` trait, its JSON-RPC
//! implementation, and a scripted ledger for tests.

pub mod ledger;
#[cfg(test)]
pub mod mock_ledger;

pub use ledger::{Ledger, RpcLedger};
