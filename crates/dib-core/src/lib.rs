//! Relay core for a decentralized interledger bridge: a fleet of independently-operated
//! relayer nodes, each watching a source ledger and driving a destination ledger, agreeing on
//! who acts when through a pure, clock-driven duty function rather than a consensus protocol.
//!
//! This crate contains no concrete ledger drivers — only the adapter contracts
//! ([`adapters::InitiatorAdapter`], [`adapters::ResponderAdapter`]) a driver implements, and the
//! ledger-agnostic machinery ([`register`], [`duty`], [`engine`], [`verifier`]) built on top of
//! them.

pub mod adapters;
pub mod config;
pub mod duty;
pub mod engine;
mod error;
mod metrics;
pub mod register;
pub mod verifier;

pub use error::{EngineError, VerifyError};
