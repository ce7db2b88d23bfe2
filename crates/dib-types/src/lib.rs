//! Core data types shared across the decentralized interledger bridge.
//!
//! This crate defines the transfer record, its identity scheme, the shared error-reason codes,
//! and the small configuration-shape enums (`Direction`, `LedgerKind`) that both the relay core
//! and the adapter contracts build on.

mod transfer;
pub use transfer::{Transfer, TransferId, TxKey};

mod reason;
pub use reason::ReasonCode;

mod event;
pub use event::IntentEvent;

mod config;
pub use config::{Direction, LedgerKind};
