//! Errors raised by the relay core.

use crate::adapters::AdapterError;
use thiserror::Error;

/// Errors raised while driving a single transfer through the relay engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An initiator or responder adapter call failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// `confirm_transfer=true` and an adapter call failed without a classifiable `ReasonCode`.
    /// Surfaced as a loud, logged engine failure rather than guessing a generic reason on the
    /// adapter's behalf.
    #[error("adapter call failed without a classifiable reason code")]
    SendFailedWithoutReason,
}

/// Errors raised by [`crate::verifier::verify`] while cross-checking a finalized transfer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The adapter call needed to fetch evidence for verification failed.
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
