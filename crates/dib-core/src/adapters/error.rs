use dib_types::ReasonCode;
use thiserror::Error;

/// Failure surfaced by an [`super::InitiatorAdapter`] or [`super::ResponderAdapter`] call.
///
/// Modeled as a `Result` error rather than a result record with an embedded status field —
/// idiomatic Rust surfaces failure through `Result`, and every distinct outcome remains
/// representable and matched on explicitly by the relay engine and verifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The submitted transaction reverted or was otherwise malformed.
    #[error("transaction failed or reverted")]
    TransactionFailure,

    /// The adapter waited beyond its configured timeout for a receipt.
    #[error("timed out waiting for a receipt")]
    Timeout,

    /// The receipt was fine but the destination emitted a rejection event.
    #[error("destination ledger rejected the transfer")]
    ApplicationReject,

    /// A `MultiResponder` inquiry call was rejected.
    #[error("inquiry call was rejected")]
    InquiryReject,

    /// Any other adapter-internal failure (malformed RPC response, connection error, etc.),
    /// carrying a human-readable cause for logging.
    #[error("adapter call failed: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Maps this error onto the shared [`ReasonCode`] enum, where one applies.
    pub const fn reason_code(&self) -> Option<ReasonCode> {
        match self {
            Self::TransactionFailure => Some(ReasonCode::TransactionFailure),
            Self::Timeout => Some(ReasonCode::Timeout),
            Self::ApplicationReject => Some(ReasonCode::ApplicationReject),
            Self::InquiryReject => Some(ReasonCode::InquiryReject),
            Self::Internal(_) => None,
        }
    }
}
