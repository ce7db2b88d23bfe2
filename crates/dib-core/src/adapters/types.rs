use alloy_primitives::B256;
use dib_types::{ReasonCode, TransferId};

/// Which `interledgerCommit`/`interledgerAbort` function a mined transaction called, as
/// classified by `check_confirmation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationKind {
    /// `interledgerCommit(id[, data])` was called.
    Commit,
    /// `interledgerAbort(id, reason)` was called.
    Abort,
}

/// Which destination-ledger acknowledgement event was emitted, as classified by `check_response`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `InterledgerEventAccepted{nonce}` was emitted.
    Accepted,
    /// `InterledgerEventRejected{nonce}` was emitted.
    Rejected,
}

/// Locates a mined transaction and reports its block number alongside its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    /// Hash of the mined transaction.
    pub tx_hash: B256,
    /// Block the transaction was mined in.
    pub block_number: u64,
}

impl TxReceipt {
    /// Creates a new [`TxReceipt`].
    pub const fn new(tx_hash: B256, block_number: u64) -> Self {
        Self { tx_hash, block_number }
    }
}

/// Outcome of submitting (or rediscovering) an `interledgerReceive` call.
///
/// `accepted = false` carries `ReasonCode::ApplicationReject` implicitly — the relay engine
/// treats it the same way a `status=false, error_code=APPLICATION_REJECT` result is handled. A
/// receipt that matched neither `Accepted` nor `Rejected` is not representable here; adapters
/// surface that case as `AdapterError::TransactionFailure` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOutcome {
    /// `true` if `InterledgerEventAccepted` was emitted, `false` if `InterledgerEventRejected`
    /// was.
    pub accepted: bool,
    /// The receipt of the `interledgerReceive` call.
    pub receipt: TxReceipt,
}

impl SendOutcome {
    /// The [`ReasonCode`] to report upstream when this outcome is a rejection.
    pub const fn reason_code(&self) -> Option<ReasonCode> {
        if self.accepted { None } else { Some(ReasonCode::ApplicationReject) }
    }
}

/// A historically located `interledgerCommit`/`interledgerAbort` call on the source ledger, as
/// returned by `get_interledgerCommit_tx`/`get_interledgerAbort_tx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatorTxRecord {
    /// The transaction's receipt location.
    pub receipt: TxReceipt,
    /// Which function was called.
    pub function: ConfirmationKind,
    /// The `initiator_id` argument the call was made with.
    pub initiator_id: String,
    /// The `reason` argument, present only for `interledgerAbort`.
    pub reason: Option<ReasonCode>,
}

/// A historically located `interledgerReceive` call on the destination ledger, as returned by
/// `get_interledgerReceive_tx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveTxRecord {
    /// The transaction's receipt location.
    pub receipt: TxReceipt,
    /// The `nonce` argument (equal to the transfer id).
    pub nonce: TransferId,
    /// The `data` argument actually submitted on-chain.
    pub data: Vec<u8>,
}
