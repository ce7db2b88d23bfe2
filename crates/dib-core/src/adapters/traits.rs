use super::{
    AdapterError,
    types::{ConfirmationKind, InitiatorTxRecord, ReceiveTxRecord, ResponseKind, SendOutcome, TxReceipt},
};
use async_trait::async_trait;
use dib_types::{IntentEvent, ReasonCode, Transfer, TransferId, TxKey};
use std::fmt::Debug;

/// Capability contract for the source-ledger side of a bridge.
///
/// Concrete implementations (signing, RPC, event filtering) are out of this workspace's scope;
/// the relay engine (`crate::engine::RelayEngine`) programs only against this trait.
#[async_trait]
pub trait InitiatorAdapter: Debug + Send + Sync {
    /// Drains new `InterledgerEventSending` events observed since the last call. May block up to
    /// a short polling interval when none are available.
    async fn listen_for_events(&self) -> Result<Vec<IntentEvent>, AdapterError>;

    /// Deterministically builds a [`Transfer`] from an observed event, computing its id (spec
    /// invariant: id determinism — see `crate::adapters::compute_transfer_id`).
    fn process_event(&self, event: &IntentEvent) -> Transfer;

    /// Submits `interledgerCommit(initiator_id[, data])`.
    async fn commit_sending(
        &self,
        initiator_id: &str,
        data: Option<&[u8]>,
    ) -> Result<TxReceipt, AdapterError>;

    /// Submits `interledgerAbort(initiator_id, reason)`.
    async fn abort_sending(
        &self,
        initiator_id: &str,
        reason: ReasonCode,
    ) -> Result<TxReceipt, AdapterError>;

    /// Best-effort `interledgerError(initiator_id, reason)`. Failures are logged by the caller,
    /// not propagated as a relay-engine failure.
    async fn report_error(&self, initiator_id: &str, reason: ReasonCode) -> Result<(), AdapterError>;

    /// Returns the `initiator_id`s of `interledgerCommit`/`interledgerAbort` calls mined since
    /// the last invocation, advancing an internal block cursor by at most one block per call.
    async fn monitor_confirmations(&self) -> Result<Vec<String>, AdapterError>;

    /// Historical search: scans blocks backwards from head, stopping at
    /// `transfer.initiation_timestamp()`, for an `interledgerCommit` call with the transfer's
    /// `initiator_id`.
    async fn get_interledger_commit_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<InitiatorTxRecord>, AdapterError>;

    /// Same as [`Self::get_interledger_commit_tx`] but for `interledgerAbort`.
    async fn get_interledger_abort_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<InitiatorTxRecord>, AdapterError>;

    /// Classifies a transaction by its decoded function selector.
    async fn check_confirmation(
        &self,
        tx_key: TxKey,
    ) -> Result<Option<ConfirmationKind>, AdapterError>;
}

/// Capability contract for the destination-ledger side of a bridge.
#[async_trait]
pub trait ResponderAdapter: Debug + Send + Sync {
    /// Submits `interledgerReceive(nonce, data)` and classifies the outcome once mined.
    async fn send_data(&self, nonce: TransferId, data: &[u8]) -> Result<SendOutcome, AdapterError>;

    /// Classifies an already-mined `interledgerReceive` transaction, given its hash.
    async fn get_send_response(
        &self,
        tx_hash: alloy_primitives::B256,
        nonce: TransferId,
    ) -> Result<SendOutcome, AdapterError>;

    /// Looks up whether an acknowledgement event has been emitted for `nonce` yet.
    async fn check_response(&self, nonce: TransferId) -> Result<Option<ResponseKind>, AdapterError>;

    /// Historical search by `nonce = transfer.id()` for the `interledgerReceive` call.
    async fn get_interledger_receive_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<ReceiveTxRecord>, AdapterError>;

    /// Best-effort `interledgerError(nonce, reason)`.
    async fn report_error(&self, nonce: TransferId, reason: ReasonCode) -> Result<(), AdapterError>;
}

/// Optional multi-ledger extension: dry-run inquiry and receive-side abort. Outside the core's
/// scope but the interface slot must exist.
#[async_trait]
pub trait MultiResponderAdapter: ResponderAdapter {
    /// Dry-run of `send_data`, watching for `InterledgerInquiryAccepted`/`Rejected` rather than
    /// mutating destination-ledger state.
    async fn send_data_inquire(
        &self,
        nonce: TransferId,
        data: &[u8],
    ) -> Result<SendOutcome, AdapterError>;

    /// Submits `interledgerReceiveAbort(nonce, reason)`.
    ///
    /// Which event this call should actually watch for is deliberately left unresolved here:
    /// implementations MUST confirm the real event name against the destination contract's ABI
    /// before wiring this up; this trait only commits to the call signature, not to which event
    /// it awaits.
    async fn abort_send_data(&self, nonce: TransferId, reason: ReasonCode) -> Result<(), AdapterError>;
}
