//! An in-memory reference pair implementing [`InitiatorAdapter`]/[`ResponderAdapter`], matching
//! the `LedgerKind::Local` configuration. Used by this workspace's own integration tests and as a
//! worked example of what a concrete ledger driver's adapter impl looks like; it is not a
//! stand-in for a real ledger's signing/RPC stack.

use super::{
    AdapterError, InitiatorAdapter, ResponderAdapter, compute_transfer_id,
    types::{ConfirmationKind, InitiatorTxRecord, ReceiveTxRecord, ResponseKind, SendOutcome, TxReceipt},
};
use alloy_primitives::{B256, keccak256};
use async_trait::async_trait;
use dib_types::{IntentEvent, ReasonCode, Transfer, TransferId, TxKey};
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

fn synthetic_tx_hash(counter: u64) -> B256 {
    keccak256(counter.to_be_bytes())
}

#[derive(Debug, Default)]
struct InitiatorInner {
    next_block: u64,
    pending: VecDeque<IntentEvent>,
    finalized: HashMap<String, InitiatorTxRecord>,
    confirmation_log: Vec<String>,
    confirmation_cursor: usize,
    reported_errors: Vec<(String, ReasonCode)>,
}

/// An in-memory source-ledger reference implementation.
#[derive(Debug)]
pub struct LocalInitiator {
    secret: Vec<u8>,
    inner: Mutex<InitiatorInner>,
}

impl LocalInitiator {
    /// Creates a new, empty [`LocalInitiator`] salted with `secret`.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into(), inner: Mutex::new(InitiatorInner::default()) }
    }

    /// Test/demo helper: enqueues an `InterledgerEventSending` event as if it had just been
    /// mined, returning the event that `listen_for_events` will later yield.
    pub fn emit_event(
        &self,
        initiator_id: impl Into<String>,
        data: Vec<u8>,
        block_timestamp: u64,
    ) -> IntentEvent {
        let mut inner = self.inner.lock().unwrap();
        let block_number = inner.next_block;
        inner.next_block += 1;
        let event = IntentEvent {
            block_number,
            block_timestamp,
            tx_hash: synthetic_tx_hash(block_number),
            log_index: 0,
            initiator_id: initiator_id.into(),
            data,
        };
        inner.pending.push_back(event.clone());
        event
    }

    /// Test/demo helper: the `initiator_id`s ever reported to `report_error`, most recent last.
    pub fn reported_errors(&self) -> Vec<(String, ReasonCode)> {
        self.inner.lock().unwrap().reported_errors.clone()
    }

    /// Test/demo helper: whether `initiator_id` has a recorded commit/abort.
    pub fn finalized_record(&self, initiator_id: &str) -> Option<InitiatorTxRecord> {
        self.inner.lock().unwrap().finalized.get(initiator_id).cloned()
    }
}

#[async_trait]
impl InitiatorAdapter for LocalInitiator {
    async fn listen_for_events(&self) -> Result<Vec<IntentEvent>, AdapterError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.pending.drain(..).collect())
    }

    fn process_event(&self, event: &IntentEvent) -> Transfer {
        let id = compute_transfer_id(event.block_number, event.tx_hash, event.log_index, &self.secret);
        Transfer::new(
            id,
            event.initiator_id.clone(),
            event.data.clone(),
            event.block_timestamp,
            event.tx_key(),
        )
    }

    async fn commit_sending(
        &self,
        initiator_id: &str,
        _data: Option<&[u8]>,
    ) -> Result<TxReceipt, AdapterError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.finalized.contains_key(initiator_id) {
            // Re-submitting a commit/abort for an already-finalized initiator_id reverts
            // on-chain; this is expected under the fleet's duplication-tolerant model.
            return Err(AdapterError::TransactionFailure);
        }
        let block_number = inner.next_block;
        inner.next_block += 1;
        let tx_hash = synthetic_tx_hash(block_number);
        inner.finalized.insert(
            initiator_id.to_string(),
            InitiatorTxRecord {
                receipt: TxReceipt::new(tx_hash, block_number),
                function: ConfirmationKind::Commit,
                initiator_id: initiator_id.to_string(),
                reason: None,
            },
        );
        inner.confirmation_log.push(initiator_id.to_string());
        Ok(TxReceipt::new(tx_hash, block_number))
    }

    async fn abort_sending(
        &self,
        initiator_id: &str,
        reason: ReasonCode,
    ) -> Result<TxReceipt, AdapterError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.finalized.contains_key(initiator_id) {
            return Err(AdapterError::TransactionFailure);
        }
        let block_number = inner.next_block;
        inner.next_block += 1;
        let tx_hash = synthetic_tx_hash(block_number);
        inner.finalized.insert(
            initiator_id.to_string(),
            InitiatorTxRecord {
                receipt: TxReceipt::new(tx_hash, block_number),
                function: ConfirmationKind::Abort,
                initiator_id: initiator_id.to_string(),
                reason: Some(reason),
            },
        );
        inner.confirmation_log.push(initiator_id.to_string());
        Ok(TxReceipt::new(tx_hash, block_number))
    }

    async fn report_error(&self, initiator_id: &str, reason: ReasonCode) -> Result<(), AdapterError> {
        self.inner.lock().unwrap().reported_errors.push((initiator_id.to_string(), reason));
        Ok(())
    }

    async fn monitor_confirmations(&self) -> Result<Vec<String>, AdapterError> {
        let mut inner = self.inner.lock().unwrap();
        let drained = inner.confirmation_log[inner.confirmation_cursor..].to_vec();
        inner.confirmation_cursor = inner.confirmation_log.len();
        Ok(drained)
    }

    async fn get_interledger_commit_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<InitiatorTxRecord>, AdapterError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .finalized
            .get(transfer.initiator_id())
            .filter(|r| r.function == ConfirmationKind::Commit)
            .cloned())
    }

    async fn get_interledger_abort_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<InitiatorTxRecord>, AdapterError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .finalized
            .get(transfer.initiator_id())
            .filter(|r| r.function == ConfirmationKind::Abort)
            .cloned())
    }

    async fn check_confirmation(
        &self,
        tx_key: TxKey,
    ) -> Result<Option<ConfirmationKind>, AdapterError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.finalized.values().find(|r| r.receipt.tx_hash == tx_key.tx_hash).map(|r| r.function))
    }
}

#[derive(Debug, Default)]
struct ResponderInner {
    next_block: u64,
    responses: HashMap<TransferId, (ResponseKind, TxReceipt)>,
    received_data: HashMap<TransferId, Vec<u8>>,
    reported_errors: Vec<(TransferId, ReasonCode)>,
}

/// An in-memory destination-ledger reference implementation.
///
/// Accepts every `send_data` call by default; tests can force a rejection for a specific nonce
/// via [`LocalResponder::reject_next`].
#[derive(Debug, Default)]
pub struct LocalResponder {
    inner: Mutex<ResponderInner>,
    reject: Mutex<std::collections::HashSet<TransferId>>,
}

impl LocalResponder {
    /// Creates a new, empty [`LocalResponder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: makes the next `send_data`/`send_data_inquire` call for `nonce` resolve as a
    /// rejection instead of an acceptance.
    pub fn reject_next(&self, nonce: TransferId) {
        self.reject.lock().unwrap().insert(nonce);
    }

    /// Test helper: the nonces ever reported to `report_error`.
    pub fn reported_errors(&self) -> Vec<(TransferId, ReasonCode)> {
        self.inner.lock().unwrap().reported_errors.clone()
    }
}

#[async_trait]
impl ResponderAdapter for LocalResponder {
    async fn send_data(&self, nonce: TransferId, data: &[u8]) -> Result<SendOutcome, AdapterError> {
        let accept = !self.reject.lock().unwrap().remove(&nonce);
        let mut inner = self.inner.lock().unwrap();
        let block_number = inner.next_block;
        inner.next_block += 1;
        let tx_hash = synthetic_tx_hash(block_number);
        let receipt = TxReceipt::new(tx_hash, block_number);
        let kind = if accept { ResponseKind::Accepted } else { ResponseKind::Rejected };
        inner.responses.insert(nonce, (kind, receipt));
        inner.received_data.insert(nonce, data.to_vec());
        Ok(SendOutcome { accepted: accept, receipt })
    }

    async fn get_send_response(
        &self,
        tx_hash: B256,
        nonce: TransferId,
    ) -> Result<SendOutcome, AdapterError> {
        let inner = self.inner.lock().unwrap();
        inner
            .responses
            .get(&nonce)
            .filter(|(_, receipt)| receipt.tx_hash == tx_hash)
            .map(|(kind, receipt)| SendOutcome { accepted: *kind == ResponseKind::Accepted, receipt: *receipt })
            .ok_or(AdapterError::TransactionFailure)
    }

    async fn check_response(&self, nonce: TransferId) -> Result<Option<ResponseKind>, AdapterError> {
        Ok(self.inner.lock().unwrap().responses.get(&nonce).map(|(kind, _)| *kind))
    }

    async fn get_interledger_receive_tx(
        &self,
        transfer: &Transfer,
    ) -> Result<Option<ReceiveTxRecord>, AdapterError> {
        let inner = self.inner.lock().unwrap();
        let nonce = transfer.id();
        Ok(inner.responses.get(&nonce).map(|(_, receipt)| ReceiveTxRecord {
            receipt: *receipt,
            nonce,
            data: inner.received_data.get(&nonce).cloned().unwrap_or_default(),
        }))
    }

    async fn report_error(&self, nonce: TransferId, reason: ReasonCode) -> Result<(), AdapterError> {
        self.inner.lock().unwrap().reported_errors.push((nonce, reason));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_event_round_trips_through_listen_for_events() {
        let initiator = LocalInitiator::new(b"secret".to_vec());
        initiator.emit_event("7", vec![0xDE], 1_000);

        let events = initiator.listen_for_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].initiator_id, "7");

        // Draining again yields nothing new.
        assert!(initiator.listen_for_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn process_event_is_deterministic() {
        let initiator = LocalInitiator::new(b"secret".to_vec());
        let event = initiator.emit_event("7", vec![0xDE], 1_000);
        let a = initiator.process_event(&event);
        let b = initiator.process_event(&event);
        assert_eq!(a.id(), b.id());
    }

    #[tokio::test]
    async fn commit_then_commit_again_surfaces_transaction_failure() {
        let initiator = LocalInitiator::new(b"secret".to_vec());
        initiator.commit_sending("7", None).await.unwrap();
        let err = initiator.commit_sending("7", None).await.unwrap_err();
        assert_eq!(err, AdapterError::TransactionFailure);
    }

    #[tokio::test]
    async fn responder_rejects_only_the_flagged_nonce() {
        let responder = LocalResponder::new();
        let nonce = TransferId::new(B256::from([9u8; 32]));
        responder.reject_next(nonce);

        let outcome = responder.send_data(nonce, b"payload").await.unwrap();
        assert!(!outcome.accepted);

        // Flag was consumed; a second call for the same nonce accepts.
        let outcome2 = responder.send_data(nonce, b"payload").await.unwrap();
        assert!(outcome2.accepted);
    }
}
