//! In-memory bookkeeping of live transfers.

use dib_types::{Transfer, TransferId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Mapping from transfer id to [`Transfer`], with a secondary index from `initiator_id`.
///
/// Single-node, in-memory, lost on restart — surviving state is reconstructed by the duty
/// oracle's recovery procedure, not by persisting this structure.
#[derive(Debug, Default)]
pub struct TransferRegister {
    inner: RwLock<RegisterInner>,
}

#[derive(Debug, Default)]
struct RegisterInner {
    by_id: HashMap<TransferId, Transfer>,
    by_initiator_id: HashMap<String, TransferId>,
}

impl TransferRegister {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `t`, making it visible to iteration as soon as this call returns.
    ///
    /// Overwrites any existing entry with the same id — this happens benignly when two nodes (or
    /// two concurrent ingest tasks on this node) observe the same source event.
    pub async fn register(&self, t: Transfer) {
        let mut inner = self.inner.write().await;
        inner.by_initiator_id.insert(t.initiator_id().to_string(), t.id());
        inner.by_id.insert(t.id(), t);
    }

    /// Removes and returns the Transfer keyed by `id`, or `None` if it was already absent.
    pub async fn deregister(&self, id: TransferId) -> Option<Transfer> {
        let mut inner = self.inner.write().await;
        let t = inner.by_id.remove(&id)?;
        inner.by_initiator_id.remove(t.initiator_id());
        Some(t)
    }

    /// Looks up the live Transfer by its source-contract `initiator_id`, if any.
    pub async fn find_by_initiator_id(&self, initiator_id: &str) -> Option<Transfer> {
        let inner = self.inner.read().await;
        let id = inner.by_initiator_id.get(initiator_id)?;
        inner.by_id.get(id).cloned()
    }

    /// Returns a point-in-time snapshot of every currently-registered Transfer.
    ///
    /// Snapshots ids before returning so that a caller iterating the result is unaffected by
    /// concurrent `register`/`deregister` calls racing this one.
    pub async fn iterate(&self) -> Vec<Transfer> {
        let inner = self.inner.read().await;
        inner.by_id.values().cloned().collect()
    }

    /// Number of currently-registered transfers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    /// Whether the register currently holds no transfers.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }

    /// Best-effort, non-blocking read of [`Self::len`], for periodic metrics reporting where
    /// skipping a sample under contention is preferable to blocking the reporter.
    pub fn try_len(&self) -> Option<usize> {
        self.inner.try_read().ok().map(|inner| inner.by_id.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use dib_types::TxKey;

    fn transfer(id_byte: u8, initiator_id: &str) -> Transfer {
        Transfer::new(
            TransferId::new(B256::from([id_byte; 32])),
            initiator_id.to_string(),
            vec![0xAB],
            1_000,
            TxKey::new(1, B256::from([id_byte; 32])),
        )
    }

    #[tokio::test]
    async fn register_then_find_by_initiator_id() {
        let register = TransferRegister::new();
        let t = transfer(1, "7");
        register.register(t.clone()).await;

        assert_eq!(register.find_by_initiator_id("7").await, Some(t));
        assert_eq!(register.len().await, 1);
    }

    #[tokio::test]
    async fn deregister_removes_both_indices() {
        let register = TransferRegister::new();
        let t = transfer(2, "9");
        register.register(t.clone()).await;

        let removed = register.deregister(t.id()).await;
        assert_eq!(removed, Some(t));
        assert!(register.is_empty().await);
        assert_eq!(register.find_by_initiator_id("9").await, None);
    }

    #[tokio::test]
    async fn deregister_of_absent_id_is_none() {
        let register = TransferRegister::new();
        assert_eq!(register.deregister(TransferId::new(B256::ZERO)).await, None);
    }

    #[tokio::test]
    async fn iterate_snapshots_current_membership() {
        let register = TransferRegister::new();
        register.register(transfer(1, "a")).await;
        register.register(transfer(2, "b")).await;

        let mut ids: Vec<_> = register.iterate().await.into_iter().map(|t| t.id()).collect();
        ids.sort();
        let mut expected =
            vec![TransferId::new(B256::from([1u8; 32])), TransferId::new(B256::from([2u8; 32]))];
        expected.sort();
        assert_eq!(ids, expected);
    }
}
