use crate::transfer::TxKey;
use alloy_primitives::B256;

/// A raw `InterledgerEventSending(uint256 id, bytes data)` log observed on the source ledger,
/// before it has been turned into a [`crate::Transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentEvent {
    /// The block the event was emitted in.
    pub block_number: u64,
    /// Timestamp of the emitting block.
    pub block_timestamp: u64,
    /// The transaction that emitted the event.
    pub tx_hash: B256,
    /// Position of the event's log entry within the transaction's receipt.
    pub log_index: u32,
    /// The source contract's `id` argument, rendered as a decimal string.
    pub initiator_id: String,
    /// The opaque `data` argument.
    pub data: Vec<u8>,
}

impl IntentEvent {
    /// The transaction key locating this event's emitting transaction.
    pub const fn tx_key(&self) -> TxKey {
        TxKey::new(self.block_number, self.tx_hash)
    }
}
