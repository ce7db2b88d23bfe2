use alloy_primitives::B256;
use core::fmt;

/// Globally unique identifier for a [`Transfer`].
///
/// Computed as `keccak256(block_number_be || tx_hash || log_index_be || secret)` so that any two
/// nodes observing the same source-ledger event and sharing the same `secret` derive the same id
/// (spec invariant: id determinism). Renders as a `0x`-prefixed hex string everywhere it crosses
/// an adapter boundary, matching the "opaque string" contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferId(B256);

impl TransferId {
    /// Wraps a raw 32-byte digest.
    pub const fn new(digest: B256) -> Self {
        Self(digest)
    }

    /// Returns the underlying digest.
    pub const fn digest(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Locates the source-ledger transaction that emitted a transfer's originating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxKey {
    /// Block number the transaction was mined in.
    pub block_number: u64,
    /// The transaction hash.
    pub tx_hash: B256,
}

impl TxKey {
    /// Creates a new [`TxKey`].
    pub const fn new(block_number: u64, tx_hash: B256) -> Self {
        Self { block_number, tx_hash }
    }
}

/// A single in-flight cross-ledger asset-movement intent.
///
/// Immutable once constructed (spec invariant): no field is ever mutated after
/// [`Transfer::new`] returns. State lives in the register's membership, not in this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    id: TransferId,
    initiator_id: String,
    data: Vec<u8>,
    initiation_timestamp: u64,
    initiator_tx_key: TxKey,
}

impl Transfer {
    /// Builds a new [`Transfer`]. `id` must already have been derived via the adapter's
    /// deterministic hashing (see `dib_core::adapters::compute_transfer_id`).
    pub const fn new(
        id: TransferId,
        initiator_id: String,
        data: Vec<u8>,
        initiation_timestamp: u64,
        initiator_tx_key: TxKey,
    ) -> Self {
        Self { id, initiator_id, data, initiation_timestamp, initiator_tx_key }
    }

    /// The transfer's globally unique id.
    pub const fn id(&self) -> TransferId {
        self.id
    }

    /// The id the source-ledger contract assigned to this intent.
    pub fn initiator_id(&self) -> &str {
        &self.initiator_id
    }

    /// `initiator_id` parsed as an integer, for duty-oracle arithmetic.
    ///
    /// This is guaranteed to be a native integer rendered as a decimal string; a malformed
    /// value here means a misbehaving or incompatible source contract, not a recoverable runtime
    /// condition, so this panics rather than threading a parse error through every caller.
    pub fn initiator_id_numeric(&self) -> u128 {
        self.initiator_id
            .parse()
            .unwrap_or_else(|_| panic!("initiator_id {:?} is not a decimal integer", self.initiator_id))
    }

    /// The opaque payload carried end-to-end unchanged.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Source-ledger block timestamp (seconds since epoch) of the emitting block.
    pub const fn initiation_timestamp(&self) -> u64 {
        self.initiation_timestamp
    }

    /// Locates the transaction that emitted this transfer's originating event.
    pub const fn initiator_tx_key(&self) -> TxKey {
        self.initiator_tx_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_initiator_id_parses_decimal_string() {
        let t = Transfer::new(
            TransferId::new(B256::ZERO),
            "42".to_string(),
            vec![],
            0,
            TxKey::new(0, B256::ZERO),
        );
        assert_eq!(t.initiator_id_numeric(), 42);
    }

    #[test]
    #[should_panic(expected = "not a decimal integer")]
    fn numeric_initiator_id_panics_on_garbage() {
        let t = Transfer::new(
            TransferId::new(B256::ZERO),
            "not-a-number".to_string(),
            vec![],
            0,
            TxKey::new(0, B256::ZERO),
        );
        t.initiator_id_numeric();
    }

    #[test]
    fn display_renders_hex() {
        let id = TransferId::new(B256::from([1u8; 32]));
        assert_eq!(format!("{id}"), format!("{}", B256::from([1u8; 32])));
    }
}
