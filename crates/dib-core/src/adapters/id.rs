use alloy_primitives::{B256, keccak256};
use dib_types::TransferId;

/// Deterministically derives a [`TransferId`] from `(block_number, tx_hash, log_index)` salted
/// with a shared secret.
///
/// Two nodes configured with the same `secret` compute the same id for the same observed event,
/// independent of process restarts or which node observes it first.
pub fn compute_transfer_id(
    block_number: u64,
    tx_hash: B256,
    log_index: u32,
    secret: &[u8],
) -> TransferId {
    let mut preimage = Vec::with_capacity(8 + 32 + 4 + secret.len());
    preimage.extend_from_slice(&block_number.to_be_bytes());
    preimage.extend_from_slice(tx_hash.as_slice());
    preimage.extend_from_slice(&log_index.to_be_bytes());
    preimage.extend_from_slice(secret);
    TransferId::new(keccak256(preimage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_same_id() {
        let tx_hash = B256::from([7u8; 32]);
        let a = compute_transfer_id(10, tx_hash, 2, b"shared-secret");
        let b = compute_transfer_id(10, tx_hash, 2, b"shared-secret");
        assert_eq!(a, b);
    }

    #[test]
    fn different_secret_produces_different_id() {
        let tx_hash = B256::from([7u8; 32]);
        let a = compute_transfer_id(10, tx_hash, 2, b"secret-one");
        let b = compute_transfer_id(10, tx_hash, 2, b"secret-two");
        assert_ne!(a, b);
    }

    #[test]
    fn different_log_index_produces_different_id() {
        let tx_hash = B256::from([7u8; 32]);
        let a = compute_transfer_id(10, tx_hash, 0, b"s");
        let b = compute_transfer_id(10, tx_hash, 1, b"s");
        assert_ne!(a, b);
    }
}
