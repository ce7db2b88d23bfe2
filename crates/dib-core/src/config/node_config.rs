use thiserror::Error;

/// Why a [`NodeConfig`] failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `node_count` was zero.
    #[error("node_count must be at least 1")]
    ZeroNodeCount,

    /// `node_id` was outside `[1, node_count]`.
    #[error("node_id {node_id} is out of range [1, {node_count}]")]
    NodeIdOutOfRange {
        /// The offending `node_id`.
        node_id: u32,
        /// The configured `node_count` it was checked against.
        node_count: u32,
    },

    /// `timeout_backoff` was not strictly greater than `1.0`, so the exponential schedule would
    /// never grow.
    #[error("timeout_backoff must be greater than 1.0, got {0}")]
    NonGrowingBackoff(f64),
}

/// Per-node identity and tuning parameters for a single relayer process.
///
/// A plain, already-validated value type. Reading this from a config file or CLI flags is left to
/// the embedder; this workspace only validates the values once they're in hand
/// ([`NodeConfig::new`]).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    node_id: u32,
    node_count: u32,
    secret: Vec<u8>,
    timeout_initial: std::time::Duration,
    timeout_backoff: f64,
    timeout_enabled: bool,
    verification_enabled: bool,
    confirm_transfer: bool,
    route_to_first_node: bool,
}

impl NodeConfig {
    /// Validates and builds a [`NodeConfig`].
    ///
    /// `node_id` is 1-based, matching the `(transfer_anchor + k) mod node_count + 1` duty
    /// formula, which yields owners in `[1, node_count]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        node_id: u32,
        node_count: u32,
        secret: Vec<u8>,
        timeout_initial: std::time::Duration,
        timeout_backoff: f64,
        timeout_enabled: bool,
        verification_enabled: bool,
        confirm_transfer: bool,
        route_to_first_node: bool,
    ) -> Result<Self, ConfigError> {
        if node_count == 0 {
            return Err(ConfigError::ZeroNodeCount);
        }
        if node_id == 0 || node_id > node_count {
            return Err(ConfigError::NodeIdOutOfRange { node_id, node_count });
        }
        if timeout_backoff <= 1.0 {
            return Err(ConfigError::NonGrowingBackoff(timeout_backoff));
        }
        Ok(Self {
            node_id,
            node_count,
            secret,
            timeout_initial,
            timeout_backoff,
            timeout_enabled,
            verification_enabled,
            confirm_transfer,
            route_to_first_node,
        })
    }

    /// This node's 1-based position among the fleet.
    pub const fn node_id(&self) -> u32 {
        self.node_id
    }

    /// Total number of nodes in the fleet.
    pub const fn node_count(&self) -> u32 {
        self.node_count
    }

    /// Shared secret salted into transfer-id derivation (spec invariant: id determinism).
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Duration of the first duty period, `k = 0`.
    pub const fn timeout_initial(&self) -> std::time::Duration {
        self.timeout_initial
    }

    /// Multiplicative growth factor applied per elapsed period. Always `> 1.0`.
    pub const fn timeout_backoff(&self) -> f64 {
        self.timeout_backoff
    }

    /// Whether the duty oracle ever reassigns ownership away from the original duty holder on
    /// timeout.
    pub const fn timeout_enabled(&self) -> bool {
        self.timeout_enabled
    }

    /// Whether the verifier runs at all.
    pub const fn verification_enabled(&self) -> bool {
        self.verification_enabled
    }

    /// Whether `execute` immediately confirms (commits or aborts) on the source ledger once the
    /// destination outcome is known. `false` is a test hook for setups where the destination
    /// contract itself drives confirmation.
    pub const fn confirm_transfer(&self) -> bool {
        self.confirm_transfer
    }

    /// Whether duty always resolves to node 1 regardless of the computed owner, for
    /// single-writer deployments.
    pub const fn route_to_first_node(&self) -> bool {
        self.route_to_first_node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build(node_id: u32, node_count: u32) -> Result<NodeConfig, ConfigError> {
        NodeConfig::new(node_id, node_count, vec![1, 2, 3], Duration::from_secs(30), 2.0, true, true, true, false)
    }

    #[test]
    fn accepts_node_id_at_either_edge_of_the_range() {
        assert!(build(1, 4).is_ok());
        assert!(build(4, 4).is_ok());
    }

    #[test]
    fn rejects_zero_node_count() {
        assert_eq!(build(1, 0), Err(ConfigError::ZeroNodeCount));
    }

    #[test]
    fn rejects_node_id_of_zero() {
        assert_eq!(build(0, 4), Err(ConfigError::NodeIdOutOfRange { node_id: 0, node_count: 4 }));
    }

    #[test]
    fn rejects_node_id_beyond_node_count() {
        assert_eq!(build(5, 4), Err(ConfigError::NodeIdOutOfRange { node_id: 5, node_count: 4 }));
    }

    #[test]
    fn rejects_non_growing_backoff() {
        let err = NodeConfig::new(1, 4, vec![], Duration::from_secs(1), 1.0, true, true, true, false).unwrap_err();
        assert_eq!(err, ConfigError::NonGrowingBackoff(1.0));
    }
}
