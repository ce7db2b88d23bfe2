/// Which way this deployment relays transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `left` is the initiator, `right` is the responder.
    LeftToRight,
    /// `right` is the initiator, `left` is the responder.
    RightToLeft,
    /// Both directions are relayed concurrently by the same node.
    Both,
}

/// The kind of ledger driver a configured section names.
///
/// Concrete driver implementations (signing, RPC, event filtering) are out of scope for this
/// workspace; only [`LedgerKind::Local`] has an in-tree implementation, used for tests and as a
/// reference for what a real driver's adapter impl looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// An Ethereum-compatible EVM chain.
    Ethereum,
    /// A Keyless Signature Infrastructure ledger.
    Ksi,
    /// A Hyperledger Fabric channel.
    Fabric,
    /// A Hyperledger Indy ledger.
    Indy,
    /// An in-memory reference ledger used for tests and demonstrations.
    Local,
}
