//! The [`RelayActor`] trait is an actor-like service for the bridge's service layer.

use async_trait::async_trait;

/// A background task the service layer supervises: it owns its inputs, runs until cancelled or
/// until its upstream channel closes, and reports a single terminal error if it exits early.
#[async_trait]
pub trait RelayActor {
    /// The error type surfaced if the actor exits before being asked to stop.
    type Error: std::fmt::Debug;

    /// Runs the actor to completion.
    async fn start(self) -> Result<(), Self::Error>;
}
