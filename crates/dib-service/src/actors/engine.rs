//! Wraps a [`RelayEngine`] in a polling loop the service layer can supervise as a [`RelayActor`].

use async_trait::async_trait;
use dib_core::{
    adapters::{InitiatorAdapter, ResponderAdapter},
    engine::RelayEngine,
};
use std::{convert::Infallible, sync::Arc, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::RelayActor;

/// Drives one [`RelayEngine`] direction by calling [`RelayEngine::tick`] on a fixed interval
/// until cancelled.
pub struct EngineActor<I, R> {
    label: &'static str,
    engine: Arc<RelayEngine<I, R>>,
    poll_interval: Duration,
    cancel_token: CancellationToken,
}

impl<I, R> EngineActor<I, R> {
    /// Builds a new actor. `label` identifies this direction in logs (e.g. `"left_to_right"`).
    pub fn new(
        label: &'static str,
        engine: Arc<RelayEngine<I, R>>,
        poll_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self { label, engine, poll_interval, cancel_token }
    }
}

#[async_trait]
impl<I, R> RelayActor for EngineActor<I, R>
where
    I: InitiatorAdapter + 'static,
    R: ResponderAdapter + 'static,
{
    // `RelayEngine::tick` has no failure mode of its own; per-phase errors are logged and
    // swallowed inside the engine.
    type Error = Infallible;

    async fn start(self) -> Result<(), Self::Error> {
        info!(target: "dib::engine_actor", direction = self.label, interval = ?self.poll_interval, "starting engine actor");

        loop {
            if self.cancel_token.is_cancelled() {
                break;
            }

            self.engine.tick().await;
            debug!(target: "dib::engine_actor", direction = self.label, "tick complete");

            tokio::select! {
                () = sleep(self.poll_interval) => {}
                () = self.cancel_token.cancelled() => break,
            }
        }

        info!(target: "dib::engine_actor", direction = self.label, "stopping due to cancellation");
        Ok(())
    }
}
