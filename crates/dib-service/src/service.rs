//! Wires a configured pair of ledger adapters into one or two [`RelayEngine`]s and supervises
//! them (and, if enabled, a [`MetricWorker`]) to completion.

use anyhow::Result;
use dib_core::{
    adapters::{InitiatorAdapter, ResponderAdapter},
    config::NodeConfig,
    engine::RelayEngine,
};
use dib_types::Direction;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::actors::{EngineActor, MetricWorker, RelayActor};

/// Runs one or both directions of the bridge against a `left`/`right` ledger pair, per
/// [`Direction`].
///
/// `L` and `R` each implement both adapter traits because either ledger may act as initiator or
/// responder depending on `direction`; a concrete driver that only ever plays one role still
/// satisfies both traits trivially (a one-sided implementation is a driver concern, not a
/// service-layer one).
pub struct RelayService<L, R> {
    direction: Direction,
    left: Arc<L>,
    right: Arc<R>,
    config: Arc<NodeConfig>,
    poll_interval: Duration,
    metrics_enabled: bool,
    cancel_token: CancellationToken,
    join_set: JoinSet<Result<()>>,
}

impl<L, R> RelayService<L, R>
where
    L: InitiatorAdapter + ResponderAdapter + 'static,
    R: InitiatorAdapter + ResponderAdapter + 'static,
{
    /// Builds a new, not-yet-running service.
    pub fn new(direction: Direction, left: Arc<L>, right: Arc<R>, config: Arc<NodeConfig>) -> Self {
        Self {
            direction,
            left,
            right,
            config,
            poll_interval: Duration::from_secs(1),
            metrics_enabled: false,
            cancel_token: CancellationToken::new(),
            join_set: JoinSet::new(),
        }
    }

    /// Overrides the default one-second engine poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Enables per-engine metrics and a [`MetricWorker`] that samples them every 30 seconds.
    pub fn with_metrics(mut self) -> Self {
        self.metrics_enabled = true;
        self
    }

    /// Returns a token the caller can cancel to request shutdown, mirroring the token passed to
    /// [`Self::run`].
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    fn build_engine<I, Rsp>(
        &self,
        initiator: Arc<I>,
        responder: Arc<Rsp>,
    ) -> Arc<RelayEngine<I, Rsp>>
    where
        I: InitiatorAdapter + 'static,
        Rsp: ResponderAdapter + 'static,
    {
        let engine = RelayEngine::new(self.config.clone(), initiator, responder);
        Arc::new(if self.metrics_enabled { engine.with_metrics() } else { engine })
    }

    fn spawn_actor<A>(&mut self, label: &'static str, actor: A)
    where
        A: RelayActor + Send + 'static,
        A::Error: std::fmt::Display + Send + 'static,
    {
        self.join_set.spawn(async move {
            actor.start().await.map_err(|err| anyhow::anyhow!("{label} actor failed: {err}"))
        });
    }

    /// Spawns the configured engine(s) and metric worker, then drives them until `cancel_token`
    /// fires or an actor exits with an error.
    pub async fn run(mut self, cancel_token: CancellationToken) -> Result<()> {
        self.cancel_token = cancel_token;

        match self.direction {
            Direction::LeftToRight => {
                let engine = self.build_engine(self.left.clone(), self.right.clone());
                self.spawn_actor(
                    "left_to_right",
                    EngineActor::new(
                        "left_to_right",
                        engine.clone(),
                        self.poll_interval,
                        self.cancel_token.clone(),
                    ),
                );
                self.spawn_metric_worker(vec![engine]);
            }
            Direction::RightToLeft => {
                let engine = self.build_engine(self.right.clone(), self.left.clone());
                self.spawn_actor(
                    "right_to_left",
                    EngineActor::new(
                        "right_to_left",
                        engine.clone(),
                        self.poll_interval,
                        self.cancel_token.clone(),
                    ),
                );
                self.spawn_metric_worker(vec![engine]);
            }
            Direction::Both => {
                let left_to_right = self.build_engine(self.left.clone(), self.right.clone());
                let right_to_left = self.build_engine(self.right.clone(), self.left.clone());
                self.spawn_actor(
                    "left_to_right",
                    EngineActor::new(
                        "left_to_right",
                        left_to_right.clone(),
                        self.poll_interval,
                        self.cancel_token.clone(),
                    ),
                );
                self.spawn_actor(
                    "right_to_left",
                    EngineActor::new(
                        "right_to_left",
                        right_to_left.clone(),
                        self.poll_interval,
                        self.cancel_token.clone(),
                    ),
                );
                self.spawn_metric_worker(vec![left_to_right, right_to_left]);
            }
        }

        info!(target: "dib::service", direction = ?self.direction, "relay service started");

        while let Some(res) = self.join_set.join_next().await {
            match res {
                Ok(Ok(())) => info!(target: "dib::service", "actor completed"),
                Ok(Err(err)) => {
                    error!(target: "dib::service", %err, "actor failed; cancelling service");
                    self.cancel_token.cancel();
                    return Err(err);
                }
                Err(err) => {
                    error!(target: "dib::service", %err, "actor task panicked; cancelling service");
                    self.cancel_token.cancel();
                    return Err(anyhow::anyhow!("actor task panicked: {err}"));
                }
            }
        }
        Ok(())
    }

    fn spawn_metric_worker<I, Rsp>(&mut self, reporters: Vec<Arc<RelayEngine<I, Rsp>>>)
    where
        I: InitiatorAdapter + 'static,
        Rsp: ResponderAdapter + 'static,
    {
        if !self.metrics_enabled {
            return;
        }
        self.spawn_actor(
            "metric_worker",
            MetricWorker::new(Duration::from_secs(30), reporters, self.cancel_token.clone()),
        );
    }

    /// Cancels every running actor and waits for them to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        self.cancel_token.cancel();
        while let Some(res) = self.join_set.join_next().await {
            if let Err(err) = res {
                error!(target: "dib::service", %err, "actor task panicked during shutdown");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dib_core::adapters::{
        AdapterError,
        local::{LocalInitiator, LocalResponder},
        types::{ConfirmationKind, InitiatorTxRecord, ReceiveTxRecord, ResponseKind, SendOutcome, TxReceipt},
    };
    use dib_types::{IntentEvent, ReasonCode, Transfer, TransferId, TxKey};
    use std::time::Duration as StdDuration;

    /// Test-only stand-in for a ledger driver that plays both roles, so [`Direction::Both`] can
    /// be exercised against the in-memory reference adapters (which split the roles for clarity).
    #[derive(Debug, Default)]
    struct LocalLedger {
        initiator: LocalInitiator,
        responder: LocalResponder,
    }

    impl LocalLedger {
        fn new(secret: impl Into<Vec<u8>>) -> Self {
            Self { initiator: LocalInitiator::new(secret), responder: LocalResponder::new() }
        }
    }

    #[async_trait]
    impl InitiatorAdapter for LocalLedger {
        async fn listen_for_events(&self) -> Result<Vec<IntentEvent>, AdapterError> {
            self.initiator.listen_for_events().await
        }
        fn process_event(&self, event: &IntentEvent) -> Transfer {
            self.initiator.process_event(event)
        }
        async fn commit_sending(
            &self,
            initiator_id: &str,
            data: Option<&[u8]>,
        ) -> Result<TxReceipt, AdapterError> {
            self.initiator.commit_sending(initiator_id, data).await
        }
        async fn abort_sending(
            &self,
            initiator_id: &str,
            reason: ReasonCode,
        ) -> Result<TxReceipt, AdapterError> {
            self.initiator.abort_sending(initiator_id, reason).await
        }
        async fn report_error(&self, initiator_id: &str, reason: ReasonCode) -> Result<(), AdapterError> {
            self.initiator.report_error(initiator_id, reason).await
        }
        async fn monitor_confirmations(&self) -> Result<Vec<String>, AdapterError> {
            self.initiator.monitor_confirmations().await
        }
        async fn get_interledger_commit_tx(
            &self,
            transfer: &Transfer,
        ) -> Result<Option<InitiatorTxRecord>, AdapterError> {
            self.initiator.get_interledger_commit_tx(transfer).await
        }
        async fn get_interledger_abort_tx(
            &self,
            transfer: &Transfer,
        ) -> Result<Option<InitiatorTxRecord>, AdapterError> {
            self.initiator.get_interledger_abort_tx(transfer).await
        }
        async fn check_confirmation(
            &self,
            tx_key: TxKey,
        ) -> Result<Option<ConfirmationKind>, AdapterError> {
            self.initiator.check_confirmation(tx_key).await
        }
    }

    #[async_trait]
    impl ResponderAdapter for LocalLedger {
        async fn send_data(&self, nonce: TransferId, data: &[u8]) -> Result<SendOutcome, AdapterError> {
            self.responder.send_data(nonce, data).await
        }
        async fn get_send_response(
            &self,
            tx_hash: alloy_primitives::B256,
            nonce: TransferId,
        ) -> Result<SendOutcome, AdapterError> {
            self.responder.get_send_response(tx_hash, nonce).await
        }
        async fn check_response(&self, nonce: TransferId) -> Result<Option<ResponseKind>, AdapterError> {
            self.responder.check_response(nonce).await
        }
        async fn get_interledger_receive_tx(
            &self,
            transfer: &Transfer,
        ) -> Result<Option<ReceiveTxRecord>, AdapterError> {
            self.responder.get_interledger_receive_tx(transfer).await
        }
        async fn report_error(&self, nonce: TransferId, reason: ReasonCode) -> Result<(), AdapterError> {
            self.responder.report_error(nonce, reason).await
        }
    }

    fn config() -> Arc<NodeConfig> {
        Arc::new(
            NodeConfig::new(
                1,
                1,
                b"shared-secret".to_vec(),
                StdDuration::from_secs(30),
                2.0,
                true,
                true,
                true,
                true,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn left_to_right_relays_and_stops_on_cancel() {
        let left = Arc::new(LocalLedger::new(b"shared-secret".to_vec()));
        let right = Arc::new(LocalLedger::new(b"shared-secret".to_vec()));
        left.initiator.emit_event("7", vec![0xDE], u64::MAX / 2);

        let service = RelayService::new(Direction::LeftToRight, left.clone(), right, config())
            .with_poll_interval(StdDuration::from_millis(10));
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(service.run(cancel_token.clone()));

        tokio::time::sleep(StdDuration::from_millis(60)).await;
        cancel_token.cancel();

        assert!(handle.await.unwrap().is_ok());
        assert!(left.initiator.finalized_record("7").is_some());
    }

    #[tokio::test]
    async fn both_directions_relay_independently() {
        let left = Arc::new(LocalLedger::new(b"shared-secret".to_vec()));
        let right = Arc::new(LocalLedger::new(b"shared-secret".to_vec()));
        left.initiator.emit_event("7", vec![0xDE], u64::MAX / 2);
        right.initiator.emit_event("9", vec![0xAB], u64::MAX / 2);

        let service = RelayService::new(Direction::Both, left.clone(), right.clone(), config())
            .with_poll_interval(StdDuration::from_millis(10))
            .with_metrics();
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(service.run(cancel_token.clone()));

        tokio::time::sleep(StdDuration::from_millis(60)).await;
        cancel_token.cancel();

        assert!(handle.await.unwrap().is_ok());
        assert!(left.initiator.finalized_record("7").is_some());
        assert!(right.initiator.finalized_record("9").is_some());
    }
}
