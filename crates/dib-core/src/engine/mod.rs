//! Main event loop: drains initiator events, drives the responder, confirms back to the
//! initiator, reaps timeouts, and runs verification.

use crate::{
    adapters::{AdapterError, InitiatorAdapter, ResponderAdapter},
    config::NodeConfig,
    duty,
    error::EngineError,
    metrics::Metrics,
    register::TransferRegister,
    verifier,
};
use dib_metrics::MetricsReporter;
use dib_types::{ReasonCode, Transfer};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::task::JoinSet;
use tracing::{debug, warn};

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Runs `fut`, optionally wrapped in success/error/duration metrics tagged by `method`. A no-op
/// passthrough when `enabled` is `false`, so deployments that never enable metrics don't pay
/// recording overhead.
async fn observe<T, E>(
    enabled: bool,
    method: &'static str,
    fut: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    if enabled {
        dib_metrics::observe_metrics_for_result_async!(
            Metrics::ENGINE_CALLS_SUCCESS_TOTAL,
            Metrics::ENGINE_CALLS_ERROR_TOTAL,
            Metrics::ENGINE_CALL_DURATION_SECONDS,
            method,
            fut
        )
    } else {
        fut.await
    }
}

/// Submits `t` to the destination ledger and, depending on [`NodeConfig::confirm_transfer`],
/// immediately confirms the outcome back to the source.
async fn execute<I, R>(
    initiator: &I,
    responder: &R,
    config: &NodeConfig,
    register: &TransferRegister,
    t: &Transfer,
    metrics_enabled: bool,
) -> Result<(), EngineError>
where
    I: InitiatorAdapter,
    R: ResponderAdapter,
{
    observe(metrics_enabled, Metrics::METHOD_EXECUTE, async {
        let outcome = match responder.send_data(t.id(), t.data()).await {
            Ok(outcome) => outcome,
            Err(AdapterError::Timeout) => {
                debug!(target: "dib::engine", transfer = %t.id(), "send_data timed out, retrying next tick");
                return Ok(());
            }
            Err(err) => {
                if !config.confirm_transfer() {
                    return Ok(());
                }
                let reason = err.reason_code().ok_or(EngineError::SendFailedWithoutReason)?;
                return confirm(initiator, register, t, Some(reason), metrics_enabled).await;
            }
        };

        if !config.confirm_transfer() {
            return Ok(());
        }

        if outcome.accepted {
            confirm(initiator, register, t, None, metrics_enabled).await
        } else {
            let reason = outcome.reason_code().ok_or(EngineError::SendFailedWithoutReason)?;
            confirm(initiator, register, t, Some(reason), metrics_enabled).await
        }
    })
    .await
}

/// Finalizes `t` on the source ledger and deregisters it regardless of the finalization outcome:
/// a revert here means a racing node already finalized this transfer.
async fn confirm<I>(
    initiator: &I,
    register: &TransferRegister,
    t: &Transfer,
    error: Option<ReasonCode>,
    metrics_enabled: bool,
) -> Result<(), EngineError>
where
    I: InitiatorAdapter,
{
    observe(metrics_enabled, Metrics::METHOD_CONFIRM, async {
        let result = match error {
            Some(reason) => initiator.abort_sending(t.initiator_id(), reason).await,
            None => initiator.commit_sending(t.initiator_id(), None).await,
        };
        if let Err(err) = result {
            warn!(
                target: "dib::engine",
                transfer = %t.id(),
                error = %err,
                "commit/abort submission failed; deregistering anyway"
            );
        }
        register.deregister(t.id()).await;
        Ok(())
    })
    .await
}

/// Recovery procedure for a transfer whose duty period has rotated to this node.
async fn process_timeout<I, R>(
    initiator: &I,
    responder: &R,
    config: &NodeConfig,
    register: &TransferRegister,
    t: &Transfer,
    metrics_enabled: bool,
) -> Result<(), EngineError>
where
    I: InitiatorAdapter,
    R: ResponderAdapter,
{
    observe(metrics_enabled, Metrics::METHOD_PROCESS_TIMEOUT, async {
        let Some(receive_tx) = responder.get_interledger_receive_tx(t).await? else {
            // A. No send on destination: the previous owner never sent.
            return execute(initiator, responder, config, register, t, metrics_enabled).await;
        };

        let Some(_ack) = responder.check_response(t.id()).await? else {
            // B. Sent, no ack: wait for another tick.
            return Ok(());
        };

        let commit_tx = initiator.get_interledger_commit_tx(t).await?;
        let abort_tx = initiator.get_interledger_abort_tx(t).await?;
        if commit_tx.is_some() || abort_tx.is_some() {
            // D. Fully finalized: verification phase will deregister.
            return Ok(());
        }

        // C. Sent, ack emitted, no source-side finalization: recover the outcome and confirm.
        let outcome = responder.get_send_response(receive_tx.receipt.tx_hash, t.id()).await?;
        let reason = if outcome.accepted { None } else { outcome.reason_code() };
        confirm(initiator, register, t, reason, metrics_enabled).await
    })
    .await
}

/// Drives one direction of the bridge end to end.
///
/// Generic over the adapter pair so the same engine runs against any ledger implementation; the
/// [`TransferRegister`] it owns is private, single-node, in-memory state.
#[derive(Debug)]
pub struct RelayEngine<I, R> {
    config: Arc<NodeConfig>,
    initiator: Arc<I>,
    responder: Arc<R>,
    register: Arc<TransferRegister>,
    metrics_enabled: bool,
}

impl<I, R> RelayEngine<I, R>
where
    I: InitiatorAdapter + 'static,
    R: ResponderAdapter + 'static,
{
    /// Builds a new engine with an empty register.
    pub fn new(config: Arc<NodeConfig>, initiator: Arc<I>, responder: Arc<R>) -> Self {
        Self {
            config,
            initiator,
            responder,
            register: Arc::new(TransferRegister::new()),
            metrics_enabled: false,
        }
    }

    /// Enables per-call metrics (success/error counters, duration histogram) for every engine
    /// phase, plus the register-size gauge reported by [`MetricsReporter::report_metrics`].
    pub fn with_metrics(mut self) -> Self {
        self.metrics_enabled = true;
        Metrics::init();
        self
    }

    /// The live-transfer register, exposed for monitoring and tests.
    pub fn register(&self) -> &Arc<TransferRegister> {
        &self.register
    }

    /// Runs one full tick: ingest, then (if enabled) verify, then (if enabled) reap.
    ///
    /// Ordering is load-bearing and must not be reshuffled: a transfer ingested this tick must
    /// not be eligible for reaping in the same tick's duty computation.
    pub async fn tick(&self) {
        self.ingest().await;
        if self.config.verification_enabled() {
            self.verify_phase().await;
        }
        if self.config.timeout_enabled() {
            self.reap().await;
        }
    }

    async fn ingest(&self) {
        let events = match self.initiator.listen_for_events().await {
            Ok(events) => events,
            Err(err) => {
                warn!(target: "dib::engine", error = %err, "listen_for_events failed");
                return;
            }
        };

        let now = now_unix();
        let mut tasks: JoinSet<()> = JoinSet::new();
        for event in events {
            let initiator = self.initiator.clone();
            let responder = self.responder.clone();
            let config = self.config.clone();
            let register = self.register.clone();
            let metrics_enabled = self.metrics_enabled;
            tasks.spawn(async move {
                let t = initiator.process_event(&event);
                register.register(t.clone()).await;
                let duty = duty::duty(&t, now, &config);
                if duty.is_my_duty {
                    if let Err(err) = execute(
                        initiator.as_ref(),
                        responder.as_ref(),
                        config.as_ref(),
                        register.as_ref(),
                        &t,
                        metrics_enabled,
                    )
                    .await
                    {
                        warn!(target: "dib::engine", transfer = %t.id(), error = %err, "execute failed");
                    }
                }
            });
        }
        while tasks.join_next().await.is_some() {}
    }

    async fn verify_phase(&self) {
        let initiator_ids = match self.initiator.monitor_confirmations().await {
            Ok(ids) => ids,
            Err(err) => {
                warn!(target: "dib::engine", error = %err, "monitor_confirmations failed");
                return;
            }
        };

        let mut tasks: JoinSet<()> = JoinSet::new();
        for initiator_id in initiator_ids {
            let Some(t) = self.register.find_by_initiator_id(&initiator_id).await else {
                continue;
            };
            let initiator = self.initiator.clone();
            let responder = self.responder.clone();
            let register = self.register.clone();
            let metrics_enabled = self.metrics_enabled;
            tasks.spawn(async move {
                let call = verifier::verify(initiator.as_ref(), responder.as_ref(), register.as_ref(), &t);
                if let Err(err) = observe(metrics_enabled, Metrics::METHOD_VERIFY, call).await {
                    warn!(target: "dib::engine", transfer = %t.id(), error = %err, "verify failed");
                }
            });
        }
        while tasks.join_next().await.is_some() {}
    }

    async fn reap(&self) {
        let now = now_unix();
        let config = self.config.clone();
        let due: Vec<Transfer> = self
            .register
            .iterate()
            .await
            .into_iter()
            .filter(|t| {
                let d = duty::duty(t, now, &config);
                d.is_timed_out && d.is_my_duty
            })
            .collect();

        let mut tasks: JoinSet<()> = JoinSet::new();
        for t in due {
            let initiator = self.initiator.clone();
            let responder = self.responder.clone();
            let config = self.config.clone();
            let register = self.register.clone();
            let metrics_enabled = self.metrics_enabled;
            tasks.spawn(async move {
                if let Err(err) = process_timeout(
                    initiator.as_ref(),
                    responder.as_ref(),
                    config.as_ref(),
                    register.as_ref(),
                    &t,
                    metrics_enabled,
                )
                .await
                {
                    warn!(target: "dib::engine", transfer = %t.id(), error = %err, "process_timeout failed");
                }
            });
        }
        while tasks.join_next().await.is_some() {}
    }
}

impl<I, R> MetricsReporter for RelayEngine<I, R>
where
    I: InitiatorAdapter + 'static,
    R: ResponderAdapter + 'static,
{
    /// Samples the register-size gauge. A non-blocking, best-effort read: under contention the
    /// sample is skipped rather than stalling the periodic metrics worker.
    fn report_metrics(&self) {
        if !self.metrics_enabled {
            return;
        }
        if let Some(len) = self.register.try_len() {
            metrics::gauge!(Metrics::REGISTER_SIZE).set(len as f64);
        }
    }
}
