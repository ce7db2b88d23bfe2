use async_trait::async_trait;
use dib_metrics::MetricsReporter;
use std::{io, sync::Arc, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::RelayActor;

/// Periodically samples every registered [`MetricsReporter`].
#[derive(derive_more::Constructor)]
pub struct MetricWorker<R> {
    interval: Duration,
    reporters: Vec<Arc<R>>,
    cancel_token: CancellationToken,
}

#[async_trait]
impl<R> RelayActor for MetricWorker<R>
where
    R: MetricsReporter + Send + Sync + 'static,
{
    type Error = io::Error;

    async fn start(self) -> Result<(), Self::Error> {
        info!(target: "dib::metric_worker", interval = ?self.interval, "starting metric worker");

        loop {
            if self.cancel_token.is_cancelled() {
                info!(target: "dib::metric_worker", "stopping due to cancellation");
                break;
            }

            for reporter in &self.reporters {
                reporter.report_metrics();
            }

            tokio::select! {
                () = sleep(self.interval) => {}
                () = self.cancel_token.cancelled() => {
                    info!(target: "dib::metric_worker", "stopping due to cancellation during sleep");
                    break;
                }
            }
        }
        Ok(())
    }
}
