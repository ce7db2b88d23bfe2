//! Runnable service layer: wires [`dib_core::engine::RelayEngine`] instances and a metrics
//! reporter into a single supervised process, without any CLI or config-file parsing of its own.

mod actors;
pub use actors::{EngineActor, MetricWorker, RelayActor};

mod service;
pub use service::RelayService;
