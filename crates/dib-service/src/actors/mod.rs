mod traits;
pub use traits::RelayActor;

mod engine;
pub use engine::EngineActor;

mod metric;
pub use metric::MetricWorker;
