//! Metric name constants for the relay engine, plus the describe/zero bookkeeping the
//! `metrics` crate's exporters expect at startup.

/// Container for [`crate::engine::RelayEngine`] metric names.
#[derive(Debug, Clone)]
pub(crate) struct Metrics;

impl Metrics {
    pub(crate) const ENGINE_CALLS_SUCCESS_TOTAL: &'static str = "dib_engine_calls_success_total";
    pub(crate) const ENGINE_CALLS_ERROR_TOTAL: &'static str = "dib_engine_calls_error_total";
    pub(crate) const ENGINE_CALL_DURATION_SECONDS: &'static str = "dib_engine_call_duration_seconds";
    pub(crate) const REGISTER_SIZE: &'static str = "dib_register_size";

    pub(crate) const METHOD_EXECUTE: &'static str = "execute";
    pub(crate) const METHOD_CONFIRM: &'static str = "confirm";
    pub(crate) const METHOD_PROCESS_TIMEOUT: &'static str = "process_timeout";
    pub(crate) const METHOD_VERIFY: &'static str = "verify";

    pub(crate) fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::ENGINE_CALLS_SUCCESS_TOTAL,
            metrics::Unit::Count,
            "Total number of successful relay engine phase operations"
        );
        metrics::describe_counter!(
            Self::ENGINE_CALLS_ERROR_TOTAL,
            metrics::Unit::Count,
            "Total number of failed relay engine phase operations"
        );
        metrics::describe_histogram!(
            Self::ENGINE_CALL_DURATION_SECONDS,
            metrics::Unit::Seconds,
            "Duration of relay engine phase operations"
        );
        metrics::describe_gauge!(
            Self::REGISTER_SIZE,
            metrics::Unit::Count,
            "Number of transfers currently held in the transfer register"
        );
    }

    fn zero_method(method_name: &'static str) {
        metrics::counter!(Self::ENGINE_CALLS_SUCCESS_TOTAL, "method" => method_name).increment(0);
        metrics::counter!(Self::ENGINE_CALLS_ERROR_TOTAL, "method" => method_name).increment(0);
        metrics::histogram!(Self::ENGINE_CALL_DURATION_SECONDS, "method" => method_name).record(0.0);
    }

    fn zero() {
        Self::zero_method(Self::METHOD_EXECUTE);
        Self::zero_method(Self::METHOD_CONFIRM);
        Self::zero_method(Self::METHOD_PROCESS_TIMEOUT);
        Self::zero_method(Self::METHOD_VERIFY);
    }
}
