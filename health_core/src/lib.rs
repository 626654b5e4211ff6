//! Scheduled health checks, the aggregator over them and the output schema
//! they are validated against.

pub mod check;
pub mod config;
pub mod error;
pub mod health;
pub mod log;
pub mod probes;
pub mod registry;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use check::{Check, CheckConfig, CheckInfo, CheckSnapshot, CheckStatus, FnProbe, Probe, ProbeOutcome, Severity};
pub use config::{default_checks, load_check_configs, AppConfig};
pub use error::{HealthError, ProbeFailure, Result};
pub use health::{CheckEntry, ChecksFn, GoodToGoFn, HealthCheck, HealthCheckOptions};
pub use log::{default_log, LogSink, MemoryLog, TracingLog};
pub use registry::{builtin_registry, CheckFactory, CheckRegistry};
pub use validation::validate_health_check;
