//! Single health checks: configuration, lifecycle and output

pub mod config;
pub mod lifecycle;
pub mod probe;
pub mod status;

#[cfg(test)]
mod tests;

pub use config::{CheckConfig, CheckInfo, Severity, DEFAULT_INTERVAL_MS, DEFAULT_SEVERITY};
pub use lifecycle::Check;
pub use probe::{FnProbe, Probe, ProbeOutcome};
pub use status::{CheckSnapshot, CheckStatus};
