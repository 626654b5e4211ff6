//! The pluggable side of a check: one probe attempt at a time

use crate::error::ProbeFailure;

/// What a completed probe attempt reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub output: String,
}

impl ProbeOutcome {
    pub fn pass(output: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: output.into(),
        }
    }

    pub fn fail(output: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: output.into(),
        }
    }
}

/// A concrete health probe. `Check` owns scheduling, timeouts, status and
/// logging; a probe only has to perform one attempt.
#[async_trait::async_trait]
pub trait Probe: Send + Sync + 'static {
    /// Short type name used in diagnostics, e.g. `CpuCheck`.
    fn type_name(&self) -> &str;

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure>;
}

/// Probe backed by a plain closure. `Ok(message)` passes with that output.
pub struct FnProbe {
    type_name: String,
    check_fn: Box<dyn Fn() -> Result<String, ProbeFailure> + Send + Sync>,
}

impl FnProbe {
    pub fn new<F>(type_name: impl Into<String>, check_fn: F) -> Self
    where
        F: Fn() -> Result<String, ProbeFailure> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            check_fn: Box::new(check_fn),
        }
    }
}

#[async_trait::async_trait]
impl Probe for FnProbe {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        (self.check_fn)().map(ProbeOutcome::pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_probe_success() {
        let probe = FnProbe::new("ServiceCheck", || Ok("Service is running".to_string()));
        assert_eq!(probe.type_name(), "ServiceCheck");
        assert_eq!(probe.run().await.unwrap(), ProbeOutcome::pass("Service is running"));
    }

    #[tokio::test]
    async fn test_fn_probe_failure() {
        let probe = FnProbe::new("ServiceCheck", || {
            Err(ProbeFailure::Other("Random failure".to_string()))
        });
        let failure = probe.run().await.unwrap_err();
        assert_eq!(failure.to_string(), "Random failure");
    }
}
