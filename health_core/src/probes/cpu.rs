//! CPU usage of the current process

use super::sampler::{sample, ResourceSampler, SystemSampler};
use super::threshold::{threshold_option, usage_outcome};
use crate::check::{Check, CheckConfig, Probe, ProbeOutcome};
use crate::error::{ProbeFailure, Result};
use crate::log::LogSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_CPU_THRESHOLD: f64 = 50.0;

/// Fails when process CPU usage goes above `threshold` percent.
///
/// The first reading always passes: usage spikes while a process boots.
pub struct CpuProbe {
    threshold: f64,
    sampler: Arc<dyn ResourceSampler>,
    has_run: AtomicBool,
}

impl CpuProbe {
    pub fn new(threshold: f64) -> Self {
        Self::with_sampler(threshold, Arc::new(SystemSampler::new()))
    }

    pub fn with_sampler(threshold: f64, sampler: Arc<dyn ResourceSampler>) -> Self {
        Self {
            threshold,
            sampler,
            has_run: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        Ok(Self::new(threshold_option(config, DEFAULT_CPU_THRESHOLD)?))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[async_trait::async_trait]
impl Probe for CpuProbe {
    fn type_name(&self) -> &str {
        "CpuCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        let first_run = !self.has_run.swap(true, Ordering::SeqCst);
        let used = sample(&self.sampler, |sampler| sampler.cpu_percent()).await?;

        let outcome = usage_outcome(used, self.threshold);
        if first_run {
            return Ok(ProbeOutcome::pass(outcome.output));
        }
        Ok(outcome)
    }
}

pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    Check::new(config, CpuProbe::from_config(config)?, log)
}
