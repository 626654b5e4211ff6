//! Resident memory of the current process

use super::sampler::{sample, ResourceSampler, SystemSampler};
use super::threshold::{threshold_option, usage_outcome};
use crate::check::{Check, CheckConfig, Probe, ProbeOutcome};
use crate::error::{ProbeFailure, Result};
use crate::log::LogSink;
use std::sync::Arc;

pub const DEFAULT_MEMORY_THRESHOLD: f64 = 75.0;

pub struct MemoryProbe {
    threshold: f64,
    sampler: Arc<dyn ResourceSampler>,
}

impl MemoryProbe {
    pub fn new(threshold: f64) -> Self {
        Self::with_sampler(threshold, Arc::new(SystemSampler::new()))
    }

    pub fn with_sampler(threshold: f64, sampler: Arc<dyn ResourceSampler>) -> Self {
        Self { threshold, sampler }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        Ok(Self::new(threshold_option(config, DEFAULT_MEMORY_THRESHOLD)?))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[async_trait::async_trait]
impl Probe for MemoryProbe {
    fn type_name(&self) -> &str {
        "MemoryCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        let used = sample(&self.sampler, |sampler| sampler.memory_percent()).await?;
        Ok(usage_outcome(used, self.threshold))
    }
}

pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    Check::new(config, MemoryProbe::from_config(config)?, log)
}
