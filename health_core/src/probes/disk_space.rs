//! Used space on the filesystem holding a path

use super::sampler::{sample, ResourceSampler, SystemSampler};
use super::threshold::{threshold_option, usage_outcome};
use crate::check::{Check, CheckConfig, Probe, ProbeOutcome};
use crate::error::{HealthError, ProbeFailure, Result};
use crate::log::LogSink;
use crate::validation::is_non_blank;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_DISK_THRESHOLD: f64 = 75.0;
pub const DEFAULT_DISK_PATH: &str = "/";

pub struct DiskSpaceProbe {
    threshold: f64,
    path: PathBuf,
    sampler: Arc<dyn ResourceSampler>,
}

impl DiskSpaceProbe {
    pub fn new(threshold: f64, path: impl Into<PathBuf>) -> Self {
        Self::with_sampler(threshold, path, Arc::new(SystemSampler::new()))
    }

    pub fn with_sampler(
        threshold: f64,
        path: impl Into<PathBuf>,
        sampler: Arc<dyn ResourceSampler>,
    ) -> Self {
        Self {
            threshold,
            path: path.into(),
            sampler,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let threshold = threshold_option(config, DEFAULT_DISK_THRESHOLD)?;
        let path = match config.options.get("path") {
            None | Some(Value::Null) => DEFAULT_DISK_PATH,
            Some(Value::String(path)) if is_non_blank(path) => path.as_str(),
            Some(_) => {
                return Err(HealthError::configuration(
                    "Invalid option: path must be a non-empty string",
                ))
            }
        };

        Ok(Self::new(threshold, path))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Probe for DiskSpaceProbe {
    fn type_name(&self) -> &str {
        "DiskSpaceCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        let path = self.path.clone();
        let used = sample(&self.sampler, move |sampler| sampler.disk_percent(&path)).await?;
        Ok(usage_outcome(used, self.threshold))
    }
}

pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    Check::new(config, DiskSpaceProbe::from_config(config)?, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::sampler::scripted::ScriptedSampler;
    use serde_json::json;

    #[tokio::test]
    async fn test_disk_usage_against_threshold() {
        let sampler = Arc::new(ScriptedSampler::new(&[60.0, 75.01]));
        let probe = DiskSpaceProbe::with_sampler(75.0, "/", sampler);

        assert_eq!(probe.run().await.unwrap(), ProbeOutcome::pass("60% used"));
        assert_eq!(probe.run().await.unwrap(), ProbeOutcome::fail("75.01% used"));
    }

    #[test]
    fn test_options_from_config() {
        let probe = DiskSpaceProbe::from_config(&CheckConfig::new("disk-space")).unwrap();
        assert_eq!(probe.threshold(), DEFAULT_DISK_THRESHOLD);
        assert_eq!(probe.path(), std::path::Path::new("/"));

        let config = CheckConfig::new("disk-space")
            .with_option("threshold", json!(90))
            .with_option("path", json!("/var/lib"));
        let probe = DiskSpaceProbe::from_config(&config).unwrap();
        assert_eq!(probe.threshold(), 90.0);
        assert_eq!(probe.path(), std::path::Path::new("/var/lib"));

        let config = CheckConfig::new("disk-space").with_option("path", json!(" "));
        assert_eq!(
            DiskSpaceProbe::from_config(&config).err().unwrap().to_string(),
            "Invalid option: path must be a non-empty string"
        );
    }
}
