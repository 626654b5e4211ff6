//! Graphite metric compared against a threshold

use super::ping_url::parse_method;
use crate::check::{Check, CheckConfig, CheckInfo, Probe, ProbeOutcome};
use crate::error::{HealthError, ProbeFailure, Result};
use crate::log::LogSink;
use crate::validation::is_non_blank;
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub const MALFORMED_RESPONSE: &str = "Please check that the URL is in the correct format, as it is not returning properly formatted JSON for this healthcheck.";

/// Which side of the threshold is unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Fails when the reading goes above the threshold.
    Above,
    /// Fails when the reading drops below the threshold.
    Below,
}

impl Direction {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value {
            Some("above") => Ok(Direction::Above),
            Some("below") => Ok(Direction::Below),
            _ => Err(HealthError::configuration(
                "You must set whether you want to check \"above\" or \"below\" a threshold.",
            )),
        }
    }

    pub fn is_breached(self, reading: f64, threshold: f64) -> bool {
        match self {
            Direction::Above => reading > threshold,
            Direction::Below => reading < threshold,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Above => write!(f, "above"),
            Direction::Below => write!(f, "below"),
        }
    }
}

#[derive(Debug)]
pub struct GraphiteThresholdProbe {
    client: Client,
    url: String,
    method: Method,
    threshold: f64,
    direction: Direction,
    graphite_key: String,
}

impl GraphiteThresholdProbe {
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let option = |key: &str| config.options.get(key);

        let url = option("url")
            .and_then(Value::as_str)
            .filter(|url| is_non_blank(url))
            .ok_or_else(|| HealthError::configuration("Invalid option: url must be a non-empty string"))?;

        let threshold = option("threshold")
            .and_then(Value::as_f64)
            .ok_or_else(|| HealthError::configuration("You must set a numerical threshold"))?;

        let graphite_key = option("graphiteKey")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                HealthError::configuration(
                    "You must set up your Graphite key in your environment variables.",
                )
            })?;

        let direction = Direction::parse(option("direction").and_then(Value::as_str))?;

        let method = match option("method").and_then(Value::as_str) {
            Some(method) => parse_method(method)?,
            None => Method::GET,
        };

        let client = Client::builder()
            .build()
            .map_err(|e| HealthError::configuration(format!("Unable to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            method,
            threshold,
            direction,
            graphite_key: graphite_key.to_string(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// The first datapoint of the first series: `body[0].datapoints[0][0]`.
pub fn current_reading(body: &str) -> Result<f64, ProbeFailure> {
    let malformed = || ProbeFailure::MalformedResponse(MALFORMED_RESPONSE.to_string());
    let body: Value = serde_json::from_str(body).map_err(|_| malformed())?;

    body.get(0)
        .and_then(|series| series.get("datapoints"))
        .and_then(|datapoints| datapoints.get(0))
        .and_then(|datapoint| datapoint.get(0))
        .and_then(Value::as_f64)
        .ok_or_else(malformed)
}

#[async_trait::async_trait]
impl Probe for GraphiteThresholdProbe {
    fn type_name(&self) -> &str {
        "GraphiteThresholdCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        let body = self
            .client
            .request(self.method.clone(), &self.url)
            .header("key", &self.graphite_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let reading = current_reading(&body)?;
        if self.direction.is_breached(reading, self.threshold) {
            return Ok(ProbeOutcome::fail(format!(
                "Current reading {} is {} the threshold of {}",
                reading, self.direction, self.threshold
            )));
        }
        Ok(ProbeOutcome::pass(""))
    }
}

/// Common options are checked before the Graphite ones.
pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    CheckInfo::from_config(config)?;
    Check::new(config, GraphiteThresholdProbe::from_config(config)?, log)
}
