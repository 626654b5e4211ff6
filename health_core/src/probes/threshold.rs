//! Percentage thresholds shared by the resource probes

use crate::check::{CheckConfig, ProbeOutcome};
use crate::error::{HealthError, Result};
use serde::Deserialize;
use validator::Validate;

const THRESHOLD_MESSAGE: &str = "Invalid option: threshold must be a number between 1 and 100";

#[derive(Debug, Deserialize, Validate)]
struct ThresholdOptions {
    #[serde(default)]
    #[validate(range(min = 1.0, max = 100.0, message = "Invalid option: threshold must be a number between 1 and 100"))]
    threshold: Option<f64>,
}

/// Reads the `threshold` option. Missing or zero means `default`.
pub(crate) fn threshold_option(config: &CheckConfig, default: f64) -> Result<f64> {
    let mut options: ThresholdOptions = config
        .parse_options("threshold")
        .map_err(|_| HealthError::configuration(THRESHOLD_MESSAGE))?;

    if options.threshold == Some(0.0) {
        options.threshold = None;
    }
    options.validate()?;

    Ok(options.threshold.unwrap_or(default))
}

/// `"<used>% used"`, rounded to two decimals.
pub(crate) fn usage_output(used: f64) -> String {
    format!("{}% used", (used * 100.0).round() / 100.0)
}

pub(crate) fn usage_outcome(used: f64, threshold: f64) -> ProbeOutcome {
    let output = usage_output(used);
    if used <= threshold {
        ProbeOutcome::pass(output)
    } else {
        ProbeOutcome::fail(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> CheckConfig {
        CheckConfig::new("cpu")
    }

    #[test]
    fn test_threshold_defaults() {
        assert_eq!(threshold_option(&config(), 50.0).unwrap(), 50.0);
        assert_eq!(
            threshold_option(&config().with_option("threshold", json!(0)), 75.0).unwrap(),
            75.0
        );
        assert_eq!(
            threshold_option(&config().with_option("threshold", json!(90)), 75.0).unwrap(),
            90.0
        );
    }

    #[test]
    fn test_threshold_out_of_range() {
        for value in [json!(101), json!(0.5), json!(-3), json!("50")] {
            let error = threshold_option(&config().with_option("threshold", value), 50.0).unwrap_err();
            assert_eq!(error.to_string(), THRESHOLD_MESSAGE);
        }
    }

    #[test]
    fn test_usage_outcome() {
        assert_eq!(usage_outcome(40.0, 50.0), ProbeOutcome::pass("40% used"));
        assert_eq!(usage_outcome(50.0, 50.0), ProbeOutcome::pass("50% used"));
        assert_eq!(usage_outcome(50.456, 50.0), ProbeOutcome::fail("50.46% used"));
    }
}
