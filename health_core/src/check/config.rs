//! Check configuration: the raw input record and its validated form

use crate::error::{HealthError, Result};
use crate::validation::{is_non_blank, is_valid_check_id, is_valid_severity};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MS: u64 = 30_000;
pub const DEFAULT_SEVERITY: u8 = 1;

/// How bad it is when a check fails. Only `High` gates good-to-go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity as u8
    }
}

impl TryFrom<u8> for Severity {
    type Error = HealthError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Severity::High),
            2 => Ok(Severity::Medium),
            3 => Ok(Severity::Low),
            _ => Err(HealthError::configuration(
                "Invalid option: severity must be 1, 2, or 3",
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A check descriptor as it arrives from configuration.
///
/// Every key other than the common ones lands in `options` and is interpreted
/// by the probe the `type` discriminator resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub check_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panic_guide: Option<String>,
    /// Milliseconds between probe attempts; also the per-attempt timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl CheckConfig {
    pub fn new(check_type: impl Into<String>) -> Self {
        Self {
            check_type: Some(check_type.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_severity(mut self, severity: u8) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_business_impact(mut self, business_impact: impl Into<String>) -> Self {
        self.business_impact = Some(business_impact.into());
        self
    }

    pub fn with_technical_summary(mut self, technical_summary: impl Into<String>) -> Self {
        self.technical_summary = Some(technical_summary.into());
        self
    }

    pub fn with_panic_guide(mut self, panic_guide: impl Into<String>) -> Self {
        self.panic_guide = Some(panic_guide.into());
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval.as_millis() as u64);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn check_type(&self) -> Option<&str> {
        self.check_type.as_deref()
    }

    /// Deserializes the type-specific options into a probe's own option type.
    pub fn parse_options<T: DeserializeOwned>(&self, kind: &str) -> Result<T> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|e| {
            HealthError::configuration(format!("Invalid options for {} check: {}", kind, e))
        })
    }
}

/// The validated, immutable part of a check that ends up in its output.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInfo {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub interval: Duration,
}

impl CheckInfo {
    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let interval = config.interval.unwrap_or(DEFAULT_INTERVAL_MS);
        let severity = config.severity.unwrap_or(DEFAULT_SEVERITY);

        let business_impact = required("businessImpact", &config.business_impact)?;
        let id = required("id", &config.id)?;
        let name = required("name", &config.name)?;
        let panic_guide = required("panicGuide", &config.panic_guide)?;
        let technical_summary = required("technicalSummary", &config.technical_summary)?;

        if !is_non_blank(business_impact) {
            return Err(invalid("businessImpact must be a non-empty string"));
        }
        if !is_valid_check_id(id) {
            return Err(invalid("id must be lowercase and alphanumeric with hyphens"));
        }
        if !is_non_blank(name) {
            return Err(invalid("name must be a non-empty string"));
        }
        if !is_non_blank(panic_guide) {
            return Err(invalid("panicGuide must be a non-empty string"));
        }
        if !is_valid_severity(u64::from(severity)) {
            return Err(invalid("severity must be 1, 2, or 3"));
        }
        if !is_non_blank(technical_summary) {
            return Err(invalid("technicalSummary must be a non-empty string"));
        }
        if interval == 0 {
            return Err(invalid("interval must be a positive number of milliseconds"));
        }

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            severity: Severity::try_from(severity)?,
            business_impact: business_impact.to_string(),
            technical_summary: technical_summary.to_string(),
            panic_guide: panic_guide.to_string(),
            interval: Duration::from_millis(interval),
        })
    }
}

fn required<'a>(option: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| HealthError::configuration(format!("Missing required option: {}", option)))
}

fn invalid(message: &str) -> HealthError {
    HealthError::configuration(format!("Invalid option: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> CheckConfig {
        CheckConfig::new("mock-type")
            .with_id("mock-id")
            .with_name("mock name")
            .with_business_impact("mock business impact")
            .with_technical_summary("mock technical summary")
            .with_panic_guide("mock panic guide")
    }

    fn error_message(config: &CheckConfig) -> String {
        CheckInfo::from_config(config).unwrap_err().to_string()
    }

    #[test]
    fn test_defaults_applied() {
        let info = CheckInfo::from_config(&config()).unwrap();
        assert_eq!(info.severity, Severity::High);
        assert_eq!(info.interval, Duration::from_millis(DEFAULT_INTERVAL_MS));
        assert_eq!(info.id, "mock-id");
    }

    #[test]
    fn test_missing_options_reported_in_order() {
        let mut config = config();
        config.id = None;
        config.business_impact = None;
        assert_eq!(error_message(&config), "Missing required option: businessImpact");

        let mut config = self::config();
        config.technical_summary = None;
        assert_eq!(error_message(&config), "Missing required option: technicalSummary");
    }

    #[test]
    fn test_invalid_options() {
        assert_eq!(
            error_message(&config().with_id("Not Valid")),
            "Invalid option: id must be lowercase and alphanumeric with hyphens"
        );
        assert_eq!(
            error_message(&config().with_name("   ")),
            "Invalid option: name must be a non-empty string"
        );
        assert_eq!(
            error_message(&config().with_panic_guide("")),
            "Invalid option: panicGuide must be a non-empty string"
        );
        assert_eq!(
            error_message(&config().with_severity(4)),
            "Invalid option: severity must be 1, 2, or 3"
        );
        assert_eq!(
            error_message(&config().with_severity(0)),
            "Invalid option: severity must be 1, 2, or 3"
        );
        assert_eq!(
            error_message(&config().with_interval(Duration::ZERO)),
            "Invalid option: interval must be a positive number of milliseconds"
        );
    }

    #[test]
    fn test_deserialize_flattens_type_specific_options() {
        let config: CheckConfig = serde_json::from_value(json!({
            "type": "tcp-ip",
            "id": "database-port",
            "name": "Database port",
            "severity": 2,
            "businessImpact": "Nothing can be saved",
            "technicalSummary": "Connects to the database port",
            "panicGuide": "Restart the database",
            "interval": 5000,
            "host": "db.internal",
            "port": 5432
        }))
        .unwrap();

        assert_eq!(config.check_type(), Some("tcp-ip"));
        assert_eq!(config.interval, Some(5000));
        assert_eq!(config.options.get("host"), Some(&json!("db.internal")));
        assert_eq!(config.options.get("port"), Some(&json!(5432)));
        assert!(!config.options.contains_key("businessImpact"));

        let info = CheckInfo::from_config(&config).unwrap();
        assert_eq!(info.severity, Severity::Medium);
        assert_eq!(info.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_severity_serializes_as_number() {
        assert_eq!(serde_json::to_value(Severity::Low).unwrap(), json!(3));
        let severity: Severity = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(severity, Severity::Medium);
        assert!(serde_json::from_value::<Severity>(json!(7)).is_err());
    }
}
