//! Validation of health check output records

pub mod rules;

pub use rules::*;

use crate::error::{HealthError, Result};
use serde_json::Value;

const ALLOWED_PROPERTIES: [&str; 9] = [
    "id",
    "name",
    "ok",
    "severity",
    "businessImpact",
    "technicalSummary",
    "panicGuide",
    "checkOutput",
    "lastUpdated",
];

const REQUIRED_PROPERTIES: [&str; 6] = [
    "id",
    "name",
    "severity",
    "businessImpact",
    "technicalSummary",
    "panicGuide",
];

type PropertyRule = fn(&Value) -> bool;

const PROPERTY_RULES: [(&str, PropertyRule, &str); 9] = [
    ("id", is_id_value, "Health check id must be lowercase and alphanumeric with hyphens"),
    ("name", is_non_blank_value, "Health check name must be a non-empty string"),
    ("ok", Value::is_boolean, "Health check ok must be a boolean"),
    ("severity", is_severity_value, "Health check severity must be a number between 1 and 3"),
    ("businessImpact", is_non_blank_value, "Health check businessImpact must be a non-empty string"),
    ("technicalSummary", is_non_blank_value, "Health check technicalSummary must be a non-empty string"),
    ("panicGuide", is_non_blank_value, "Health check panicGuide must be a non-empty string"),
    ("checkOutput", Value::is_string, "Health check checkOutput must be a string"),
    ("lastUpdated", is_timestamp_value, "Health check lastUpdated must be a valid ISO 8601 date and time"),
];

/// Checks a record against the health check output schema.
///
/// Records must be JSON objects holding every required property, no property
/// outside the allowed set, and well-formed values for whatever is present.
/// The error names the first offending field.
pub fn validate_health_check(record: &Value) -> Result<()> {
    let record = record
        .as_object()
        .ok_or_else(|| HealthError::schema("Health check must be an object"))?;

    for property in REQUIRED_PROPERTIES {
        if !record.contains_key(property) {
            return Err(HealthError::schema(format!(
                "Missing required health check property: {}",
                property
            )));
        }
    }

    for property in record.keys() {
        if !ALLOWED_PROPERTIES.contains(&property.as_str()) {
            return Err(HealthError::schema(format!(
                "Health checks cannot have a \"{}\" property",
                property
            )));
        }
    }

    for (property, rule, message) in PROPERTY_RULES {
        if let Some(value) = record.get(property) {
            if !rule(value) {
                return Err(HealthError::schema(message));
            }
        }
    }

    Ok(())
}

fn is_non_blank_value(value: &Value) -> bool {
    value.as_str().map_or(false, is_non_blank)
}

fn is_id_value(value: &Value) -> bool {
    value.as_str().map_or(false, is_valid_check_id)
}

fn is_severity_value(value: &Value) -> bool {
    value.as_u64().map_or(false, is_valid_severity)
}

fn is_timestamp_value(value: &Value) -> bool {
    value.as_str().map_or(false, is_iso_8601_timestamp)
}
