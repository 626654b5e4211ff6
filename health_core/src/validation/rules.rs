//! Field-level rules shared by option validation and the output schema

use chrono::DateTime;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref CHECK_ID_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();

    static ref ISO_8601_REGEX: Regex = Regex::new(
        r"(?i)^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?(Z|[+-]\d{2}:\d{2})$"
    ).unwrap();
}

pub fn is_valid_check_id(id: &str) -> bool {
    CHECK_ID_REGEX.is_match(id)
}

pub fn is_non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_severity(severity: u64) -> bool {
    (1..=3).contains(&severity)
}

/// Strict `YYYY-MM-DDTHH:mm:ss[.SSS](Z|±HH:MM)` that also names a real instant.
pub fn is_iso_8601_timestamp(value: &str) -> bool {
    if !ISO_8601_REGEX.is_match(value) {
        return false;
    }
    DateTime::parse_from_rfc3339(value).is_ok()
}

pub fn validate_non_blank(value: &str) -> Result<(), ValidationError> {
    if is_non_blank(value) {
        Ok(())
    } else {
        Err(ValidationError::new("blank"))
    }
}
