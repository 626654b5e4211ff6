//! Error types for check construction, scheduling, schema validation and probing

use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T, E = HealthError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Lifecycle(String),

    #[error("{0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HealthError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HealthError::Configuration(message.into())
    }

    pub fn lifecycle(message: impl Into<String>) -> Self {
        HealthError::Lifecycle(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        HealthError::Schema(message.into())
    }
}

impl From<ValidationErrors> for HealthError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, Vec<String>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let messages = field_errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid option: {}", field),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, messages)| messages)
            .collect::<Vec<_>>()
            .join("; ");

        HealthError::Configuration(message)
    }
}

/// A failed probe attempt. Never surfaces to callers of `Check::run`; it is
/// folded into the check status instead.
#[derive(Error, Debug)]
pub enum ProbeFailure {
    #[error("timed out")]
    TimedOut,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Sampling(String),

    #[error("{0}")]
    Other(String),
}
