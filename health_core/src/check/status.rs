//! Check status and the output snapshot derived from it

use super::config::{CheckInfo, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The mutable part of a check. `ok` and `check_output` always change together.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckStatus {
    pub ok: bool,
    pub check_output: String,
    pub last_updated: DateTime<Utc>,
}

impl CheckStatus {
    pub fn initial() -> Self {
        Self {
            ok: true,
            check_output: String::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Immutable output record for one check, in the health check output schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSnapshot {
    pub id: String,
    pub name: String,
    pub ok: bool,
    pub severity: Severity,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    #[serde(with = "iso8601")]
    pub last_updated: DateTime<Utc>,
}

impl CheckSnapshot {
    pub fn new(info: &CheckInfo, status: &CheckStatus) -> Self {
        Self {
            id: info.id.clone(),
            name: info.name.clone(),
            ok: status.ok,
            severity: info.severity,
            business_impact: info.business_impact.clone(),
            technical_summary: info.technical_summary.clone(),
            panic_guide: info.panic_guide.clone(),
            check_output: status.check_output.clone(),
            last_updated: status.last_updated,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "ok": self.ok,
            "severity": u8::from(self.severity),
            "businessImpact": self.business_impact,
            "technicalSummary": self.technical_summary,
            "panicGuide": self.panic_guide,
            "checkOutput": self.check_output,
            "lastUpdated": iso8601::format(&self.last_updated),
        })
    }
}

/// Millisecond-precision UTC timestamps, e.g. `2024-03-01T09:30:00.000Z`.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
