//! Loading check descriptors from TOML, YAML or JSON files

use crate::check::CheckConfig;
use crate::error::{HealthError, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ChecksFile {
    #[serde(default)]
    checks: Vec<CheckConfig>,
}

/// Reads check descriptors from `path`. The format follows the extension:
/// `.toml` (`[[checks]]` tables), `.yaml`/`.yml` (a `checks:` list) or
/// `.json` (an array, or an object with a `checks` array).
pub fn load_check_configs(path: &Path) -> Result<Vec<CheckConfig>> {
    let contents = std::fs::read_to_string(path)?;
    let invalid = |e: String| {
        HealthError::configuration(format!("Invalid checks file {}: {}", path.display(), e))
    };

    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    let checks = match extension.as_deref() {
        Some("toml") => {
            toml::from_str::<ChecksFile>(&contents)
                .map_err(|e| invalid(e.to_string()))?
                .checks
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str::<ChecksFile>(&contents)
                .map_err(|e| invalid(e.to_string()))?
                .checks
        }
        Some("json") => {
            let value: Value = serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;
            if value.is_array() {
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?
            } else {
                serde_json::from_value::<ChecksFile>(value)
                    .map_err(|e| invalid(e.to_string()))?
                    .checks
            }
        }
        _ => {
            return Err(HealthError::configuration(format!(
                "Unsupported checks file {}: expected a .toml, .yaml, .yml or .json extension",
                path.display()
            )))
        }
    };

    info!("Loaded {} check descriptors from {}", checks.len(), path.display());
    Ok(checks)
}

fn resource_check(check_type: &str, id: &str, name: &str, threshold: u64, interval_ms: u64) -> CheckConfig {
    CheckConfig::new(check_type)
        .with_id(id)
        .with_name(name)
        .with_severity(2)
        .with_business_impact("Things may be slow")
        .with_technical_summary(format!("Fails when {} goes above {}%", name.to_lowercase(), threshold))
        .with_panic_guide("Check the host for runaway processes and restart the service if needed")
        .with_interval(std::time::Duration::from_millis(interval_ms))
        .with_option("threshold", json!(threshold))
}

/// Process CPU, memory and root disk space checks at severity 2.
pub fn default_checks() -> Vec<CheckConfig> {
    vec![
        resource_check("cpu", "system-cpu", "System CPU Usage", 50, 5_000),
        resource_check("memory", "system-memory", "System Memory Usage", 75, 15_000),
        resource_check("disk-space", "system-disk-space", "System Disk Space Usage", 75, 30_000)
            .with_option("path", json!("/")),
    ]
}
