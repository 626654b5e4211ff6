use crate::check::{Check, CheckConfig, CheckSnapshot, Severity};
use crate::error::{HealthError, Result};
use crate::log::{default_log, LogSink};
use crate::registry::{builtin_registry, CheckRegistry};
use futures_util::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Zero-argument accessor yielding the current snapshots.
pub type ChecksFn = Arc<dyn Fn() -> BoxFuture<'static, Vec<CheckSnapshot>> + Send + Sync>;

/// Zero-argument accessor yielding the aggregate good-to-go flag.
pub type GoodToGoFn = Arc<dyn Fn() -> BoxFuture<'static, bool> + Send + Sync>;

/// One entry of a check set: either a descriptor to resolve through the
/// registry, or a check somebody already built.
#[derive(Debug, Clone)]
pub enum CheckEntry {
    Config(CheckConfig),
    Built(Check),
}

impl From<CheckConfig> for CheckEntry {
    fn from(config: CheckConfig) -> Self {
        CheckEntry::Config(config)
    }
}

impl From<Check> for CheckEntry {
    fn from(check: Check) -> Self {
        CheckEntry::Built(check)
    }
}

pub struct HealthCheckOptions {
    pub checks: Vec<CheckEntry>,
    pub log: Arc<dyn LogSink>,
}

impl HealthCheckOptions {
    pub fn new(checks: impl IntoIterator<Item = impl Into<CheckEntry>>) -> Self {
        Self {
            checks: checks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }
}

impl Default for HealthCheckOptions {
    fn default() -> Self {
        Self {
            checks: Vec::new(),
            log: default_log(),
        }
    }
}

/// An ordered set of running checks and the views over them.
#[derive(Clone)]
pub struct HealthCheck {
    checks: Arc<Vec<Check>>,
    log: Arc<dyn LogSink>,
}

impl HealthCheck {
    /// Builds every check, resolving descriptors against the built-in types.
    pub fn new(options: HealthCheckOptions) -> Result<Self> {
        Self::with_registry(options, builtin_registry())
    }

    /// Builds every check, resolving descriptors against `registry`.
    ///
    /// If any entry fails, checks created by this call are stopped again
    /// before the error is returned. Adopted checks are left running.
    pub fn with_registry(options: HealthCheckOptions, registry: &CheckRegistry) -> Result<Self> {
        let HealthCheckOptions { checks: entries, log } = options;
        let mut checks = Vec::with_capacity(entries.len());
        let mut created = Vec::new();

        for entry in entries {
            match build_entry(entry, registry, &log) {
                Ok((check, owned)) => {
                    if owned {
                        created.push(check.clone());
                    }
                    checks.push(check);
                }
                Err(error) => {
                    for check in created.iter().filter(|check| check.is_scheduled()) {
                        let _ = check.stop();
                    }
                    return Err(error);
                }
            }
        }

        log.info(&format!("Health check set created with {} checks", checks.len()));
        Ok(Self {
            checks: Arc::new(checks),
            log,
        })
    }

    /// Stops every check that is still scheduled.
    pub fn stop(&self) {
        let mut stopped = 0;
        for check in self.checks.iter().filter(|check| check.is_scheduled()) {
            match check.stop() {
                Ok(()) => stopped += 1,
                Err(error) => debug!(check = %check.id(), "{}", error),
            }
        }
        if stopped > 0 {
            self.log.info(&format!("Stopped {} health checks", stopped));
        }
    }

    pub fn checks(&self) -> ChecksFn {
        let checks = Arc::clone(&self.checks);
        Arc::new(move || {
            let checks = Arc::clone(&checks);
            async move { snapshots(&checks) }.boxed()
        })
    }

    pub fn good_to_go(&self) -> GoodToGoFn {
        let checks = Arc::clone(&self.checks);
        Arc::new(move || {
            let checks = Arc::clone(&checks);
            async move { is_good_to_go(&snapshots(&checks)) }.boxed()
        })
    }

    pub fn to_json(&self) -> Vec<CheckSnapshot> {
        snapshots(&self.checks)
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn find(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|check| check.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

fn build_entry(
    entry: CheckEntry,
    registry: &CheckRegistry,
    log: &Arc<dyn LogSink>,
) -> Result<(Check, bool)> {
    match entry {
        CheckEntry::Built(check) => {
            check.set_log(Arc::clone(log));
            Ok((check, false))
        }
        CheckEntry::Config(config) => {
            let check_type = config
                .check_type()
                .ok_or_else(|| HealthError::configuration("Missing required option: type"))?;
            let factory = registry.resolve(check_type).ok_or_else(|| {
                HealthError::configuration(format!("Invalid check type: {}", check_type))
            })?;
            Ok((factory(&config, Arc::clone(log))?, true))
        }
    }
}

fn snapshots(checks: &[Check]) -> Vec<CheckSnapshot> {
    checks.iter().map(Check::to_snapshot).collect()
}

/// True unless some severity 1 check is failing.
pub fn is_good_to_go(snapshots: &[CheckSnapshot]) -> bool {
    snapshots
        .iter()
        .filter(|snapshot| snapshot.severity == Severity::High)
        .all(|snapshot| snapshot.ok)
}

impl fmt::Display for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HealthCheck {{")?;
        for check in self.checks.iter() {
            writeln!(f, "  {}", check)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthCheck")
            .field("checks", &self.checks)
            .finish()
    }
}
