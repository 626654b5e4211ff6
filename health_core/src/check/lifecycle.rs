//! A single scheduled check: validated info, a probe, a status and a timer

use super::config::{CheckConfig, CheckInfo};
use super::probe::{Probe, ProbeOutcome};
use super::status::{iso8601, CheckSnapshot, CheckStatus};
use crate::error::{HealthError, ProbeFailure, Result};
use crate::log::LogSink;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// One independently scheduled health check.
///
/// Cloning yields another handle to the same check: status, schedule and log
/// sink are shared. A check starts running as soon as it is built and keeps
/// running until [`Check::stop`] is called; dropping handles does not stop it.
#[derive(Clone)]
pub struct Check {
    info: Arc<CheckInfo>,
    probe: Arc<dyn Probe>,
    status: Arc<RwLock<CheckStatus>>,
    log: Arc<RwLock<Arc<dyn LogSink>>>,
    schedule: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Check {
    /// Validates `config`, then schedules the probe: one attempt fires right
    /// away and another every `interval` after that.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<P: Probe>(config: &CheckConfig, probe: P, log: Arc<dyn LogSink>) -> Result<Self> {
        Self::with_shared_probe(config, Arc::new(probe), log)
    }

    pub fn with_shared_probe(
        config: &CheckConfig,
        probe: Arc<dyn Probe>,
        log: Arc<dyn LogSink>,
    ) -> Result<Self> {
        let info = CheckInfo::from_config(config)?;

        let check = Self {
            info: Arc::new(info),
            probe,
            status: Arc::new(RwLock::new(CheckStatus::initial())),
            log: Arc::new(RwLock::new(log)),
            schedule: Arc::new(Mutex::new(None)),
        };
        check.start()?;

        Ok(check)
    }

    pub fn info(&self) -> &CheckInfo {
        &self.info
    }

    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn type_name(&self) -> &str {
        self.probe.type_name()
    }

    pub fn status(&self) -> CheckStatus {
        self.status.read().clone()
    }

    pub fn log(&self) -> Arc<dyn LogSink> {
        self.log.read().clone()
    }

    pub fn set_log(&self, log: Arc<dyn LogSink>) {
        *self.log.write() = log;
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.lock().is_some()
    }

    pub fn start(&self) -> Result<()> {
        let mut schedule = self.schedule.lock();
        if schedule.is_some() {
            return Err(HealthError::lifecycle("The check has already been started"));
        }

        let runtime = Handle::try_current().map_err(|_| {
            HealthError::lifecycle("A Tokio runtime is required to schedule a check")
        })?;

        let first = self.clone();
        runtime.spawn(async move { first.run().await });

        let period = self.info.interval;
        let check = self.clone();
        *schedule = Some(runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Attempts may overlap; the last one to finish wins
                let attempt = check.clone();
                tokio::spawn(async move { attempt.run().await });
            }
        }));

        debug!(
            check = %self.info.id,
            interval_ms = period.as_millis() as u64,
            "health check scheduled"
        );
        Ok(())
    }

    /// Disarms the timer. Attempts already in flight still complete and update
    /// the status.
    pub fn stop(&self) -> Result<()> {
        let handle = self
            .schedule
            .lock()
            .take()
            .ok_or_else(|| HealthError::lifecycle("The check has not been started"))?;
        handle.abort();

        debug!(check = %self.info.id, "health check stopped");
        Ok(())
    }

    /// Performs one probe attempt bounded by the check interval and records
    /// the result. Never fails: probe errors become a failing status and an
    /// error-level log line.
    pub async fn run(&self) {
        let outcome = match time::timeout(self.info.interval, self.probe.run()).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(failure)) => ProbeOutcome::fail(failure.to_string()),
            Err(_) => ProbeOutcome::fail(ProbeFailure::TimedOut.to_string()),
        };

        if !outcome.ok {
            self.log().error(&format!(
                "Health check \"{}\" failed: {}",
                self.info.name, outcome.output
            ));
        }

        self.record(outcome);
    }

    fn record(&self, outcome: ProbeOutcome) {
        let mut status = self.status.write();
        let now = Utc::now();
        if now > status.last_updated {
            status.last_updated = now;
        }
        status.ok = outcome.ok;
        status.check_output = outcome.output;
    }

    pub fn to_snapshot(&self) -> CheckSnapshot {
        CheckSnapshot::new(&self.info, &self.status.read())
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status.read();
        write!(
            f,
            "{} [{}] {} (updated {})",
            self.probe.type_name(),
            if status.ok { "OK" } else { "NOT OK" },
            self.info.name,
            iso8601::format(&status.last_updated)
        )
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("type", &self.probe.type_name())
            .field("info", &self.info)
            .field("status", &*self.status.read())
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}
