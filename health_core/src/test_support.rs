//! Probes and configs shared by the unit test suites

use crate::check::{CheckConfig, Probe, ProbeOutcome};
use crate::error::ProbeFailure;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn check_config(id: &str, severity: u8) -> CheckConfig {
    CheckConfig::new("mock")
        .with_id(id)
        .with_name(format!("mock {}", id))
        .with_severity(severity)
        .with_business_impact("mock business impact")
        .with_technical_summary("mock technical summary")
        .with_panic_guide("mock panic guide")
}

/// Remote control for [`SwitchProbe`]s.
#[derive(Clone, Default)]
pub(crate) struct ProbeSwitch {
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl ProbeSwitch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn pass(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn probe(&self) -> SwitchProbe {
        self.slow_probe(Duration::ZERO)
    }

    pub(crate) fn slow_probe(&self, delay: Duration) -> SwitchProbe {
        SwitchProbe {
            switch: self.clone(),
            delay,
        }
    }
}

pub(crate) struct SwitchProbe {
    switch: ProbeSwitch,
    delay: Duration,
}

#[async_trait::async_trait]
impl Probe for SwitchProbe {
    fn type_name(&self) -> &str {
        "MockCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        self.switch.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.switch.failing.load(Ordering::SeqCst) {
            Err(ProbeFailure::Other("mock failure".to_string()))
        } else {
            Ok(ProbeOutcome::pass("mock output"))
        }
    }
}
