//! Check type registry: `type` discriminator to check factory

use crate::check::{Check, CheckConfig};
use crate::error::Result;
use crate::log::LogSink;
use crate::probes::{cpu, disk_space, graphite_threshold, memory, ping_url, tcp_ip};
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Builds a running check from its configuration.
pub type CheckFactory = Arc<dyn Fn(&CheckConfig, Arc<dyn LogSink>) -> Result<Check> + Send + Sync>;

lazy_static! {
    static ref BUILTIN_CHECKS: CheckRegistry = CheckRegistry::builtin();
}

/// The process-wide registry of built-in check types.
pub fn builtin_registry() -> &'static CheckRegistry {
    &BUILTIN_CHECKS
}

#[derive(Clone, Default)]
pub struct CheckRegistry {
    factories: BTreeMap<String, CheckFactory>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("cpu", cpu::build);
        registry.register("disk-space", disk_space::build);
        registry.register("graphite-threshold", graphite_threshold::build);
        registry.register("memory", memory::build);
        registry.register("ping-url", ping_url::build);
        registry.register("tcp-ip", tcp_ip::build);
        registry
    }

    /// Adds or replaces the factory for `check_type`.
    pub fn register<F>(&mut self, check_type: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&CheckConfig, Arc<dyn LogSink>) -> Result<Check> + Send + Sync + 'static,
    {
        self.factories.insert(check_type.into(), Arc::new(factory));
        self
    }

    pub fn resolve(&self, check_type: &str) -> Option<&CheckFactory> {
        self.factories.get(check_type)
    }

    pub fn contains(&self, check_type: &str) -> bool {
        self.factories.contains_key(check_type)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("types", &self.types().collect::<Vec<_>>())
            .finish()
    }
}
