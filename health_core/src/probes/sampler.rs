//! Process and filesystem usage sampling

use crate::error::ProbeFailure;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use sysinfo::{Disks, Pid, System};

/// Source of resource usage readings, all as percentages in `0..=100`.
///
/// Implementations may block; probes call them through [`sample`].
pub trait ResourceSampler: Send + Sync + 'static {
    /// CPU used by this process, normalised by the number of logical CPUs.
    fn cpu_percent(&self) -> Result<f64, ProbeFailure>;

    /// Resident memory of this process relative to total system memory.
    fn memory_percent(&self) -> Result<f64, ProbeFailure>;

    /// Used space of the filesystem that holds `path`.
    fn disk_percent(&self, path: &Path) -> Result<f64, ProbeFailure>;
}

/// `sysinfo` backed sampler for the current process.
///
/// CPU usage is a delta between refreshes, so the first reading from a fresh
/// sampler is always 0.
pub struct SystemSampler {
    system: Mutex<System>,
    pid: Pid,
    cpu_count: usize,
}

impl SystemSampler {
    pub fn new() -> Self {
        let cpu_count = std::thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);

        Self {
            system: Mutex::new(System::new()),
            pid: Pid::from(std::process::id() as usize),
            cpu_count,
        }
    }

    fn process_reading<F>(&self, read: F) -> Result<f64, ProbeFailure>
    where
        F: FnOnce(&System, &sysinfo::Process) -> Result<f64, ProbeFailure>,
    {
        let mut system = self.system.lock();
        system.refresh_process(self.pid);
        let process = system
            .process(self.pid)
            .ok_or_else(|| ProbeFailure::Sampling(format!("No process found with id {}", self.pid)))?;
        read(&system, process)
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for SystemSampler {
    fn cpu_percent(&self) -> Result<f64, ProbeFailure> {
        let cpu_count = self.cpu_count as f64;
        self.process_reading(|_, process| Ok(f64::from(process.cpu_usage()) / cpu_count))
    }

    fn memory_percent(&self) -> Result<f64, ProbeFailure> {
        self.system.lock().refresh_memory();
        self.process_reading(|system, process| {
            let total = system.total_memory();
            if total == 0 {
                return Err(ProbeFailure::Sampling("Total memory is unknown".to_string()));
            }
            Ok(process.memory() as f64 / total as f64 * 100.0)
        })
    }

    fn disk_percent(&self, path: &Path) -> Result<f64, ProbeFailure> {
        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .ok_or_else(|| {
                ProbeFailure::Sampling(format!("No filesystem found for {}", path.display()))
            })?;

        let total = disk.total_space();
        if total == 0 {
            return Err(ProbeFailure::Sampling(format!(
                "Filesystem at {} reports no capacity",
                disk.mount_point().display()
            )));
        }
        let used = total.saturating_sub(disk.available_space());
        Ok(used as f64 / total as f64 * 100.0)
    }
}

/// Runs a blocking sampler call off the async worker threads.
pub(crate) async fn sample<F>(sampler: &Arc<dyn ResourceSampler>, read: F) -> Result<f64, ProbeFailure>
where
    F: FnOnce(&dyn ResourceSampler) -> Result<f64, ProbeFailure> + Send + 'static,
{
    let sampler = Arc::clone(sampler);
    tokio::task::spawn_blocking(move || read(sampler.as_ref()))
        .await
        .map_err(|e| ProbeFailure::Sampling(e.to_string()))?
}
