//! Built-in probes

pub mod cpu;
pub mod disk_space;
pub mod graphite_threshold;
pub mod memory;
pub mod ping_url;
pub mod sampler;
pub mod tcp_ip;
mod threshold;

pub use cpu::CpuProbe;
pub use disk_space::DiskSpaceProbe;
pub use graphite_threshold::{Direction, GraphiteThresholdProbe};
pub use memory::MemoryProbe;
pub use ping_url::{PingUrlProbe, UrlSource};
pub use sampler::{ResourceSampler, SystemSampler};
pub use tcp_ip::TcpIpProbe;
