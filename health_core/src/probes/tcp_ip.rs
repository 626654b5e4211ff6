//! TCP connectivity to a host and port

use crate::check::{Check, CheckConfig, Probe, ProbeOutcome};
use crate::error::{HealthError, ProbeFailure, Result};
use crate::log::LogSink;
use crate::validation::validate_non_blank;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use validator::Validate;

const INVALID_PORT: &str = "Invalid option: port must be a number between 1 and 65535";

#[derive(Debug, Deserialize, Validate)]
struct TcpIpOptions {
    #[serde(default)]
    #[validate(custom(function = "validate_non_blank", message = "Invalid option: host must be a non-empty string"))]
    host: String,
    #[serde(default)]
    #[validate(
        required(message = "Invalid option: port must be a number between 1 and 65535"),
        range(min = 1, max = 65535, message = "Invalid option: port must be a number between 1 and 65535")
    )]
    port: Option<u32>,
}

/// Passes when a TCP connection can be opened; the socket is shut down right after.
#[derive(Debug, Clone)]
pub struct TcpIpProbe {
    host: String,
    port: u16,
}

impl TcpIpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let options: TcpIpOptions = config.parse_options("tcp-ip").map_err(|_| {
            HealthError::configuration(
                "Invalid option: host must be a non-empty string and port a number between 1 and 65535",
            )
        })?;
        options.validate()?;

        let port = options
            .port
            .and_then(|port| u16::try_from(port).ok())
            .ok_or_else(|| HealthError::configuration(INVALID_PORT))?;
        Ok(Self::new(options.host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait::async_trait]
impl Probe for TcpIpProbe {
    fn type_name(&self) -> &str {
        "TcpIpCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        let mut stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        stream.shutdown().await?;
        Ok(ProbeOutcome::pass(""))
    }
}

pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    Check::new(config, TcpIpProbe::from_config(config)?, log)
}
