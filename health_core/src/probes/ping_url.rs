//! HTTP reachability of a URL

use crate::check::{Check, CheckConfig, Probe, ProbeOutcome};
use crate::error::{HealthError, ProbeFailure, Result};
use crate::log::LogSink;
use crate::validation::is_non_blank;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const URL_MESSAGE: &str = "Invalid option: url must be a non-empty string or a function";

/// Where a ping goes. `Dynamic` is evaluated on every attempt.
#[derive(Clone)]
pub enum UrlSource {
    Fixed(String),
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl UrlSource {
    pub fn dynamic<F>(url_fn: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        UrlSource::Dynamic(Arc::new(url_fn))
    }

    pub fn resolve(&self) -> String {
        match self {
            UrlSource::Fixed(url) => url.clone(),
            UrlSource::Dynamic(url_fn) => url_fn(),
        }
    }
}

impl From<&str> for UrlSource {
    fn from(url: &str) -> Self {
        UrlSource::Fixed(url.to_string())
    }
}

impl From<String> for UrlSource {
    fn from(url: String) -> Self {
        UrlSource::Fixed(url)
    }
}

impl fmt::Debug for UrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlSource::Fixed(url) => f.debug_tuple("Fixed").field(url).finish(),
            UrlSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PingUrlOptions {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
}

/// Passes on any 2xx response. The request method defaults to `HEAD`.
#[derive(Debug)]
pub struct PingUrlProbe {
    client: Client,
    url: UrlSource,
    method: Method,
    headers: HeaderMap,
}

impl PingUrlProbe {
    pub fn new(url: impl Into<UrlSource>) -> Result<Self> {
        let url = url.into();
        if let UrlSource::Fixed(fixed) = &url {
            if !is_non_blank(fixed) {
                return Err(HealthError::configuration(URL_MESSAGE));
            }
        }

        let client = Client::builder()
            .build()
            .map_err(|e| HealthError::configuration(format!("Unable to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            method: Method::HEAD,
            headers: HeaderMap::new(),
        })
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn from_config(config: &CheckConfig) -> Result<Self> {
        let options: PingUrlOptions = config.parse_options("ping-url")?;
        let url = options
            .url
            .ok_or_else(|| HealthError::configuration(URL_MESSAGE))?;

        let mut probe = Self::new(url)?;
        if let Some(method) = options.method {
            probe = probe.with_method(parse_method(&method)?);
        }
        if let Some(headers) = options.headers {
            probe = probe.with_headers(parse_headers(&headers)?);
        }
        Ok(probe)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

pub(crate) fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_uppercase().as_bytes()).map_err(|_| {
        HealthError::configuration(format!("Invalid option: method {} is not a valid HTTP method", method))
    })
}

fn parse_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid =
            || HealthError::configuration(format!("Invalid option: header {} is not valid", name));
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait::async_trait]
impl Probe for PingUrlProbe {
    fn type_name(&self) -> &str {
        "PingUrlCheck"
    }

    async fn run(&self) -> Result<ProbeOutcome, ProbeFailure> {
        self.client
            .request(self.method.clone(), self.url.resolve())
            .headers(self.headers.clone())
            .send()
            .await?
            .error_for_status()?;

        Ok(ProbeOutcome::pass(""))
    }
}

pub fn build(config: &CheckConfig, log: Arc<dyn LogSink>) -> Result<Check> {
    Check::new(config, PingUrlProbe::from_config(config)?, log)
}
