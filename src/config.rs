use std::env;
use std::time::Duration;

use crate::core::{DashError, Result};

/// Public OWID COVID-19 table.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/owid/covid-19-data/master/public/data/owid-covid-data.csv";

/// Dashboard configuration
///
/// Defaults point at the public OWID table filtered to Europe. Every field can
/// be overridden through `COVIDLENS_*` environment variables (see
/// [`DashboardConfig::from_env`]) or the builder setters.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dataset location: an `http(s)://` URL or a local file path
    pub source: String,

    /// Continent tag rows must carry to be kept
    pub region: String,

    /// Replace missing case/death counters with zero while loading
    pub zero_fill: bool,

    /// Timeout for the one-shot dataset download
    pub fetch_timeout: Duration,

    /// HTTP listen host
    pub host: String,

    /// HTTP listen port
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            region: "Europe".to_string(),
            zero_fill: true,
            fetch_timeout: Duration::from_secs(120),
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl DashboardConfig {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from the environment, reading a `.env` file first
    /// when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(source) = env::var("COVIDLENS_SOURCE") {
            config.source = source;
        }
        if let Ok(region) = env::var("COVIDLENS_REGION") {
            config.region = region;
        }
        if let Ok(raw) = env::var("COVIDLENS_ZERO_FILL") {
            config.zero_fill = parse_bool("COVIDLENS_ZERO_FILL", &raw)?;
        }
        if let Ok(raw) = env::var("COVIDLENS_FETCH_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                DashError::InvalidParameter(format!(
                    "COVIDLENS_FETCH_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?;
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Ok(host) = env::var("COVIDLENS_HOST") {
            config.host = host;
        }
        if let Ok(raw) = env::var("COVIDLENS_PORT") {
            config.port = raw.parse::<u16>().map_err(|_| {
                DashError::InvalidParameter(format!(
                    "COVIDLENS_PORT must be a valid u16, got '{}'",
                    raw
                ))
            })?;
        }

        Ok(config)
    }

    /// Set the dataset location
    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    /// Set the region filter
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Enable or disable zero-filling of case/death counters
    pub fn zero_fill(mut self, enabled: bool) -> Self {
        self.zero_fill = enabled;
        self
    }

    /// Set the download timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the listen host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DashError::InvalidParameter(format!(
            "{} must be a boolean, got '{}'",
            name, raw
        ))),
    }
}
