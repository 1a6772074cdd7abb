//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIMBRIDGE_*` environment
//! variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::space::SpaceConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIMBRIDGE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Base URL of the hosted similarity Space.
    pub space_url: String,

    /// Named endpoint on the Space to invoke. Default: `/_on_click`.
    pub api_name: String,

    /// Per-call timeout for remote predictions, in seconds. Default: `30`.
    pub timeout_secs: u64,

    /// Additional retry attempts after the first failure. Default: `2`.
    pub max_retries: u32,

    /// Base backoff between retries, in seconds (scaled linearly by attempt
    /// number). Default: `1.5`.
    pub backoff_base_secs: f64,

    /// Maximum characters kept per text block after cleanup. Default: `20_000`.
    pub max_text_chars: usize,
}

/// Default Space URL used when `SIMBRIDGE_SPACE_URL` is not set.
pub const DEFAULT_SPACE_URL: &str = "https://rathod31-kannada-english-sim.hf.space";

/// Default named endpoint on the Space.
pub const DEFAULT_API_NAME: &str = "/_on_click";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            space_url: DEFAULT_SPACE_URL.to_string(),
            api_name: DEFAULT_API_NAME.to_string(),
            timeout_secs: 30,
            max_retries: 2,
            backoff_base_secs: 1.5,
            max_text_chars: 20_000,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SIMBRIDGE_PORT";
    const ENV_BIND_ADDR: &'static str = "SIMBRIDGE_BIND_ADDR";
    const ENV_SPACE_URL: &'static str = "SIMBRIDGE_SPACE_URL";
    const ENV_API_NAME: &'static str = "SIMBRIDGE_API_NAME";
    const ENV_TIMEOUT_SECS: &'static str = "SIMBRIDGE_TIMEOUT_SECS";
    const ENV_MAX_RETRIES: &'static str = "SIMBRIDGE_MAX_RETRIES";
    const ENV_BACKOFF_BASE_SECS: &'static str = "SIMBRIDGE_BACKOFF_BASE_SECS";
    const ENV_MAX_TEXT_CHARS: &'static str = "SIMBRIDGE_MAX_TEXT_CHARS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let space_url = Self::parse_string_from_env(Self::ENV_SPACE_URL, defaults.space_url);
        let api_name = Self::parse_string_from_env(Self::ENV_API_NAME, defaults.api_name);
        let timeout_secs = Self::parse_u64_from_env(Self::ENV_TIMEOUT_SECS, defaults.timeout_secs);
        let max_retries =
            Self::parse_u32_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries);
        let backoff_base_secs =
            Self::parse_f64_from_env(Self::ENV_BACKOFF_BASE_SECS, defaults.backoff_base_secs);
        let max_text_chars =
            Self::parse_usize_from_env(Self::ENV_MAX_TEXT_CHARS, defaults.max_text_chars);

        Ok(Self {
            port,
            bind_addr,
            space_url,
            api_name,
            timeout_secs,
            max_retries,
            backoff_base_secs,
            max_text_chars,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.space_url.starts_with("http://") && !self.space_url.starts_with("https://") {
            return Err(ConfigError::InvalidSpaceUrl {
                value: self.space_url.clone(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: self.timeout_secs.to_string(),
            });
        }

        if !self.backoff_base_secs.is_finite() || self.backoff_base_secs < 0.0 {
            return Err(ConfigError::InvalidBackoff {
                value: self.backoff_base_secs.to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Builds the remote-client configuration slice of this config.
    pub fn space_config(&self) -> SpaceConfig {
        SpaceConfig::new(&self.space_url)
            .api_name(&self.api_name)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff_base(Duration::from_secs_f64(self.backoff_base_secs))
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u32_from_env(var_name: &str, default: u32) -> u32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f64_from_env(var_name: &str, default: f64) -> f64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
