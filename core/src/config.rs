//! Client configuration: API base address, retry budget and holiday list.
//!
//! Loaded once at start. Sources, later overriding earlier:
//! 1. built-in defaults
//! 2. `config/hrms.toml` (optional)
//! 3. environment variables prefixed with `HRMS_`; `HRMS_HOLIDAYS` is a
//!    comma-separated list of `YYYY-MM-DD` dates

use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::calendar::{HolidaySet, DEFAULT_HOLIDAYS};
use crate::client::HrmsClient;
use crate::error::ApiError;
use crate::http::DEFAULT_RETRIES;
use crate::transport::{UreqTransport, DEFAULT_TIMEOUT_SECS};

pub const DEFAULT_CONFIG_PATH: &str = "config/hrms";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_holidays")]
    pub holidays: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            retries: default_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            holidays: default_holidays(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ApiError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from `path` (extension optional) plus `HRMS_*` environment variables.
    pub fn load_from(path: &str) -> Result<Self, ApiError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(env_source())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse a TOML document; environment variables are not consulted.
    pub fn from_toml_str(toml: &str) -> Result<Self, ApiError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn holiday_set(&self) -> Result<HolidaySet, ApiError> {
        HolidaySet::from_iso(&self.holidays)
    }

    pub fn client(&self) -> HrmsClient {
        HrmsClient::new(&self.base_url).with_retries(self.retries)
    }

    pub fn transport(&self) -> UreqTransport {
        UreqTransport::new(Duration::from_secs(self.request_timeout_secs))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("HRMS")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("holidays")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_holidays() -> Vec<String> {
    DEFAULT_HOLIDAYS.iter().map(|s| s.to_string()).collect()
}
