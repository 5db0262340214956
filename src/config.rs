use anyhow::{anyhow, Result};
use serde_derive::Deserialize;
use std::str::FromStr;

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    // traces topology and zero-suppression decisions and exports raw documents
    #[serde(default)]
    pub debug_mode: bool,
}

impl AppConfig {
    pub fn log_level(&self) -> tracing::Level {
        tracing::Level::from_str(self.log_level.as_str()).unwrap_or(tracing::Level::INFO)
    }
}

pub(crate) fn load_app_config() -> Result<AppConfig> {
    match envy::from_env::<AppConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load AppConfig: {}", err)),
    }
}

/// One configured GivTCP instance. Its position in `GIVTCP_HOSTS` is its sort order.
#[derive(Debug, Clone, PartialEq)]
pub struct GivTcpHost {
    pub name: String,
    pub port: u16,
    pub sort_order: usize,
}

#[derive(Deserialize, Debug)]
pub struct GivTcpConfig {
    pub base_url: String,
    // comma-separated `name=port` entries
    pub hosts: Vec<String>,
}

impl GivTcpConfig {
    pub fn hosts(&self) -> Result<Vec<GivTcpHost>, ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::missing("GIVTCP_HOSTS"));
        }

        self.hosts
            .iter()
            .enumerate()
            .map(|(sort_order, entry)| parse_host(entry, sort_order))
            .collect()
    }
}

fn parse_host(entry: &str, sort_order: usize) -> Result<GivTcpHost, ConfigError> {
    let (name, port) = entry
        .rsplit_once('=')
        .ok_or_else(|| ConfigError::invalid("GIVTCP_HOSTS", format!("'{}' is not name=port", entry)))?;

    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::invalid("GIVTCP_HOSTS", format!("bad port in '{}': {}", entry, e)))?;

    Ok(GivTcpHost {
        name: name.trim().to_string(),
        port,
        sort_order,
    })
}

pub(crate) fn load_givtcp_config() -> Result<GivTcpConfig> {
    match envy::prefixed("GIVTCP_").from_env::<GivTcpConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load GivTcpConfig: {}", err)),
    }
}

/// Tariff rates used to turn energy totals into income.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TariffConfig {
    pub solar_rate: f64,
    pub export_rate: f64,
}

pub fn load_tariff_config() -> Result<TariffConfig> {
    match envy::prefixed("TARIFF_").from_env::<TariffConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load TariffConfig: {}", err)),
    }
}

fn default_interval_sec() -> u64 {
    8
}

fn default_fetch_timeout_sec() -> u64 {
    30
}

fn default_sample_dir() -> String {
    "data_samples".to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct PollerConfig {
    #[serde(default = "default_interval_sec")]
    pub interval_sec: u64,
    #[serde(default = "default_fetch_timeout_sec")]
    pub fetch_timeout_sec: u64,
    // read documents from `<sample_dir>/<sample_data>/` instead of GivTCP
    pub sample_data: Option<String>,
    #[serde(default = "default_sample_dir")]
    pub sample_dir: String,
    pub snapshot_path: Option<String>,
    pub export_dir: Option<String>,
}

pub fn load_poller_config() -> Result<PollerConfig> {
    match envy::prefixed("POLLER_").from_env::<PollerConfig>() {
        Ok(config) => Ok(config),
        Err(err) => Err(anyhow!("Failed to load PollerConfig: {}", err)),
    }
}
