//! Agent configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub probes: ProbeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub bind_address: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_ping_bin")]
    pub ping_bin: String,
    #[serde(default = "default_curl_bin")]
    pub curl_bin: String,
    #[serde(default = "default_traceroute_bin")]
    pub traceroute_bin: String,
    /// Echo requests sent per ping probe
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,
    /// Bound for ping, traceroute and the size pre-flight
    #[serde(default = "default_command_timeout_sec")]
    pub command_timeout_sec: u64,
    /// Bound for each curl transfer sub-call (also passed as --max-time)
    #[serde(default = "default_transfer_timeout_sec")]
    pub transfer_timeout_sec: u64,
    #[serde(default = "default_transfer_attempts")]
    pub transfer_attempts: u32,
    /// curl --limit-rate value
    #[serde(default = "default_transfer_rate_limit")]
    pub transfer_rate_limit: String,
    /// Largest advertised Content-Length accepted by the transfer probe
    #[serde(default = "default_max_content_length")]
    pub max_content_length: u64,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_command_output: bool,
}

fn default_bind_port() -> u16 {
    protocol::DEFAULT_AGENT_PORT
}

fn default_ping_bin() -> String {
    "ping".to_string()
}

fn default_curl_bin() -> String {
    "curl".to_string()
}

fn default_traceroute_bin() -> String {
    "nexttrace".to_string()
}

fn default_ping_count() -> u32 {
    10
}

fn default_command_timeout_sec() -> u64 {
    15
}

fn default_transfer_timeout_sec() -> u64 {
    10
}

fn default_transfer_attempts() -> u32 {
    10
}

fn default_transfer_rate_limit() -> String {
    "500k".to_string()
}

fn default_max_content_length() -> u64 {
    5_000_000
}

fn default_preview_chars() -> usize {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ping_bin: default_ping_bin(),
            curl_bin: default_curl_bin(),
            traceroute_bin: default_traceroute_bin(),
            ping_count: default_ping_count(),
            command_timeout_sec: default_command_timeout_sec(),
            transfer_timeout_sec: default_transfer_timeout_sec(),
            transfer_attempts: default_transfer_attempts(),
            transfer_rate_limit: default_transfer_rate_limit(),
            max_content_length: default_max_content_length(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_command_output: false,
        }
    }
}

impl ProbeConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_sec)
    }

    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_secs(self.transfer_timeout_sec)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;

        if config.probes.command_timeout_sec == 0 || config.probes.transfer_timeout_sec == 0 {
            anyhow::bail!("probe timeouts must be at least one second");
        }

        if config.probes.ping_count == 0 {
            anyhow::bail!("ping_count must be at least 1");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse("[general]\nbind_address = \"0.0.0.0\"\n").unwrap();
        assert_eq!(config.general.bind_port, 48080);
        assert_eq!(config.probes.ping_count, 10);
        assert_eq!(config.probes.transfer_attempts, 10);
        assert_eq!(config.probes.command_timeout(), Duration::from_secs(15));
        assert_eq!(config.probes.transfer_timeout(), Duration::from_secs(10));
        assert_eq!(config.probes.max_content_length, 5_000_000);
        assert_eq!(config.probes.preview_chars, 500);
        assert_eq!(config.probes.transfer_rate_limit, "500k");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            r#"
            [general]
            bind_address = "127.0.0.1"
            bind_port = 9000

            [probes]
            traceroute_bin = "traceroute"
            ping_count = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.general.bind_port, 9000);
        assert_eq!(config.probes.traceroute_bin, "traceroute");
        assert_eq!(config.probes.ping_count, 4);
        assert_eq!(config.probes.curl_bin, "curl");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::parse(
            "[general]\nbind_address = \"0.0.0.0\"\n[probes]\ncommand_timeout_sec = 0\n",
        );
        assert!(result.is_err());
    }
}
