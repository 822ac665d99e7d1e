//! Configuration management

use crate::registry::{self, NodeRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub fonts: FontsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub bind_address: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

/// How agents are reached
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Agent port for nodes without their own `port`
    #[serde(default = "default_agent_port")]
    pub port: u16,
    #[serde(default = "default_backend_timeout_sec")]
    pub timeout_sec: u64,
}

/// Font files tried in order; the first that loads is used for every image
#[derive(Debug, Clone, Deserialize)]
pub struct FontsConfig {
    #[serde(default = "default_preferred_font")]
    pub preferred: String,
    #[serde(default = "default_fallback_font")]
    pub fallback: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_report_font_size")]
    pub report_font_size: f64,
    #[serde(default = "default_table_font_size")]
    pub table_font_size: f64,
    /// Largest report image; longer or wider reports are cut off
    #[serde(default = "default_max_image_side")]
    pub max_width: u32,
    #[serde(default = "default_max_image_side")]
    pub max_height: u32,
}

fn default_bind_port() -> u16 {
    protocol::DEFAULT_GATEWAY_PORT
}

fn default_agent_port() -> u16 {
    protocol::DEFAULT_AGENT_PORT
}

fn default_backend_timeout_sec() -> u64 {
    40
}

fn default_preferred_font() -> String {
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc".to_string()
}

fn default_fallback_font() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf".to_string()
}

fn default_report_font_size() -> f64 {
    22.0
}

fn default_table_font_size() -> f64 {
    30.0
}

fn default_max_image_side() -> u32 {
    4096
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            port: default_agent_port(),
            timeout_sec: default_backend_timeout_sec(),
        }
    }
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred_font(),
            fallback: default_fallback_font(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            report_font_size: default_report_font_size(),
            table_font_size: default_table_font_size(),
            max_width: default_max_image_side(),
            max_height: default_max_image_side(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .with_context(|| "Failed to parse config file")?;

        if config.backend.timeout_sec == 0 {
            anyhow::bail!("backend.timeout_sec must be at least one second");
        }

        if config.render.report_font_size <= 0.0 || config.render.table_font_size <= 0.0 {
            anyhow::bail!("font sizes must be positive");
        }

        if config.render.max_width == 0 || config.render.max_height == 0 {
            anyhow::bail!("render.max_width and render.max_height must be positive");
        }

        registry::validate(&config.nodes).context("Invalid [[nodes]] table")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("[general]\nbind_address = \"0.0.0.0\"\n").unwrap();
        assert_eq!(config.general.bind_port, 48081);
        assert_eq!(config.backend.port, 48080);
        assert_eq!(config.backend.timeout(), Duration::from_secs(40));
        assert_eq!(config.render.report_font_size, 22.0);
        assert_eq!(config.render.table_font_size, 30.0);
        assert_eq!((config.render.max_width, config.render.max_height), (4096, 4096));
        assert!(config.fonts.preferred.ends_with("NotoSansCJK-Regular.ttc"));
        assert!(config.nodes.is_empty());
    }

    #[test]
    fn test_node_table() {
        let config = Config::parse(
            r#"
            [general]
            bind_address = "0.0.0.0"

            [[nodes]]
            name = "local"
            address = "localhost"
            alias = "This host"

            [[nodes]]
            name = "tokyo"
            address = "203.0.113.7"
            alias = "Tokyo VPS"
            port = 9000
            "#,
        )
        .unwrap();
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.nodes[0].name, "local");
        assert_eq!(config.nodes[0].port, None);
        assert_eq!(config.nodes[1].port, Some(9000));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let result = Config::parse(
            r#"
            [general]
            bind_address = "0.0.0.0"

            [[nodes]]
            name = "local"
            address = "localhost"
            alias = "a"

            [[nodes]]
            name = "local"
            address = "127.0.0.1"
            alias = "b"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::parse("[general]\nbind_address = \"0.0.0.0\"\n[backend]\ntimeout_sec = 0\n");
        assert!(result.is_err());
    }
}
