//! Configuration management for ledgermind
//!
//! This module handles loading, parsing, and validating configuration
//! from a YAML file with CLI overrides.

use crate::error::{LedgermindError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for ledgermind
///
/// Holds the chat-service settings and panel behavior (transcript cap,
/// chart defaults, greeting).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Panel behavior configuration
    #[serde(default)]
    pub panel: PanelConfig,
}

/// Chat service configuration
///
/// Specifies which transport to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Type of chat service transport
    #[serde(rename = "type", default = "default_service_type")]
    pub service_type: String,

    /// HTTP transport configuration
    #[serde(default)]
    pub http: HttpServiceConfig,
}

fn default_service_type() -> String {
    "http".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_type: default_service_type(),
            http: HttpServiceConfig::default(),
        }
    }
}

/// HTTP chat service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServiceConfig {
    /// Endpoint that proxies the chat completion model
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8000/api/chat".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Panel behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Transcript settings
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// Chart rendering defaults
    #[serde(default)]
    pub chart: ChartDefaults,

    /// Assistant greeting seeded as the first visible entry
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_greeting() -> String {
    "Hello! I am your assistant. I can provide analytics and charts. How can I help you today?"
        .to_string()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            transcript: TranscriptConfig::default(),
            chart: ChartDefaults::default(),
            greeting: default_greeting(),
        }
    }
}

/// Transcript configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Maximum number of transcript entries kept as request context
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    20
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

/// Chart rendering defaults
///
/// These map onto the chart collaborator's recognized options: height,
/// color palette, line options, and navigability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDefaults {
    /// Chart height in pixels
    #[serde(default = "default_chart_height")]
    pub height: u32,

    /// Color palette cycled across datasets
    #[serde(default = "default_chart_colors")]
    pub colors: Vec<String>,

    /// Hide data-point dots on line charts
    #[serde(default = "default_true")]
    pub hide_dots: bool,

    /// Fill the region under line charts
    #[serde(default = "default_true")]
    pub region_fill: bool,

    /// Whether charts are keyboard-navigable
    #[serde(default = "default_true")]
    pub is_navigable: bool,
}

fn default_chart_height() -> u32 {
    200
}

fn default_chart_colors() -> Vec<String> {
    ["#7cd6fd", "#743ee2", "#ff5858", "#ffa3ef", "#5f6fed"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            height: default_chart_height(),
            colors: default_chart_colors(),
            hide_dots: default_true(),
            region_fill: default_true(),
            is_navigable: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults
    ///
    /// If the file does not exist, the default configuration is returned so
    /// the panel can run without a config file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| LedgermindError::Config(format!("Failed to read config: {}", e)))?;
        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| LedgermindError::Config(format!("Failed to parse config: {}", e)))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any field carries an unusable value.
    pub fn validate(&self) -> Result<()> {
        if self.service.service_type != "http" {
            return Err(LedgermindError::Config(format!(
                "Unknown service type: {}",
                self.service.service_type
            ))
            .into());
        }

        if self.service.http.endpoint.is_empty() {
            return Err(
                LedgermindError::Config("Service endpoint must not be empty".to_string()).into(),
            );
        }

        if !self.service.http.endpoint.starts_with("http://")
            && !self.service.http.endpoint.starts_with("https://")
        {
            return Err(LedgermindError::Config(format!(
                "Service endpoint must be an HTTP(S) URL: {}",
                self.service.http.endpoint
            ))
            .into());
        }

        if self.panel.transcript.max_entries == 0 {
            return Err(LedgermindError::Config(
                "Transcript max_entries must be greater than zero".to_string(),
            )
            .into());
        }

        if self.panel.chart.height == 0 {
            return Err(
                LedgermindError::Config("Chart height must be greater than zero".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}
