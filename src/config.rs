//! Dashboard configuration, read from JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::{LoadOptions, DEFAULT_NULL_VALUES};
use crate::data::model::NumericColumn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DELIVERY_DASHBOARD_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Initial window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    820.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// File opened at startup.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Field delimiter for text sources.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Cell values treated as missing.
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,

    /// Column shown in the summary panel.
    #[serde(default = "default_stats_column")]
    pub stats_column: NumericColumn,

    /// Upper bound on rows rendered in the table preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    #[serde(default)]
    pub window: WindowConfig,

    /// Default `env_logger` filter; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data/amazon_delivery.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_null_values() -> Vec<String> {
    DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect()
}

fn default_stats_column() -> NumericColumn {
    NumericColumn::DeliveryTime
}

fn default_preview_rows() -> usize {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            delimiter: default_delimiter(),
            null_values: default_null_values(),
            stats_column: default_stats_column(),
            preview_rows: default_preview_rows(),
            window: WindowConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// `$DELIVERY_DASHBOARD_CONFIG`, else `./dashboard.json`, else defaults.
    pub fn resolve() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_json(PathBuf::from(path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_json(local);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            anyhow::bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter as u8,
            null_values: self.null_values.iter().cloned().collect(),
        }
    }
}
