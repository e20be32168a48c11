//! Configuration management for the canvas core
//!
//! Handles backend connection settings, canvas behaviour flags, execution
//! polling and catalog caching parameters.

use crate::canvas::Viewport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Workflow backend connection
    pub backend: BackendConfig,
    /// Canvas behaviour flags
    #[serde(default)]
    pub canvas: CanvasSettings,
    /// Execution polling
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Node catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Workflow backend (REST) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the workflow API (e.g., "http://localhost:8006")
    pub base_url: String,
    /// Optional API key sent as `X-API-Key`
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Canvas behaviour flags
///
/// Movement and selection changes are excluded from undo history unless the
/// matching flag is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Record position/dimension changes as undo checkpoints
    pub record_movement: bool,
    /// Record selection changes as undo checkpoints
    pub record_selection: bool,
    /// Maximum random offset (px, per axis) for nodes added without a position
    pub placement_jitter: f64,
    /// Grid size for position snapping; `None` disables snapping
    pub snap_grid: Option<f64>,
    /// Viewport assumed until the host reports the real one
    pub default_viewport: Viewport,
}

/// Execution polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Interval between execution status polls in milliseconds
    pub poll_interval_ms: u64,
}

/// Node catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// How long a fetched tool list stays fresh, in seconds
    pub tool_cache_ttl_secs: u64,
    /// Catalog ids of nodes that receive execution results
    pub output_node_ids: Vec<String>,
}

impl Default for BackendConfig {
    /// Default backend configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            base_url: std::env::var("FLOWCANVAS_API_URL")
                .unwrap_or_else(|_| "http://localhost:8006".to_string()),
            api_key: std::env::var("FLOWCANVAS_API_KEY").ok(),
            timeout_secs: std::env::var("FLOWCANVAS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            record_movement: false,
            record_selection: false,
            placement_jitter: 20.0,
            snap_grid: None,
            default_viewport: Viewport::default(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: std::env::var("FLOWCANVAS_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .unwrap_or(200),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tool_cache_ttl_secs: std::env::var("FLOWCANVAS_TOOL_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),
            output_node_ids: crate::workflow::catalog::OUTPUT_NODE_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ExecutionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl CatalogConfig {
    pub fn tool_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.tool_cache_ttl_secs)
    }
}

impl Config {
    /// Load configuration from a JSON file, filling absent sections with defaults
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config '{}': {}", path.display(), e))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path.display(), e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_defaults_exclude_drag_and_selection_from_history() {
        let settings = CanvasSettings::default();
        assert!(!settings.record_movement);
        assert!(!settings.record_selection);
        assert_eq!(settings.placement_jitter, 20.0);
        assert!(settings.snap_grid.is_none());
    }

    #[test]
    fn partial_json_fills_missing_sections() {
        let config: Config = serde_json::from_str(
            r#"{ "backend": { "base_url": "http://api", "api_key": null, "timeout_secs": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "http://api");
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert!(!config.catalog.output_node_ids.is_empty());
    }
}
