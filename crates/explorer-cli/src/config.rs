use std::path::{Path, PathBuf};

use explorer::PanelLimits;
use explorer_tui::app::PanelConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Workspace root; the current directory when unset.
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default)]
    pub panel: PanelSection,
    #[serde(default)]
    pub state: StateSection,
}

/// Sidebar sizing, in terminal cells.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelSection {
    pub min_width: f64,
    pub default_width: f64,
    pub fixed_insets: f64,
    pub activity_bar_width: f64,
    pub editor_min_width: f64,
}

impl Default for PanelSection {
    fn default() -> Self {
        let limits = PanelLimits::default();
        let panel = PanelConfig::default();
        Self {
            min_width: limits.min_width,
            default_width: limits.default_width,
            fixed_insets: panel.fixed_insets,
            activity_bar_width: panel.activity_bar_width,
            editor_min_width: panel.editor_min_width,
        }
    }
}

impl PanelSection {
    pub fn to_panel_config(&self) -> PanelConfig {
        PanelConfig {
            limits: PanelLimits {
                min_width: self.min_width,
                default_width: self.default_width,
            },
            fixed_insets: self.fixed_insets,
            activity_bar_width: self.activity_bar_width,
            editor_min_width: self.editor_min_width,
        }
    }
}

/// Where persisted panel state lives.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StateSection {
    pub database: Option<PathBuf>,
}

impl AppConfig {
    /// State database path: configured, or under the platform data directory.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.state
            .database
            .clone()
            .or_else(|| data_dir().map(|d| d.join("state.db")))
    }
}

/// `~/.local/share/workspace-explorer` (or the platform equivalent).
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("workspace-explorer"))
}

/// Config file path: `~/.config/workspace-explorer/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("workspace-explorer").join("config.toml"))
}

/// Load config from `path` (or the default location), falling back to defaults
/// if missing.
pub fn load_config(path: Option<&Path>) -> AppConfig {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        return AppConfig::default();
    };
    let Ok(contents) = std::fs::read_to_string(&path) else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return AppConfig::default();
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
            eprintln!(
                "warning: failed to parse config at {}, using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}
