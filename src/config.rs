use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ui::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub appearance: AppearanceConfig,
    pub spin: SpinConfig,
    pub import: ImportConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Theme preset: "darkwall", "catppuccin-mocha", "catppuccin-latte", "nord", "gruvbox"
    pub theme: String,
    pub prompt: String,
    pub selected_prefix: String,
    pub unselected_prefix: String,
    /// Show each participant's chance of winning the next draw
    pub show_chance: bool,
    /// Wheel colors as hex strings; the preset palette is used when empty
    pub segment_colors: Vec<String>,
}

/// Spin animation. Purely cosmetic: the winner is fixed before it starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// Animate draws at all (false = show the winner immediately)
    pub enabled: bool,
    /// Animation length in milliseconds
    pub duration_ms: u64,
    /// Minimum full turns of the reel
    pub min_turns: u32,
    /// Maximum full turns of the reel
    pub max_turns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// First non-blank row is a header
    pub has_header: bool,
    /// Column delimiter; detected from the file when unset
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory winners are exported to
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            appearance: AppearanceConfig::default(),
            spin: SpinConfig::default(),
            import: ImportConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "darkwall".to_string(),
            prompt: "❯ ".to_string(),
            selected_prefix: "● ".to_string(),
            unselected_prefix: "  ".to_string(),
            show_chance: true,
            segment_colors: Vec::new(),
        }
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 3000,
            min_turns: 5,
            max_turns: 8,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "selected_winners.csv".to_string(),
        }
    }
}

impl ExportConfig {
    /// Full path of the export file, with `~` expanded
    pub fn path(&self) -> PathBuf {
        let dir = self.directory.to_string_lossy();
        let dir = shellexpand::tilde(dir.as_ref());
        Path::new(dir.as_ref()).join(&self.file_name)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            tracing::info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Theme from the configured preset, falling back to darkwall
    pub fn resolve_theme(&self) -> Theme {
        Theme::from_preset(&self.appearance.theme)
            .unwrap_or_else(|| {
                tracing::warn!("Unknown theme '{}', using darkwall", self.appearance.theme);
                Theme::darkwall()
            })
            .with_segment_colors(&self.appearance.segment_colors)
    }
}
