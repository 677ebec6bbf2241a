//! Configuration management for the Akari editor
//!
//! Handles loading, saving, and managing editor configuration.
//! Configuration is stored as JSON in the user's config directory.

use crate::error::{ConfigError, ConfigResult};
use crate::i18n::Locale;
use crate::state::SyntaxMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier used for config and data directories
pub const APP_ID: &str = "akari-editor";

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Maximum undo history entries
pub const MAX_UNDO_HISTORY: usize = 50;

/// Delay between the last buffer change and the preview re-render
pub const PREVIEW_DEBOUNCE_MS: u64 = 150;

/// Indentation inserted by the indent operator
pub const INDENT: &str = "  ";

/// Autosave interval for drafts in seconds
pub const DEFAULT_AUTOSAVE_INTERVAL: u64 = 30;

/// Drafts older than this are removed on cleanup
pub const MAX_DRAFT_AGE_DAYS: u64 = 14;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor configuration
    pub editor: EditorConfig,

    /// Preview pane configuration
    pub preview: PreviewConfig,

    /// Keyboard shortcuts configuration
    pub keybindings: KeybindingsConfig,

    /// Draft recovery configuration
    pub recovery: RecoveryConfig,
}

impl Config {
    /// Load configuration from the default location or return defaults
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific JSON file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific JSON file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.editor.max_undo_history == 0 {
            return Err(ConfigError::InvalidValue {
                key: "editor.max_undo_history".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the data directory path (drafts live here)
    pub fn data_dir() -> ConfigResult<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }
}

/// Editor-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Syntax mode a new editor starts in
    pub initial_mode: SyntaxMode,

    /// Language of placeholder text inserted by the toolbar
    pub locale: Locale,

    /// Maximum undo history entries
    pub max_undo_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_mode: SyntaxMode::Markdown,
            locale: Locale::Ja,
            max_undo_history: MAX_UNDO_HISTORY,
        }
    }
}

/// Preview pane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Debounce delay before re-rendering, in milliseconds
    pub debounce_ms: u64,

    /// View mode a new editor starts in
    pub default_view_mode: ViewMode,

    /// Keep the preview scrolled in step with the editor in split mode
    pub sync_scroll: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: PREVIEW_DEBOUNCE_MS,
            default_view_mode: ViewMode::Edit,
            sync_scroll: true,
        }
    }
}

/// View mode for the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ViewMode {
    /// Source editing only
    #[default]
    Edit,
    /// Rendered preview only
    Preview,
    /// Side-by-side source and preview
    Split,
}

impl ViewMode {
    /// Toggle the preview pane (Ctrl+Shift+P)
    pub fn toggle_preview(self) -> ViewMode {
        match self {
            ViewMode::Edit => ViewMode::Split,
            ViewMode::Split | ViewMode::Preview => ViewMode::Edit,
        }
    }

    /// Check if preview is visible
    pub fn shows_preview(self) -> bool {
        matches!(self, ViewMode::Preview | ViewMode::Split)
    }

    /// Check if the source editor is visible
    pub fn shows_editor(self) -> bool {
        matches!(self, ViewMode::Edit | ViewMode::Split)
    }
}

/// Keyboard shortcuts configuration
///
/// `Ctrl` also matches the Cmd key on macOS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub bold: String,
    pub italic: String,
    pub underline: String,
    pub save: String,
    pub undo: String,
    pub redo: String,
    pub link: String,
    pub inline_code: String,
    pub code_block: String,
    pub toggle_preview: String,
    pub fullscreen: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            bold: "Ctrl+B".to_string(),
            italic: "Ctrl+I".to_string(),
            underline: "Ctrl+U".to_string(),
            save: "Ctrl+S".to_string(),
            undo: "Ctrl+Z".to_string(),
            redo: "Ctrl+Shift+Z".to_string(),
            link: "Ctrl+K".to_string(),
            inline_code: "Ctrl+`".to_string(),
            code_block: "Ctrl+Shift+`".to_string(),
            toggle_preview: "Ctrl+Shift+P".to_string(),
            fullscreen: "Ctrl+Shift+Enter".to_string(),
        }
    }
}

/// Draft recovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Write drafts in the background
    pub autosave_enabled: bool,

    /// Autosave interval in seconds
    pub autosave_interval: u64,

    /// Drafts older than this many days are discarded
    pub max_age_days: u64,

    /// Override for the draft directory (defaults to the data directory)
    pub directory: Option<PathBuf>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            max_age_days: MAX_DRAFT_AGE_DAYS,
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.max_undo_history, 50);
        assert_eq!(config.preview.debounce_ms, 150);
        assert_eq!(config.editor.initial_mode, SyntaxMode::Markdown);
        assert!(config.recovery.autosave_enabled);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.keybindings.redo, deserialized.keybindings.redo);
        assert_eq!(config.editor.locale, deserialized.editor.locale);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"editor": {"initial_mode": "Html"}}"#).unwrap();
        assert_eq!(config.editor.initial_mode, SyntaxMode::Html);
        assert_eq!(config.editor.max_undo_history, MAX_UNDO_HISTORY);
        assert_eq!(config.keybindings.bold, "Ctrl+B");
    }

    #[test]
    fn test_load_and_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.editor.locale = Locale::En;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.editor.locale, Locale::En);
    }

    #[test]
    fn test_invalid_history_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"editor": {"max_undo_history": 0}}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::default(), ViewMode::Edit);
        assert_eq!(ViewMode::Edit.toggle_preview(), ViewMode::Split);
        assert_eq!(ViewMode::Split.toggle_preview(), ViewMode::Edit);
        assert!(ViewMode::Split.shows_preview());
        assert!(ViewMode::Split.shows_editor());
        assert!(!ViewMode::Preview.shows_editor());
    }
}
