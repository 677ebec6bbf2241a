//! Error types for the Akari editor
//!
//! The editing core itself is total: formatting, history and preview never
//! fail. Errors only arise at the edges (configuration, key binding strings,
//! and the draft side channel).

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Key binding errors
    #[error(transparent)]
    Keymap(#[from] KeymapError),

    /// Draft recovery errors
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// Input document could not be read
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Key binding parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    /// The binding string was empty
    #[error("Empty key binding")]
    Empty,

    /// A modifier name was not recognised
    #[error("Unknown modifier '{modifier}' in key binding '{binding}'")]
    UnknownModifier { binding: String, modifier: String },

    /// The binding had modifiers but no key
    #[error("Key binding '{0}' has no key")]
    MissingKey(String),
}

/// Draft recovery errors
#[derive(Error, Debug)]
pub enum RecoveryError {
    /// No recovery directory available
    #[error("Recovery directory not available")]
    NoRecoveryDir,

    /// I/O error
    #[error("Draft I/O error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be parsed or written
    #[error("Draft manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Recovery entry not found
    #[error("No draft for document {0}")]
    NotFound(String),
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for draft recovery operations
pub type RecoveryResult<T> = Result<T, RecoveryError>;

impl RecoveryError {
    /// Create a user-friendly error message suitable for a status line
    pub fn user_message(&self) -> String {
        match self {
            RecoveryError::NoRecoveryDir | RecoveryError::Io { .. } => {
                "The draft could not be stored locally. Your document is unaffected.".to_string()
            }
            RecoveryError::NotFound(_) => "No saved draft was found.".to_string(),
            RecoveryError::Manifest(_) => self.to_string(),
        }
    }
}
