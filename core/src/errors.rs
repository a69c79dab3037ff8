//! kwtriage error types
//!
//! Two failure classes reach the operator: a source that cannot be loaded
//! and a destination that cannot be written. Configuration problems get
//! their own class so the CLI can map them to a distinct exit code.
//! Classification itself never fails.

use thiserror::Error;

/// Error category for structured logging and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Source missing, unreadable, malformed, or missing required columns
    LoadError,
    /// Destination unwritable
    SaveError,
    /// Config file or option values invalid
    ConfigError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadError => "LOAD_ERROR",
            Self::SaveError => "SAVE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Process exit code reported by the CLI for this category
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LoadError => 1,
            Self::SaveError => 2,
            Self::ConfigError => 3,
        }
    }
}

/// Pipeline error with category and context
#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("load error: {message}")]
    Load {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("save error: {message}")]
    Save {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl KeywordError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Load { .. } => ErrorCategory::LoadError,
            Self::Save { .. } => ErrorCategory::SaveError,
            Self::Config { .. } => ErrorCategory::ConfigError,
        }
    }

    /// Create a load error
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
            source: None,
        }
    }

    /// Create a load error with source
    pub fn load_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a save error with source
    pub fn save_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Save {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for kwtriage operations
pub type Result<T> = std::result::Result<T, KeywordError>;
