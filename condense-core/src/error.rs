//! Error types for condense operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CondenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Config already exists at {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CondenseError {
    /// Short machine-readable code, used for `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::SourceNotFound(_) => "source_not_found",
            Self::ConfigExists(_) => "config_exists",
            Self::ConfigParse(_) => "config_parse",
            Self::GlobPattern(_) => "glob_pattern",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Human hint shown alongside the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "Check the path exists and is readable",
            Self::ConfigExists(_) => "Edit the existing .condense.toml instead",
            Self::ConfigParse(_) => "Fix the TOML syntax in .condense.toml",
            Self::GlobPattern(_) => "Check the [ignore] patterns in .condense.toml",
            Self::Io(_) | Self::Serialization(_) => "",
        }
    }
}
