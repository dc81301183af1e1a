//! Error types and handling for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for configuration resolution operations
#[derive(Debug, Error)]
pub enum LintrcError {
    /// A cycle was found while expanding `extends` chains
    #[error("Configuration cycle detected: {chain}")]
    ConfigCycle { chain: String },

    /// A rule references a plugin that is not enabled in the merged plugin set
    #[error("Unknown rule '{rule_id}': {message}")]
    UnknownRule { rule_id: String, message: String },

    /// A rule entry carries a severity outside {off, warn, error}
    #[error("Invalid severity '{value}' for rule '{rule_id}'")]
    InvalidSeverity { rule_id: String, value: String },

    /// A `files` or `ignorePatterns` glob failed to compile
    #[error("Invalid glob pattern '{pattern}': {message}")]
    GlobSyntax { pattern: String, message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Cycle,
    UnknownRule,
    InvalidSeverity,
    GlobSyntax,
    Config,
    Io,
}

impl LintrcError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintrcError::ConfigCycle { .. } => ErrorKind::Cycle,
            LintrcError::UnknownRule { .. } => ErrorKind::UnknownRule,
            LintrcError::InvalidSeverity { .. } => ErrorKind::InvalidSeverity,
            LintrcError::GlobSyntax { .. } => ErrorKind::GlobSyntax,
            LintrcError::ConfigError { .. } => ErrorKind::Config,
            LintrcError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable (resolution can continue with the
    /// offending rule entry dropped)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownRule | ErrorKind::InvalidSeverity
        )
    }

    /// Create a configuration cycle error from the chain of fragment names
    pub fn config_cycle(chain: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let chain: Vec<String> = chain.into_iter().map(Into::into).collect();
        Self::ConfigCycle {
            chain: chain.join(" -> "),
        }
    }

    /// Create an unknown rule error
    pub fn unknown_rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnknownRule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    /// Create an invalid severity error
    pub fn invalid_severity(rule_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidSeverity {
            rule_id: rule_id.into(),
            value: value.into(),
        }
    }

    /// Create a glob syntax error
    pub fn glob_syntax(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GlobSyntax {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for LintrcError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
