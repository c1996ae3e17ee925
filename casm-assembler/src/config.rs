//! # Assembler Configuration
//!
//! Controls how statement errors are handled across a batch. Every
//! statement is independent, so the assembler can stop at the first error
//! or keep going and report all of them; no bytecode is produced in either
//! case once a statement has failed.

use std::fmt;

/// Error handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMode {
    /// Return the first statement error
    FailFast,
    /// Parse and translate every statement, then report all errors
    CollectAll,
}

/// Assembler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    pub error_mode: ErrorMode,
    /// Maximum errors collected before giving up (collect-all mode)
    pub error_limit: usize,
}

impl Config {
    /// Fail-fast, with a limit of 64 for when collect-all is switched on
    pub const DEFAULT: Self = Self {
        error_mode: ErrorMode::FailFast,
        error_limit: 64,
    };

    /// Create a new configuration with validation
    pub const fn new(error_mode: ErrorMode, error_limit: usize) -> Result<Self, ConfigError> {
        if error_limit == 0 {
            return Err(ConfigError::ZeroErrorLimit);
        }
        Ok(Self {
            error_mode,
            error_limit,
        })
    }

    /// Default limit, collecting every error
    pub const fn collect_all() -> Self {
        Self {
            error_mode: ErrorMode::CollectAll,
            ..Self::DEFAULT
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_limit == 0 {
            return Err(ConfigError::ZeroErrorLimit);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.error_mode {
            ErrorMode::FailFast => "fail-fast",
            ErrorMode::CollectAll => "collect-all",
        };
        write!(f, "Config {{ errors: {}, limit: {} }}", mode, self.error_limit)
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// error_limit must be at least 1
    ZeroErrorLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroErrorLimit => write!(f, "error_limit must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}
