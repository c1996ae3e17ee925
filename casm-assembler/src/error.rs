//! Assembler errors

use crate::ast::Position;
use crate::config::ConfigError;
use thiserror::Error;

/// Error category, independent of the message details
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Range,
    Semantic,
    Config,
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error(
        "Offset out of range at line {line}, column {column}: {value} in `{operand}` is outside [{min}, {max}]",
        min = casm_spec::MIN_OFFSET,
        max = casm_spec::MAX_OFFSET
    )]
    OffsetOutOfRange {
        line: usize,
        column: usize,
        operand: String,
        value: String,
    },

    #[error("Immediate out of range at line {line}, column {column}: {value} does not fit in the field")]
    ImmediateOutOfRange {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("Semantic error at line {line}, column {column}: {message}")]
    SemanticError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("{} statements failed to assemble", .0.len())]
    Multiple(Vec<AssemblerError>),
}

impl AssemblerError {
    pub(crate) fn syntax(position: Position, message: impl Into<String>) -> Self {
        AssemblerError::SyntaxError {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    pub(crate) fn semantic(position: Position, message: impl Into<String>) -> Self {
        AssemblerError::SemanticError {
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AssemblerError::SyntaxError { .. } => ErrorKind::Syntax,
            AssemblerError::OffsetOutOfRange { .. } | AssemblerError::ImmediateOutOfRange { .. } => {
                ErrorKind::Range
            }
            AssemblerError::SemanticError { .. } => ErrorKind::Semantic,
            AssemblerError::InvalidConfig(_) => ErrorKind::Config,
            AssemblerError::Multiple(_) => ErrorKind::Batch,
        }
    }

    /// Where the offending statement starts, for per-statement errors
    pub fn position(&self) -> Option<Position> {
        match self {
            AssemblerError::SyntaxError { line, column, .. }
            | AssemblerError::OffsetOutOfRange { line, column, .. }
            | AssemblerError::ImmediateOutOfRange { line, column, .. }
            | AssemblerError::SemanticError { line, column, .. } => {
                Some(Position::new(*line, *column))
            }
            AssemblerError::InvalidConfig(_) | AssemblerError::Multiple(_) => None,
        }
    }

    /// The individual statement errors; a single error yields itself
    pub fn errors(&self) -> &[AssemblerError] {
        match self {
            AssemblerError::Multiple(errors) => errors,
            other => std::slice::from_ref(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
