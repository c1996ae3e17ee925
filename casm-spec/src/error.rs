//! # Error Types for the CASM machine definition

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Invalid numeric literal: {0:?}")]
    InvalidLiteral(String),

    #[error("Literal {0} does not fit in the field (magnitude must be below the STARK prime)")]
    LiteralOutOfRange(String),

    #[error("Non-canonical field element: {0}")]
    NonCanonicalElement(String),

    #[error("Invalid bytecode size: expected a multiple of {expected} bytes, found {found} bytes")]
    InvalidBytecodeSize { expected: usize, found: usize },
}
