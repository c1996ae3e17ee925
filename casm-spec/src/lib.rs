//! # CASM Machine Definition
//!
//! Shared types for the CASM toolchain: a register machine with two
//! address registers (`ap`, `fp`) and a program counter, whose memory
//! cells are elements of the STARK prime field.
//!
//! ## Key Features
//! - STARK field (p = 2^251 + 17 * 2^192 + 1)
//! - 64-bit instruction words: three biased 16-bit offsets + 15 flag bits
//! - Optional immediate stored as the word after the instruction
//! - Layout-independent [`Instruction`] record shared by assembler and disassembler

pub mod field;
pub mod register;
pub mod instruction;
pub mod encoding;
pub mod error;
pub mod program;

pub use field::{Felt, STARK_PRIME};
pub use register::Register;
pub use instruction::{ApUpdate, Instruction, Op1Source, Opcode, PcUpdate, ResLogic};
pub use encoding::Flags;
pub use error::SpecError;
pub use program::Program;

/// Smallest encodable operand offset
pub const MIN_OFFSET: i64 = i16::MIN as i64;

/// Largest encodable operand offset
pub const MAX_OFFSET: i64 = i16::MAX as i64;
