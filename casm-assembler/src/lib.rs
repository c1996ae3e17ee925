//! CASM Assembler
//!
//! Assemble CASM statements into bytecode for the STARK-field register
//! machine. Each statement becomes one 64-bit instruction word, followed
//! by an immediate field element when operand 1 is a literal.
//!
//! ## Example
//!
//! ```rust
//! use casm_assembler::assemble;
//!
//! let source = r#"
//!     [fp + 1] = 5;
//!     call rel [ap - 3];
//!     ret;
//! "#;
//!
//! let program = assemble(source).unwrap();
//! assert_eq!(program.len(), 4);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod translator;
pub mod encoder;
pub mod assembler;

pub use assembler::{assemble, assemble_instructions, Assembler};
pub use ast::{Position, Statement};
pub use config::{Config, ConfigError, ErrorMode};
pub use encoder::{emit, encode, flags};
pub use error::{AssemblerError, ErrorKind, Result};
pub use parser::{parse_program, parse_statement, parse_statements};
pub use translator::translate;
