//! # CASM Disassembler
//!
//! Disassemble CASM bytecode back into readable statements.
//!
//! Every record the assembler produces formats as the statement it came
//! from, so `assemble(disassemble_source(p))` reproduces `p`. Words the
//! assembler never emits are still decoded and shown as `<raw ...>`.
//!
//! ## Example
//!
//! ```rust
//! use casm_spec::{Felt, Program};
//! use casm_disassembler::{disassemble, disassemble_source};
//!
//! let program = Program::new(vec![
//!     Felt::from(0x4007_8001_7fff_8001u64),
//!     Felt::from(5u64),
//!     Felt::from(0x208b_7fff_7fff_7ffeu64),
//! ]);
//!
//! assert_eq!(disassemble_source(&program).unwrap(), "[fp + 1] = 5;\nret;\n");
//! println!("{}", disassemble(&program));
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::{disassemble, disassemble_source};
pub use decoder::{decode, decode_program};
pub use formatter::format;
