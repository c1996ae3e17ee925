//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Reserved bit 63 set in instruction word 0x{0:016X}")]
    ReservedBitSet(u64),

    #[error("Conflicting {group} flags in instruction word 0x{word:016X}")]
    ConflictingFlags { word: u64, group: &'static str },

    #[error("Instruction word 0x{0:016X} reads an immediate but none follows")]
    MissingImmediate(u64),

    #[error("Element {0} does not fit in a 64-bit instruction word")]
    InvalidWord(String),

    #[error("At pc {pc}: {source}")]
    AtPc {
        pc: usize,
        #[source]
        source: Box<DisassemblerError>,
    },
}

impl DisassemblerError {
    pub(crate) fn at(self, pc: usize) -> Self {
        DisassemblerError::AtPc {
            pc,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
