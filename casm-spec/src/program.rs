//! # Bytecode Program
//!
//! An assembled program is the ordered stream of field elements handed to
//! the VM loader: one word per instruction, followed by its immediate when
//! it carries one.
//!
//! Binary format: each element is 32 bytes, big-endian, no header.

use crate::error::SpecError;
use crate::field::{Felt, FELT_BYTES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Assembled bytecode stream
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub code: Vec<Felt>,
}

impl Program {
    pub fn new(code: Vec<Felt>) -> Self {
        Self { code }
    }

    /// Number of field elements in the stream
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Felt> {
        self.code.iter()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.code.len() * FELT_BYTES);
        for felt in &self.code {
            bytes.extend_from_slice(&felt.to_bytes_be());
        }
        bytes
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SpecError> {
        if bytes.len() % FELT_BYTES != 0 {
            return Err(SpecError::InvalidBytecodeSize {
                expected: FELT_BYTES,
                found: bytes.len(),
            });
        }

        let code = bytes
            .chunks_exact(FELT_BYTES)
            .map(|chunk| {
                let mut element = [0u8; FELT_BYTES];
                element.copy_from_slice(chunk);
                Felt::from_bytes_be(&element)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { code })
    }
}

impl From<Vec<Felt>> for Program {
    fn from(code: Vec<Felt>) -> Self {
        Self::new(code)
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Felt;
    type IntoIter = std::slice::Iter<'a, Felt>;

    fn into_iter(self) -> Self::IntoIter {
        self.code.iter()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, felt) in self.code.iter().enumerate() {
            writeln!(f, "{:04}: {:#x}", index, felt)?;
        }
        Ok(())
    }
}
