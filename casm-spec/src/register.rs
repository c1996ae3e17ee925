//! Address registers of the CASM machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base register for a memory operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    /// Allocation pointer
    Ap,
    /// Frame pointer
    Fp,
}

impl Register {
    pub fn name(self) -> &'static str {
        match self {
            Register::Ap => "ap",
            Register::Fp => "fp",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
