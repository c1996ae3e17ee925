//! CASM Instruction record
//!
//! Layout-independent description of one machine instruction. The record
//! names register selections, operand sources and update modes; bit
//! positions live in [`crate::encoding`] only.
//!
//! An instruction occupies one word, plus a second word holding the
//! immediate when `op1_source` is [`Op1Source::Imm`].

use crate::field::Felt;
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Where operand 1 is read from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op1Source {
    /// `[op0 + off_op1]`: address computed from the value of op0
    Op0,
    /// `[pc + off_op1]`: the immediate word following the instruction
    Imm,
    /// `[fp + off_op1]`
    Fp,
    /// `[ap + off_op1]`
    Ap,
}

/// How `res` is computed from op0 and op1
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResLogic {
    Op1,
    Add,
    Mul,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcUpdate {
    /// pc += size
    Regular,
    /// pc = res
    JumpAbs,
    /// pc += res
    JumpRel,
    /// pc += op1 if dst != 0
    Jnz,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApUpdate {
    Regular,
    /// ap += res
    Add,
    /// ap += 1
    Add1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Nop,
    AssertEq,
    Call,
    Ret,
}

/// One decoded or translated machine instruction
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub off_dst: i16,
    pub off_op0: i16,
    pub off_op1: i16,
    pub dst_register: Register,
    pub op0_register: Register,
    pub op1_source: Op1Source,
    pub res: ResLogic,
    pub pc_update: PcUpdate,
    pub ap_update: ApUpdate,
    pub opcode: Opcode,
    pub imm: Option<Felt>,
}

impl Instruction {
    /// Number of words the instruction occupies in the bytecode stream
    #[inline]
    pub fn size(&self) -> usize {
        match self.imm {
            Some(_) => 2,
            None => 1,
        }
    }

    /// Check that the immediate is present exactly when op1 reads it
    pub fn validate(&self) -> bool {
        self.imm.is_some() == (self.op1_source == Op1Source::Imm)
    }
}
