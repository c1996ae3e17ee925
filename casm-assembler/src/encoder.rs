//! Instruction encoding to 64-bit words
//!
//! Word layout:
//! `| 0 | flags(15) | off_op1(16) | off_op0(16) | off_dst(16) |`
//!
//! Offsets are stored biased by 2^15. An immediate, when present, is
//! emitted as a separate field element right after the word.

use casm_spec::encoding::pack_word;
use casm_spec::{ApUpdate, Felt, Flags, Instruction, Op1Source, Opcode, PcUpdate, Register, ResLogic};

/// Encode instruction to its 64-bit word
pub fn encode(instr: &Instruction) -> u64 {
    pack_word(
        instr.off_dst,
        instr.off_op0,
        instr.off_op1,
        flags(instr).to_bits(),
    )
}

/// Flag bits selected by an instruction record.
///
/// Enum variants that encode as "no bit set" (`Register::Ap`, `Op1Source::Op0`,
/// `ResLogic::Op1`, the regular updates, `Opcode::Nop`) leave their group clear,
/// so at most one bit per exclusive group is ever set.
pub fn flags(instr: &Instruction) -> Flags {
    Flags {
        dst_reg: instr.dst_register == Register::Fp,
        op0_reg: instr.op0_register == Register::Fp,

        op1_imm: instr.op1_source == Op1Source::Imm,
        op1_fp: instr.op1_source == Op1Source::Fp,
        op1_ap: instr.op1_source == Op1Source::Ap,

        res_add: instr.res == ResLogic::Add,
        res_mul: instr.res == ResLogic::Mul,

        pc_jump_abs: instr.pc_update == PcUpdate::JumpAbs,
        pc_jump_rel: instr.pc_update == PcUpdate::JumpRel,
        pc_jnz: instr.pc_update == PcUpdate::Jnz,

        ap_add: instr.ap_update == ApUpdate::Add,
        ap_add1: instr.ap_update == ApUpdate::Add1,

        opcode_call: instr.opcode == Opcode::Call,
        opcode_ret: instr.opcode == Opcode::Ret,
        opcode_assert_eq: instr.opcode == Opcode::AssertEq,
    }
}

/// Append the instruction word and its immediate, if any
pub fn emit(instr: &Instruction, code: &mut Vec<Felt>) {
    code.push(Felt::from(encode(instr)));
    if let Some(imm) = &instr.imm {
        code.push(imm.clone());
    }
}
