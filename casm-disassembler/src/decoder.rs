//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use casm_spec::encoding::{
    conflicting_group, extract_flags, extract_off_dst, extract_off_op0, extract_off_op1,
    RESERVED_WORD_BIT,
};
use casm_spec::{
    ApUpdate, Felt, Flags, Instruction, Op1Source, Opcode, PcUpdate, Program, Register, ResLogic,
};

/// Decode a 64-bit instruction word.
///
/// `imm` is the element following the word; it is only consumed when the
/// word selects an immediate operand 1.
pub fn decode(word: u64, imm: Option<&Felt>) -> Result<Instruction> {
    if word >> RESERVED_WORD_BIT != 0 {
        return Err(DisassemblerError::ReservedBitSet(word));
    }

    let bits = extract_flags(word);
    if let Some(group) = conflicting_group(bits) {
        return Err(DisassemblerError::ConflictingFlags { word, group });
    }
    let flags = Flags::from_bits(bits);

    let op1_source = if flags.op1_imm {
        Op1Source::Imm
    } else if flags.op1_fp {
        Op1Source::Fp
    } else if flags.op1_ap {
        Op1Source::Ap
    } else {
        Op1Source::Op0
    };

    let imm = match op1_source {
        Op1Source::Imm => Some(imm.cloned().ok_or(DisassemblerError::MissingImmediate(word))?),
        _ => None,
    };

    Ok(Instruction {
        off_dst: extract_off_dst(word),
        off_op0: extract_off_op0(word),
        off_op1: extract_off_op1(word),
        dst_register: register(flags.dst_reg),
        op0_register: register(flags.op0_reg),
        op1_source,
        res: if flags.res_add {
            ResLogic::Add
        } else if flags.res_mul {
            ResLogic::Mul
        } else {
            ResLogic::Op1
        },
        pc_update: if flags.pc_jump_abs {
            PcUpdate::JumpAbs
        } else if flags.pc_jump_rel {
            PcUpdate::JumpRel
        } else if flags.pc_jnz {
            PcUpdate::Jnz
        } else {
            PcUpdate::Regular
        },
        ap_update: if flags.ap_add {
            ApUpdate::Add
        } else if flags.ap_add1 {
            ApUpdate::Add1
        } else {
            ApUpdate::Regular
        },
        opcode: if flags.opcode_call {
            Opcode::Call
        } else if flags.opcode_ret {
            Opcode::Ret
        } else if flags.opcode_assert_eq {
            Opcode::AssertEq
        } else {
            Opcode::Nop
        },
        imm,
    })
}

/// Decode a whole bytecode stream into `(pc, instruction)` pairs
pub fn decode_program(program: &Program) -> Result<Vec<(usize, Instruction)>> {
    let mut instructions = Vec::new();
    let mut pc = 0;

    while pc < program.len() {
        let instr = decode_at(program, pc)?;
        let size = instr.size();
        instructions.push((pc, instr));
        pc += size;
    }

    Ok(instructions)
}

/// Decode the instruction starting at `pc`
pub(crate) fn decode_at(program: &Program, pc: usize) -> Result<Instruction> {
    let element = &program.code[pc];
    let word = element
        .to_u64()
        .ok_or_else(|| DisassemblerError::InvalidWord(format!("{:#x}", element)).at(pc))?;
    decode(word, program.code.get(pc + 1)).map_err(|err| err.at(pc))
}

fn register(fp: bool) -> Register {
    if fp {
        Register::Fp
    } else {
        Register::Ap
    }
}
