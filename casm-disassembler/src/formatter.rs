//! Instruction formatting to CASM text
//!
//! Records the assembler can produce render as the statement that
//! assembles back to them. Anything else renders as `<raw ...>`, which no
//! statement assembles to.

use casm_spec::{ApUpdate, Instruction, Op1Source, Opcode, PcUpdate, Register, ResLogic};

/// Slot the translator fills when dst or op0 is unused
const UNUSED: (Register, i16) = (Register::Fp, -1);

/// Format instruction as CASM text (without the trailing `;`)
pub fn format(instr: &Instruction) -> String {
    statement(instr).unwrap_or_else(|| raw(instr))
}

fn statement(instr: &Instruction) -> Option<String> {
    let dst = (instr.dst_register, instr.off_dst);

    match (instr.opcode, instr.pc_update, instr.ap_update) {
        (Opcode::AssertEq, PcUpdate::Regular, ap @ (ApUpdate::Regular | ApUpdate::Add1)) => Some(
            format!("{} = {}{}", deref(dst), res(instr, true)?, ap_suffix(ap)),
        ),

        (Opcode::Call, pc @ (PcUpdate::JumpAbs | PcUpdate::JumpRel), ApUpdate::Regular) => {
            let frame = dst == (Register::Ap, 0)
                && (instr.op0_register, instr.off_op0) == (Register::Ap, 1)
                && instr.res == ResLogic::Op1
                && instr.op1_source != Op1Source::Op0;
            if !frame {
                return None;
            }
            Some(format!("call {} {}", mode(pc), op1(instr)?))
        }

        (Opcode::Ret, PcUpdate::JumpAbs, ApUpdate::Regular) => {
            let canonical = dst == (Register::Fp, -2)
                && (instr.op0_register, instr.off_op0) == UNUSED
                && instr.op1_source == Op1Source::Fp
                && instr.off_op1 == -1
                && instr.res == ResLogic::Op1;
            canonical.then(|| "ret".to_string())
        }

        (Opcode::Nop, pc @ (PcUpdate::JumpAbs | PcUpdate::JumpRel), ap @ (ApUpdate::Regular | ApUpdate::Add1)) => {
            if dst != UNUSED {
                return None;
            }
            Some(format!("jmp {} {}{}", mode(pc), res(instr, false)?, ap_suffix(ap)))
        }

        (Opcode::Nop, PcUpdate::Jnz, ap @ (ApUpdate::Regular | ApUpdate::Add1)) => {
            if instr.res != ResLogic::Op1 {
                return None;
            }
            Some(format!(
                "jmp rel {} if {} != 0{}",
                res(instr, false)?,
                deref(dst),
                ap_suffix(ap)
            ))
        }

        (Opcode::Nop, PcUpdate::Regular, ApUpdate::Add) => {
            if dst != UNUSED {
                return None;
            }
            Some(format!("ap += {}", res(instr, true)?))
        }

        _ => None,
    }
}

/// The right-hand side computing `res`, if op0 is used the way the
/// assembler would use it
fn res(instr: &Instruction, allow_mul: bool) -> Option<String> {
    let op0 = (instr.op0_register, instr.off_op0);

    match instr.res {
        ResLogic::Op1 => {
            if instr.op1_source != Op1Source::Op0 && op0 != UNUSED {
                return None;
            }
            op1(instr)
        }
        ResLogic::Add | ResLogic::Mul => {
            if instr.op1_source == Op1Source::Op0 || (instr.res == ResLogic::Mul && !allow_mul) {
                return None;
            }
            let op = if instr.res == ResLogic::Add { "+" } else { "*" };
            Some(format!("{} {} {}", deref(op0), op, op1(instr)?))
        }
    }
}

fn op1(instr: &Instruction) -> Option<String> {
    match instr.op1_source {
        Op1Source::Imm => {
            if instr.off_op1 != 1 {
                return None;
            }
            instr.imm.as_ref().map(|imm| imm.to_signed_string())
        }
        Op1Source::Fp => Some(deref((Register::Fp, instr.off_op1))),
        Op1Source::Ap => Some(deref((Register::Ap, instr.off_op1))),
        Op1Source::Op0 => Some(format!(
            "[{}{}]",
            deref((instr.op0_register, instr.off_op0)),
            offset(instr.off_op1)
        )),
    }
}

fn deref((register, off): (Register, i16)) -> String {
    format!("[{}{}]", register, offset(off))
}

fn offset(off: i16) -> String {
    match off {
        0 => String::new(),
        off if off < 0 => format!(" - {}", -(off as i32)),
        off => format!(" + {}", off),
    }
}

fn mode(pc: PcUpdate) -> &'static str {
    match pc {
        PcUpdate::JumpRel => "rel",
        _ => "abs",
    }
}

fn ap_suffix(ap: ApUpdate) -> &'static str {
    match ap {
        ApUpdate::Add1 => ", ap++",
        _ => "",
    }
}

/// Field-by-field description of a record with no CASM spelling
fn raw(instr: &Instruction) -> String {
    let mut text = format!(
        "<raw dst={} op0={} op1={:?}{} res={:?} pc={:?} ap={:?} opcode={:?}",
        deref((instr.dst_register, instr.off_dst)),
        deref((instr.op0_register, instr.off_op0)),
        instr.op1_source,
        offset(instr.off_op1),
        instr.res,
        instr.pc_update,
        instr.ap_update,
        instr.opcode,
    );
    if let Some(imm) = &instr.imm {
        text.push_str(&format!(" imm={}", imm.to_signed_string()));
    }
    text.push('>');
    text
}
