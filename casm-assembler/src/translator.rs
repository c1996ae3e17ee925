//! Statement to Instruction translation
//!
//! Each statement shape maps to exactly one [`Instruction`] by a fixed
//! rule. Slots the statement does not use are filled with `[fp - 1]` for
//! dst and op0; an immediate op1 always lives at `pc + 1`.

use crate::ast::{BinaryOp, Expression, JumpMode, Operand, Position, Statement, StatementKind};
use crate::error::{AssemblerError, Result};
use casm_spec::{ApUpdate, Felt, Instruction, Op1Source, Opcode, PcUpdate, Register, ResLogic};
use num_bigint::BigInt;

/// Register and offset used for operand slots a statement leaves unused
const UNUSED_SLOT: (Register, i16) = (Register::Fp, -1);

/// op1 offset of an immediate: the word right after the instruction
const IMM_OFFSET: i16 = 1;

/// Translate one parsed statement
pub fn translate(statement: &Statement) -> Result<Instruction> {
    let translator = Translator {
        position: statement.position,
    };
    let instr = translator.statement(&statement.kind)?;
    debug_assert!(instr.validate(), "translator produced an inconsistent record");
    Ok(instr)
}

struct Translator {
    position: Position,
}

impl Translator {
    fn statement(&self, kind: &StatementKind) -> Result<Instruction> {
        match kind {
            StatementKind::AssertEq {
                dst,
                value,
                ap_incr,
            } => {
                let (dst_register, off_dst) = self.deref(dst, "the destination")?;
                let mut instr = skeleton(Opcode::AssertEq);
                instr.dst_register = dst_register;
                instr.off_dst = off_dst;
                instr.ap_update = ap_update(*ap_incr);
                self.res(value, &mut instr)?;
                Ok(instr)
            }

            StatementKind::Call { mode, target } => {
                // Return fp and return pc go to [ap] and [ap + 1]
                let mut instr = skeleton(Opcode::Call);
                instr.dst_register = Register::Ap;
                instr.off_dst = 0;
                instr.op0_register = Register::Ap;
                instr.off_op0 = 1;
                instr.pc_update = match mode {
                    JumpMode::Abs => PcUpdate::JumpAbs,
                    JumpMode::Rel => PcUpdate::JumpRel,
                };
                if matches!(target, Operand::DoubleDeref { .. }) {
                    return Err(self.semantic(format!(
                        "`call` target must be an immediate or `[reg + off]`, found `{}`",
                        target
                    )));
                }
                self.op1(target, &mut instr)?;
                Ok(instr)
            }

            StatementKind::Jump {
                mode,
                target,
                ap_incr,
            } => {
                let mut instr = skeleton(Opcode::Nop);
                instr.pc_update = match mode {
                    JumpMode::Abs => PcUpdate::JumpAbs,
                    JumpMode::Rel => PcUpdate::JumpRel,
                };
                instr.ap_update = ap_update(*ap_incr);
                if let Expression::Binary { op: BinaryOp::Mul, .. } = target {
                    return Err(self.semantic(format!(
                        "jump targets only combine operands with `+`, found `{}`",
                        target
                    )));
                }
                self.res(target, &mut instr)?;
                Ok(instr)
            }

            StatementKind::JumpNz {
                mode,
                target,
                condition,
                ap_incr,
            } => {
                if *mode != JumpMode::Rel {
                    return Err(self.semantic("conditional jumps must be relative (`jmp rel`)"));
                }
                let target = match target {
                    Expression::Operand(operand) => operand,
                    Expression::Binary { .. } => {
                        return Err(self.semantic(format!(
                            "conditional jump target must be a single operand, found `{}`",
                            target
                        )))
                    }
                };

                let (dst_register, off_dst) = self.deref(condition, "the jump condition")?;
                let mut instr = skeleton(Opcode::Nop);
                instr.dst_register = dst_register;
                instr.off_dst = off_dst;
                instr.pc_update = PcUpdate::Jnz;
                instr.ap_update = ap_update(*ap_incr);
                self.op1(target, &mut instr)?;
                Ok(instr)
            }

            StatementKind::Ret => {
                // Return pc at [fp - 1], caller fp at [fp - 2]
                let mut instr = skeleton(Opcode::Ret);
                instr.off_dst = -2;
                instr.op1_source = Op1Source::Fp;
                instr.off_op1 = -1;
                instr.pc_update = PcUpdate::JumpAbs;
                Ok(instr)
            }

            StatementKind::AddAp { value } => {
                let mut instr = skeleton(Opcode::Nop);
                instr.ap_update = ApUpdate::Add;
                self.res(value, &mut instr)?;
                Ok(instr)
            }
        }
    }

    /// Fill op0, op1 and res from a right-hand side
    fn res(&self, value: &Expression, instr: &mut Instruction) -> Result<()> {
        match value {
            Expression::Operand(operand) => {
                instr.res = ResLogic::Op1;
                self.op1(operand, instr)
            }
            Expression::Binary { op, lhs, rhs } => {
                let (op0_register, off_op0) = self.deref(lhs, "the left operand of `+`/`*`")?;
                instr.op0_register = op0_register;
                instr.off_op0 = off_op0;
                instr.res = match op {
                    BinaryOp::Add => ResLogic::Add,
                    BinaryOp::Mul => ResLogic::Mul,
                };
                if matches!(rhs, Operand::DoubleDeref { .. }) {
                    return Err(self.semantic(format!(
                        "`{}` needs op0 for two different operands",
                        value
                    )));
                }
                self.op1(rhs, instr)
            }
        }
    }

    /// Fill op1. A double dereference also claims op0 for its inner address.
    fn op1(&self, operand: &Operand, instr: &mut Instruction) -> Result<()> {
        match operand {
            Operand::Immediate(value) => {
                instr.op1_source = Op1Source::Imm;
                instr.off_op1 = IMM_OFFSET;
                instr.imm = Some(self.immediate(value)?);
            }
            Operand::Deref { register, offset } => {
                instr.op1_source = match register {
                    Register::Ap => Op1Source::Ap,
                    Register::Fp => Op1Source::Fp,
                };
                instr.off_op1 = self.offset(offset, operand)?;
            }
            Operand::DoubleDeref {
                register,
                inner,
                outer,
            } => {
                instr.op0_register = *register;
                instr.off_op0 = self.offset(inner, operand)?;
                instr.op1_source = Op1Source::Op0;
                instr.off_op1 = self.offset(outer, operand)?;
            }
        }
        Ok(())
    }

    /// A plain `[reg + off]` operand
    fn deref(&self, operand: &Operand, role: &str) -> Result<(Register, i16)> {
        match operand {
            Operand::Deref { register, offset } => Ok((*register, self.offset(offset, operand)?)),
            _ => Err(self.semantic(format!(
                "{} must be a memory operand like `[fp + 1]`, found `{}`",
                role, operand
            ))),
        }
    }

    fn offset(&self, value: &BigInt, operand: &Operand) -> Result<i16> {
        i16::try_from(value).map_err(|_| AssemblerError::OffsetOutOfRange {
            line: self.position.line,
            column: self.position.column,
            operand: operand.to_string(),
            value: value.to_string(),
        })
    }

    fn immediate(&self, value: &BigInt) -> Result<Felt> {
        Felt::from_bigint(value).map_err(|_| AssemblerError::ImmediateOutOfRange {
            line: self.position.line,
            column: self.position.column,
            value: value.to_string(),
        })
    }

    fn semantic(&self, message: impl Into<String>) -> AssemblerError {
        AssemblerError::semantic(self.position, message)
    }
}

/// Record with every slot unused and regular updates
fn skeleton(opcode: Opcode) -> Instruction {
    let (register, offset) = UNUSED_SLOT;
    Instruction {
        off_dst: offset,
        off_op0: offset,
        off_op1: offset,
        dst_register: register,
        op0_register: register,
        op1_source: Op1Source::Fp,
        res: ResLogic::Op1,
        pc_update: PcUpdate::Regular,
        ap_update: ApUpdate::Regular,
        opcode,
        imm: None,
    }
}

fn ap_update(ap_incr: bool) -> ApUpdate {
    if ap_incr {
        ApUpdate::Add1
    } else {
        ApUpdate::Regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::parse_statement;

    fn instr(source: &str) -> Instruction {
        translate(&parse_statement(source).unwrap()).unwrap()
    }

    fn error(source: &str) -> AssemblerError {
        translate(&parse_statement(source).unwrap()).unwrap_err()
    }

    #[test]
    fn test_assert_eq_register() {
        assert_eq!(
            instr("[ap] = [fp], ap++;"),
            Instruction {
                off_dst: 0,
                off_op0: -1,
                off_op1: 0,
                dst_register: Register::Ap,
                op0_register: Register::Fp,
                op1_source: Op1Source::Fp,
                res: ResLogic::Op1,
                pc_update: PcUpdate::Regular,
                ap_update: ApUpdate::Add1,
                opcode: Opcode::AssertEq,
                imm: None,
            }
        );
    }

    #[test]
    fn test_call_rel_immediate() {
        assert_eq!(
            instr("call rel 123;"),
            Instruction {
                off_dst: 0,
                off_op0: 1,
                off_op1: 1,
                dst_register: Register::Ap,
                op0_register: Register::Ap,
                op1_source: Op1Source::Imm,
                res: ResLogic::Op1,
                pc_update: PcUpdate::JumpRel,
                ap_update: ApUpdate::Regular,
                opcode: Opcode::Call,
                imm: Some(Felt::from(123u64)),
            }
        );
    }

    #[test]
    fn test_call_abs_deref() {
        assert_eq!(
            instr("call abs [fp + 4];"),
            Instruction {
                off_dst: 0,
                off_op0: 1,
                off_op1: 4,
                dst_register: Register::Ap,
                op0_register: Register::Ap,
                op1_source: Op1Source::Fp,
                res: ResLogic::Op1,
                pc_update: PcUpdate::JumpAbs,
                ap_update: ApUpdate::Regular,
                opcode: Opcode::Call,
                imm: None,
            }
        );
    }

    #[test]
    fn test_ret() {
        assert_eq!(
            instr("ret;"),
            Instruction {
                off_dst: -2,
                off_op0: -1,
                off_op1: -1,
                dst_register: Register::Fp,
                op0_register: Register::Fp,
                op1_source: Op1Source::Fp,
                res: ResLogic::Op1,
                pc_update: PcUpdate::JumpAbs,
                ap_update: ApUpdate::Regular,
                opcode: Opcode::Ret,
                imm: None,
            }
        );
    }

    #[test]
    fn test_jmp_abs_immediate_ap_incr() {
        assert_eq!(
            instr("jmp abs 123, ap++;"),
            Instruction {
                off_dst: -1,
                off_op0: -1,
                off_op1: 1,
                dst_register: Register::Fp,
                op0_register: Register::Fp,
                op1_source: Op1Source::Imm,
                res: ResLogic::Op1,
                pc_update: PcUpdate::JumpAbs,
                ap_update: ApUpdate::Add1,
                opcode: Opcode::Nop,
                imm: Some(Felt::from(123u64)),
            }
        );
    }

    #[test]
    fn test_jmp_sum() {
        let instr = instr("jmp abs [fp - 5] + [fp + 3];");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (-1, -5, 3));
        assert_eq!(instr.op0_register, Register::Fp);
        assert_eq!(instr.op1_source, Op1Source::Fp);
        assert_eq!(instr.res, ResLogic::Add);
        assert_eq!(instr.pc_update, PcUpdate::JumpAbs);
    }

    #[test]
    fn test_jmp_rel_sum() {
        let instr = instr("jmp rel [ap + 1] + [fp - 7];");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (-1, 1, -7));
        assert_eq!(instr.dst_register, Register::Fp);
        assert_eq!(instr.op0_register, Register::Ap);
        assert_eq!(instr.op1_source, Op1Source::Fp);
        assert_eq!(instr.res, ResLogic::Add);
        assert_eq!(instr.pc_update, PcUpdate::JumpRel);
        assert_eq!(instr.opcode, Opcode::Nop);
    }

    #[test]
    fn test_jnz() {
        let instr = instr("jmp rel [ap - 2] if [fp - 7] != 0;");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (-7, -1, -2));
        assert_eq!(instr.dst_register, Register::Fp);
        assert_eq!(instr.op0_register, Register::Fp);
        assert_eq!(instr.op1_source, Op1Source::Ap);
        assert_eq!(instr.pc_update, PcUpdate::Jnz);
        assert_eq!(instr.opcode, Opcode::Nop);
    }

    #[test]
    fn test_add_ap() {
        let instr = instr("ap += 150;");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (-1, -1, 1));
        assert_eq!(instr.op1_source, Op1Source::Imm);
        assert_eq!(instr.ap_update, ApUpdate::Add);
        assert_eq!(instr.opcode, Opcode::Nop);
        assert_eq!(instr.imm, Some(Felt::from(150u64)));
    }

    #[test]
    fn test_add_ap_operand() {
        let instr = instr("ap += [fp + 2];");
        assert_eq!(instr.op1_source, Op1Source::Fp);
        assert_eq!(instr.off_op1, 2);
        assert_eq!(instr.imm, None);
        assert_eq!(instr.ap_update, ApUpdate::Add);
    }

    #[test]
    fn test_double_deref() {
        let instr = instr("[ap + 1] = [[ap - 2] - 3];");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (1, -2, -3));
        assert_eq!(instr.op0_register, Register::Ap);
        assert_eq!(instr.op1_source, Op1Source::Op0);
        assert_eq!(instr.res, ResLogic::Op1);
    }

    #[test]
    fn test_binary_with_immediate() {
        let instr = instr("[ap] = [fp - 3] + 7;");
        assert_eq!((instr.off_dst, instr.off_op0, instr.off_op1), (0, -3, 1));
        assert_eq!(instr.res, ResLogic::Add);
        assert_eq!(instr.op1_source, Op1Source::Imm);
        assert_eq!(instr.imm, Some(Felt::from(7u64)));
    }

    #[test]
    fn test_negative_immediate() {
        let instr = instr("[ap] = -1;");
        assert_eq!(instr.imm, Some(Felt::from_dec_str("-1").unwrap()));
    }

    #[test]
    fn test_offset_boundaries() {
        assert_eq!(instr("[ap + 32767] = [fp - 32768];").off_dst, 32767);
        assert_eq!(instr("[ap + 32767] = [fp - 32768];").off_op1, -32768);

        let err = error("[ap + 32768] = 1;");
        assert_eq!(err.kind(), ErrorKind::Range);
        assert_eq!(
            err,
            AssemblerError::OffsetOutOfRange {
                line: 1,
                column: 1,
                operand: "[ap + 32768]".to_string(),
                value: "32768".to_string(),
            }
        );
        assert_eq!(error("[ap] = [fp - 32769];").kind(), ErrorKind::Range);
    }

    #[test]
    fn test_immediate_out_of_field() {
        let p = "3618502788666131213697322783095070105623107215331596699973092056135872020481";
        let err = error(&format!("[ap] = {};", p));
        assert!(matches!(err, AssemblerError::ImmediateOutOfRange { .. }));
    }

    #[test]
    fn test_shape_errors() {
        for source in [
            "5 = [ap];",
            "[[ap]] = [fp];",
            "[ap] = 5 + [fp];",
            "[ap] = [fp] + [[ap] + 1];",
            "call abs [[fp - 2]];",
            "jmp abs [fp] * [ap];",
            "jmp abs [ap] if [fp] != 0;",
            "jmp rel [ap] + [fp] if [fp] != 0;",
            "jmp rel 3 if 5 != 0;",
        ] {
            assert_eq!(error(source).kind(), ErrorKind::Semantic, "{}", source);
        }
    }
}
