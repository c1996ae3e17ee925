//! Syntax tree for CASM statements
//!
//! Offsets and immediates are unbounded here; range checks belong to the
//! translator, which reports them against the operand that overflowed.

use casm_spec::Register;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;

/// 1-based source location
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate a byte offset in `source`
    pub fn of_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        Self {
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Operand shapes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Literal, becomes a field element
    Immediate(BigInt),

    /// `[reg ± offset]`
    Deref { register: Register, offset: BigInt },

    /// `[[reg ± inner] ± outer]`
    DoubleDeref {
        register: Register,
        inner: BigInt,
        outer: BigInt,
    },
}

impl Operand {
    pub fn imm(value: i64) -> Self {
        Operand::Immediate(BigInt::from(value))
    }

    pub fn deref(register: Register, offset: i64) -> Self {
        Operand::Deref {
            register,
            offset: BigInt::from(offset),
        }
    }

    pub fn double_deref(register: Register, inner: i64, outer: i64) -> Self {
        Operand::DoubleDeref {
            register,
            inner: BigInt::from(inner),
            outer: BigInt::from(outer),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Mul,
}

/// Right-hand side: a single operand or exactly one `+`/`*` combination
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Operand(Operand),
    Binary {
        op: BinaryOp,
        lhs: Operand,
        rhs: Operand,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JumpMode {
    Abs,
    Rel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatementKind {
    /// `dst = value [, ap++]`
    AssertEq {
        dst: Operand,
        value: Expression,
        ap_incr: bool,
    },

    /// `call abs|rel target`
    Call { mode: JumpMode, target: Operand },

    /// `jmp abs|rel target [, ap++]`
    Jump {
        mode: JumpMode,
        target: Expression,
        ap_incr: bool,
    },

    /// `jmp rel target if condition != 0 [, ap++]`
    JumpNz {
        mode: JumpMode,
        target: Expression,
        condition: Operand,
        ap_incr: bool,
    },

    /// `ret`
    Ret,

    /// `ap += value`
    AddAp { value: Expression },
}

/// A parsed statement and where it starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub position: Position,
}

// Display renders canonical CASM

fn write_offset(f: &mut fmt::Formatter<'_>, offset: &BigInt) -> fmt::Result {
    if offset.is_zero() {
        Ok(())
    } else if offset.is_negative() {
        write!(f, " - {}", offset.magnitude())
    } else {
        write!(f, " + {}", offset)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate(value) => write!(f, "{}", value),
            Operand::Deref { register, offset } => {
                write!(f, "[{}", register)?;
                write_offset(f, offset)?;
                write!(f, "]")
            }
            Operand::DoubleDeref {
                register,
                inner,
                outer,
            } => {
                write!(f, "[[{}", register)?;
                write_offset(f, inner)?;
                write!(f, "]")?;
                write_offset(f, outer)?;
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Mul => write!(f, "*"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Operand(operand) => write!(f, "{}", operand),
            Expression::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
        }
    }
}

impl fmt::Display for JumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpMode::Abs => write!(f, "abs"),
            JumpMode::Rel => write!(f, "rel"),
        }
    }
}

fn ap_suffix(ap_incr: bool) -> &'static str {
    if ap_incr {
        ", ap++"
    } else {
        ""
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::AssertEq {
                dst,
                value,
                ap_incr,
            } => write!(f, "{} = {}{}", dst, value, ap_suffix(*ap_incr)),
            StatementKind::Call { mode, target } => write!(f, "call {} {}", mode, target),
            StatementKind::Jump {
                mode,
                target,
                ap_incr,
            } => write!(f, "jmp {} {}{}", mode, target, ap_suffix(*ap_incr)),
            StatementKind::JumpNz {
                mode,
                target,
                condition,
                ap_incr,
            } => write!(
                f,
                "jmp {} {} if {} != 0{}",
                mode,
                target,
                condition,
                ap_suffix(*ap_incr)
            ),
            StatementKind::Ret => write!(f, "ret"),
            StatementKind::AddAp { value } => write!(f, "ap += {}", value),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.kind)
    }
}
