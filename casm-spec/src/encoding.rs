//! # Instruction Word Layout
//!
//! Centralized constants and helpers shared by the assembler and the
//! disassembler.
//!
//! ## Word Format (64-bit)
//!
//! ```text
//! bits  0-15  off_dst  (biased by 2^15)
//! bits 16-31  off_op0  (biased by 2^15)
//! bits 32-47  off_op1  (biased by 2^15)
//! bits 48-62  flags    (15 bits)
//! bit  63     reserved, always 0
//! ```
//!
//! ## Flags
//!
//! ```text
//! bit  0  dst_reg            bit  8  pc_jump_rel
//! bit  1  op0_reg            bit  9  pc_jnz
//! bit  2  op1_imm            bit 10  ap_add
//! bit  3  op1_fp             bit 11  ap_add1
//! bit  4  op1_ap             bit 12  opcode_call
//! bit  5  res_add            bit 13  opcode_ret
//! bit  6  res_mul            bit 14  opcode_assert_eq
//! bit  7  pc_jump_abs        bit 15  reserved
//! ```

// ============================================================================
// Field Positions
// ============================================================================

/// Added to a signed offset before storing it (equivalently: XOR 0x8000)
pub const OFFSET_BIAS: i32 = 1 << 15;

/// Offset field mask (16 bits)
pub const OFFSET_MASK: u64 = 0xFFFF;

pub const OFF_DST_SHIFT: u32 = 0;
pub const OFF_OP0_SHIFT: u32 = 16;
pub const OFF_OP1_SHIFT: u32 = 32;

/// Flags field: bits 48-62
pub const FLAGS_SHIFT: u32 = 48;

/// Flags mask (15 bits)
pub const FLAGS_MASK: u64 = 0x7FFF;

/// Bit 63 of the word (bit 15 of the flags register)
pub const RESERVED_WORD_BIT: u32 = 63;

// ============================================================================
// Flag Bits (relative to FLAGS_SHIFT)
// ============================================================================

pub const DST_REG_BIT: u32 = 0;
pub const OP0_REG_BIT: u32 = 1;
pub const OP1_IMM_BIT: u32 = 2;
pub const OP1_FP_BIT: u32 = 3;
pub const OP1_AP_BIT: u32 = 4;
pub const RES_ADD_BIT: u32 = 5;
pub const RES_MUL_BIT: u32 = 6;
pub const PC_JUMP_ABS_BIT: u32 = 7;
pub const PC_JUMP_REL_BIT: u32 = 8;
pub const PC_JNZ_BIT: u32 = 9;
pub const AP_ADD_BIT: u32 = 10;
pub const AP_ADD1_BIT: u32 = 11;
pub const OPCODE_CALL_BIT: u32 = 12;
pub const OPCODE_RET_BIT: u32 = 13;
pub const OPCODE_ASSERT_EQ_BIT: u32 = 14;
pub const RESERVED_FLAG_BIT: u32 = 15;

/// Mutually exclusive flag groups: at most one bit of each may be set
pub const EXCLUSIVE_GROUPS: [(&str, &[u32]); 5] = [
    ("op1_src", &[OP1_IMM_BIT, OP1_FP_BIT, OP1_AP_BIT]),
    ("res_logic", &[RES_ADD_BIT, RES_MUL_BIT]),
    ("pc_update", &[PC_JUMP_ABS_BIT, PC_JUMP_REL_BIT, PC_JNZ_BIT]),
    ("ap_update", &[AP_ADD_BIT, AP_ADD1_BIT]),
    ("opcode", &[OPCODE_CALL_BIT, OPCODE_RET_BIT, OPCODE_ASSERT_EQ_BIT]),
];

// ============================================================================
// Offset Biasing
// ============================================================================

/// Store a signed offset as an unsigned 16-bit value
#[inline]
pub const fn bias_offset(offset: i16) -> u16 {
    (offset as u16) ^ 0x8000
}

/// Inverse of [`bias_offset`]
#[inline]
pub const fn unbias_offset(raw: u16) -> i16 {
    (raw ^ 0x8000) as i16
}

// ============================================================================
// Field Extraction Functions
// ============================================================================

#[inline]
pub const fn extract_off_dst(word: u64) -> i16 {
    unbias_offset(((word >> OFF_DST_SHIFT) & OFFSET_MASK) as u16)
}

#[inline]
pub const fn extract_off_op0(word: u64) -> i16 {
    unbias_offset(((word >> OFF_OP0_SHIFT) & OFFSET_MASK) as u16)
}

#[inline]
pub const fn extract_off_op1(word: u64) -> i16 {
    unbias_offset(((word >> OFF_OP1_SHIFT) & OFFSET_MASK) as u16)
}

/// Flags register including the reserved bit 15
#[inline]
pub const fn extract_flags(word: u64) -> u16 {
    (word >> FLAGS_SHIFT) as u16
}

/// Pack three offsets and a flags register into a word
#[inline]
pub const fn pack_word(off_dst: i16, off_op0: i16, off_op1: i16, flags: u16) -> u64 {
    ((bias_offset(off_dst) as u64) << OFF_DST_SHIFT)
        | ((bias_offset(off_op0) as u64) << OFF_OP0_SHIFT)
        | ((bias_offset(off_op1) as u64) << OFF_OP1_SHIFT)
        | (((flags as u64) & FLAGS_MASK) << FLAGS_SHIFT)
}

// ============================================================================
// Flag Bitset
// ============================================================================

/// The 15 instruction flags as named booleans
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    pub dst_reg: bool,
    pub op0_reg: bool,
    pub op1_imm: bool,
    pub op1_fp: bool,
    pub op1_ap: bool,
    pub res_add: bool,
    pub res_mul: bool,
    pub pc_jump_abs: bool,
    pub pc_jump_rel: bool,
    pub pc_jnz: bool,
    pub ap_add: bool,
    pub ap_add1: bool,
    pub opcode_call: bool,
    pub opcode_ret: bool,
    pub opcode_assert_eq: bool,
}

impl Flags {
    /// Pack into a flags register. Bit 15 is always clear.
    pub fn to_bits(&self) -> u16 {
        [
            (self.dst_reg, DST_REG_BIT),
            (self.op0_reg, OP0_REG_BIT),
            (self.op1_imm, OP1_IMM_BIT),
            (self.op1_fp, OP1_FP_BIT),
            (self.op1_ap, OP1_AP_BIT),
            (self.res_add, RES_ADD_BIT),
            (self.res_mul, RES_MUL_BIT),
            (self.pc_jump_abs, PC_JUMP_ABS_BIT),
            (self.pc_jump_rel, PC_JUMP_REL_BIT),
            (self.pc_jnz, PC_JNZ_BIT),
            (self.ap_add, AP_ADD_BIT),
            (self.ap_add1, AP_ADD1_BIT),
            (self.opcode_call, OPCODE_CALL_BIT),
            (self.opcode_ret, OPCODE_RET_BIT),
            (self.opcode_assert_eq, OPCODE_ASSERT_EQ_BIT),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0u16, |bits, (_, bit)| bits | (1u16 << *bit))
    }

    /// Unpack a flags register. The reserved bit is ignored.
    pub fn from_bits(bits: u16) -> Self {
        let bit = |n: u32| (bits >> n) & 1 == 1;
        Self {
            dst_reg: bit(DST_REG_BIT),
            op0_reg: bit(OP0_REG_BIT),
            op1_imm: bit(OP1_IMM_BIT),
            op1_fp: bit(OP1_FP_BIT),
            op1_ap: bit(OP1_AP_BIT),
            res_add: bit(RES_ADD_BIT),
            res_mul: bit(RES_MUL_BIT),
            pc_jump_abs: bit(PC_JUMP_ABS_BIT),
            pc_jump_rel: bit(PC_JUMP_REL_BIT),
            pc_jnz: bit(PC_JNZ_BIT),
            ap_add: bit(AP_ADD_BIT),
            ap_add1: bit(AP_ADD1_BIT),
            opcode_call: bit(OPCODE_CALL_BIT),
            opcode_ret: bit(OPCODE_RET_BIT),
            opcode_assert_eq: bit(OPCODE_ASSERT_EQ_BIT),
        }
    }
}

/// Name of the first exclusive group with more than one bit set
pub fn conflicting_group(bits: u16) -> Option<&'static str> {
    EXCLUSIVE_GROUPS
        .iter()
        .find(|(_, group)| group.iter().filter(|&&b| (bits >> b) & 1 == 1).count() > 1)
        .map(|(name, _)| *name)
}
