//! Word layout tests across the full offset range

use casm_spec::encoding::*;
use proptest::prelude::*;

// ============================================================================
// Offset Bias Edge Cases
// ============================================================================

#[test]
fn test_bias_boundaries() {
    assert_eq!(unbias_offset(bias_offset(i16::MIN)), i16::MIN);
    assert_eq!(unbias_offset(bias_offset(i16::MAX)), i16::MAX);
    assert_eq!(unbias_offset(0x0000), -32768);
    assert_eq!(unbias_offset(0xFFFF), 32767);
    assert_eq!(unbias_offset(0x8000), 0);
}

#[test]
fn test_biased_order_preserves_signed_order() {
    let offsets = [-32768i16, -1000, -1, 0, 1, 1000, 32767];
    for pair in offsets.windows(2) {
        assert!(bias_offset(pair[0]) < bias_offset(pair[1]));
    }
}

// ============================================================================
// Field Placement
// ============================================================================

#[test]
fn test_fields_do_not_overlap() {
    let dst_only = pack_word(-1, i16::MIN, i16::MIN, 0);
    assert_eq!(dst_only, 0x7FFF);

    let op0_only = pack_word(i16::MIN, -1, i16::MIN, 0);
    assert_eq!(op0_only, 0x7FFF << OFF_OP0_SHIFT);

    let op1_only = pack_word(i16::MIN, i16::MIN, -1, 0);
    assert_eq!(op1_only, 0x7FFF << OFF_OP1_SHIFT);

    let flags_only = pack_word(i16::MIN, i16::MIN, i16::MIN, 0x7FFF);
    assert_eq!(flags_only, 0x7FFF << FLAGS_SHIFT);
}

#[test]
fn test_each_flag_lands_in_its_bit() {
    let bits = [
        (Flags { dst_reg: true, ..Flags::default() }, DST_REG_BIT),
        (Flags { op0_reg: true, ..Flags::default() }, OP0_REG_BIT),
        (Flags { op1_imm: true, ..Flags::default() }, OP1_IMM_BIT),
        (Flags { op1_fp: true, ..Flags::default() }, OP1_FP_BIT),
        (Flags { op1_ap: true, ..Flags::default() }, OP1_AP_BIT),
        (Flags { res_add: true, ..Flags::default() }, RES_ADD_BIT),
        (Flags { res_mul: true, ..Flags::default() }, RES_MUL_BIT),
        (Flags { pc_jump_abs: true, ..Flags::default() }, PC_JUMP_ABS_BIT),
        (Flags { pc_jump_rel: true, ..Flags::default() }, PC_JUMP_REL_BIT),
        (Flags { pc_jnz: true, ..Flags::default() }, PC_JNZ_BIT),
        (Flags { ap_add: true, ..Flags::default() }, AP_ADD_BIT),
        (Flags { ap_add1: true, ..Flags::default() }, AP_ADD1_BIT),
        (Flags { opcode_call: true, ..Flags::default() }, OPCODE_CALL_BIT),
        (Flags { opcode_ret: true, ..Flags::default() }, OPCODE_RET_BIT),
        (Flags { opcode_assert_eq: true, ..Flags::default() }, OPCODE_ASSERT_EQ_BIT),
    ];

    for (index, (flags, bit)) in bits.iter().enumerate() {
        assert_eq!(*bit as usize, index);
        assert_eq!(flags.to_bits(), 1u16 << *bit);
    }
}

#[test]
fn test_all_flags_stay_below_reserved_bit() {
    let all = Flags::from_bits(0xFFFF);
    assert_eq!(all.to_bits(), 0x7FFF);
    assert_eq!(all.to_bits() >> RESERVED_FLAG_BIT, 0);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn test_bias_is_xor(offset in any::<i16>()) {
        prop_assert_eq!(bias_offset(offset), (offset as u16) ^ 0x8000);
        prop_assert_eq!(unbias_offset(bias_offset(offset)), offset);
    }

    #[test]
    fn test_pack_extract_roundtrip(
        dst in any::<i16>(),
        op0 in any::<i16>(),
        op1 in any::<i16>(),
        flags in 0u16..0x8000,
    ) {
        let word = pack_word(dst, op0, op1, flags);
        prop_assert_eq!(extract_off_dst(word), dst);
        prop_assert_eq!(extract_off_op0(word), op0);
        prop_assert_eq!(extract_off_op1(word), op1);
        prop_assert_eq!(extract_flags(word), flags);
        prop_assert_eq!(word >> RESERVED_WORD_BIT, 0);
    }

    #[test]
    fn test_flags_bits_roundtrip(bits in 0u16..0x8000) {
        prop_assert_eq!(Flags::from_bits(bits).to_bits(), bits);
    }
}
