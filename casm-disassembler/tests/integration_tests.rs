//! Integration tests for the CASM disassembler
//!
//! Tests the complete disassembly workflow including:
//! - Decoding words produced by the assembler
//! - Formatting back to canonical CASM
//! - Error handling for invalid encodings

use casm_assembler::{assemble, assemble_instructions};
use casm_disassembler::{decode, decode_program, disassemble, disassemble_source, format, DisassemblerError};
use casm_spec::{Felt, Program};

const CANONICAL: &[&str] = &[
    "[ap] = [fp], ap++",
    "[fp + 1] = 5",
    "call rel [ap - 3]",
    "ret",
    "jmp rel [ap - 2] if [fp - 7] != 0",
    "ap += 150",
    "[ap + 1] = [[ap - 2] - 3]",
    "[fp - 10] = [ap + 2] * [ap - 3]",
    "call abs 123",
    "jmp abs [fp - 5] + [fp + 3]",
    "jmp abs 123, ap++",
    "jmp rel [ap + 1] + [fp - 7]",
    "jmp rel [[fp - 1] + 2] if [ap] != 0, ap++",
    "ap += [fp - 2] * 3",
    "[ap] = -1",
];

// ============================================================================
// Decode Tests
// ============================================================================

#[test]
fn test_decode_matches_translation() {
    for text in CANONICAL {
        let source = format!("{};", text);
        let expected = assemble_instructions(&source).unwrap().remove(0);
        let program = assemble(&source).unwrap();
        let word = program.code[0].to_u64().unwrap();

        assert_eq!(decode(word, program.code.get(1)).unwrap(), expected, "{}", text);
    }
}

#[test]
fn test_decode_program_positions() {
    let program = assemble("[fp + 1] = 5; ret; ap += 150; [ap] = [fp], ap++;").unwrap();
    let pcs: Vec<_> = decode_program(&program)
        .unwrap()
        .into_iter()
        .map(|(pc, _)| pc)
        .collect();
    assert_eq!(pcs, vec![0, 2, 3, 5]);
}

#[test]
fn test_decode_every_conflict() {
    // one conflicting pair per exclusive group
    let pairs = [(2, 3, "op1_src"), (5, 6, "res_logic"), (7, 9, "pc_update"), (10, 11, "ap_update"), (12, 14, "opcode")];
    for (a, b, group) in pairs {
        let word = ((1u64 << a) | (1u64 << b)) << 48;
        assert_eq!(
            decode(word, Some(&Felt::zero())),
            Err(DisassemblerError::ConflictingFlags { word, group })
        );
    }
}

// ============================================================================
// Format Tests
// ============================================================================

#[test]
fn test_format_canonical_text() {
    for text in CANONICAL {
        let instr = assemble_instructions(&format!("{};", text)).unwrap().remove(0);
        assert_eq!(format(&instr), *text);
    }
}

#[test]
fn test_format_normalises_spelling() {
    let instr = assemble_instructions("[ap+0]=[fp-0]+-3,ap++;").unwrap().remove(0);
    assert_eq!(format(&instr), "[ap] = [fp] + -3, ap++");
}

#[test]
fn test_source_reassembles() {
    let source = CANONICAL
        .iter()
        .map(|text| format!("{};\n", text))
        .collect::<String>();
    let program = assemble(&source).unwrap();

    assert_eq!(disassemble_source(&program).unwrap(), source);
    assert_eq!(assemble(&disassemble_source(&program).unwrap()).unwrap(), program);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_listing() {
    let program = assemble("call abs 123; ret;").unwrap();
    let listing = disassemble(&program);

    assert!(listing.starts_with("// CASM Disassembly\n// 3 words (2 instructions)\n"));
    assert!(listing.contains("0000:  1084800180018000  call abs 123;  // imm 0x7b"));
    assert!(listing.contains("0002:  208b7fff7fff7ffe  ret;"));
}

#[test]
fn test_listing_from_bytes() {
    let program = assemble("[ap] = [fp - 3] + 7, ap++;").unwrap();
    let restored = Program::from_bytes(&program.to_bytes()).unwrap();
    assert_eq!(disassemble(&restored), disassemble(&program));
}

#[test]
fn test_truncated_program() {
    let mut program = assemble("ret; call abs 5;").unwrap();
    program.code.pop();

    assert!(matches!(
        decode_program(&program),
        Err(DisassemblerError::AtPc { pc: 1, .. })
    ));
    assert!(disassemble(&program).contains("0001:  1084800180018000  // ERROR"));
}
