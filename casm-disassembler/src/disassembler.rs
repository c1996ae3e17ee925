//! Main disassembler logic

use crate::decoder::{decode_at, decode_program};
use crate::error::Result;
use crate::formatter::format;
use casm_spec::Program;

/// Disassemble a program into an annotated listing.
///
/// Each line holds the pc, the instruction word in hex and its CASM text.
/// An element that fails to decode is listed as an error and skipped.
pub fn disassemble(program: &Program) -> String {
    let mut output = String::new();
    let mut lines = Vec::new();
    let mut count = 0;
    let mut pc = 0;

    while pc < program.len() {
        let element = &program.code[pc];
        match decode_at(program, pc) {
            Ok(instr) => {
                let mut line = format!("{:04}:  {:016x}  {};", pc, element, format(&instr));
                if let Some(imm) = &instr.imm {
                    line.push_str(&format!("  // imm {:#x}", imm));
                }
                lines.push(line);
                count += 1;
                pc += instr.size();
            }
            Err(e) => {
                lines.push(format!("{:04}:  {:016x}  // ERROR: {}", pc, element, e));
                pc += 1;
            }
        }
    }

    output.push_str("// CASM Disassembly\n");
    output.push_str(&format!(
        "// {} words ({} instructions)\n",
        program.len(),
        count
    ));
    output.push('\n');
    for line in lines {
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Render a program as CASM source, one statement per line.
///
/// Fails on the first element that does not decode. Records with no CASM
/// spelling appear as `<raw ...>` and will not reassemble.
pub fn disassemble_source(program: &Program) -> Result<String> {
    let mut source = String::new();
    for (_, instr) in decode_program(program)? {
        source.push_str(&format(&instr));
        source.push_str(";\n");
    }
    Ok(source)
}
