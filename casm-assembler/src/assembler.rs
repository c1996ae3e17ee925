//! Main assembler logic

use crate::config::{Config, ErrorMode};
use crate::encoder::{emit, encode};
use crate::error::{AssemblerError, Result};
use crate::parser::parse_statements;
use crate::translator::translate;
use casm_spec::{Instruction, Program};

/// Assembler driven by a [`Config`]
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: Config,
}

impl Assembler {
    /// Create an assembler, rejecting an invalid configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and translate every statement of `source`.
    ///
    /// In fail-fast mode the first error is returned as is. In collect-all
    /// mode every failing statement is reported inside
    /// [`AssemblerError::Multiple`], up to the configured limit.
    pub fn translate_source(&self, source: &str) -> Result<Vec<Instruction>> {
        let mut instructions = Vec::new();
        let mut errors = Vec::new();

        for parsed in parse_statements(source) {
            let result = parsed.and_then(|statement| {
                let instr = translate(&statement)?;
                tracing::debug!(
                    position = %statement.position,
                    statement = %statement,
                    word = encode(&instr),
                    "translated statement"
                );
                Ok(instr)
            });

            match (result, self.config.error_mode) {
                (Ok(instr), _) => instructions.push(instr),
                (Err(err), ErrorMode::FailFast) => return Err(err),
                (Err(err), ErrorMode::CollectAll) => {
                    tracing::warn!(error = %err, "statement failed to assemble");
                    errors.push(err);
                    if errors.len() >= self.config.error_limit {
                        tracing::warn!(limit = self.config.error_limit, "error limit reached");
                        break;
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(AssemblerError::Multiple(errors));
        }
        Ok(instructions)
    }

    /// Assemble source code into a program
    pub fn assemble(&self, source: &str) -> Result<Program> {
        let instructions = self.translate_source(source)?;

        let mut code = Vec::with_capacity(instructions.iter().map(Instruction::size).sum());
        for instr in &instructions {
            emit(instr, &mut code);
        }

        tracing::debug!(
            instructions = instructions.len(),
            words = code.len(),
            "assembled program"
        );
        Ok(Program::new(code))
    }
}

/// Assemble source code into a program, stopping at the first error
pub fn assemble(source: &str) -> Result<Program> {
    Assembler::default().assemble(source)
}

/// Translate source code into instruction records, stopping at the first error
pub fn assemble_instructions(source: &str) -> Result<Vec<Instruction>> {
    Assembler::default().translate_source(source)
}
