//! CASM statement parser
//!
//! Grammar (whitespace-insensitive, every statement ends with `;`):
//!
//! ```text
//! statement  := operand "=" expression [", ap++"]
//!             | "call" mode operand
//!             | "jmp" mode expression ["if" operand "!=" "0"] [", ap++"]
//!             | "ap" "+=" expression
//!             | "ret"
//! mode       := "abs" | "rel"
//! expression := operand [("+" | "*") operand]
//! operand    := "[" reg [offset] "]"
//!             | "[" "[" reg [offset] "]" [offset] "]"
//!             | ["-"] number
//! offset     := ("+" | "-") number
//! ```

use crate::ast::{BinaryOp, Expression, JumpMode, Operand, Position, Statement, StatementKind};
use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use casm_spec::Register;
use logos::{Logos, Span};
use num_bigint::BigInt;
use num_traits::Zero;
use std::str::FromStr;

type Lexeme = (std::result::Result<Token, ()>, Span);

/// Lazy sequence of parsed statements.
///
/// After a failed statement the iterator skips past the next `;`, so the
/// following statements parse as if the failure never happened. Cloning
/// the iterator restarts parsing from the clone's position.
#[derive(Clone)]
pub struct Statements<'a> {
    source: &'a str,
    lexer: logos::Lexer<'a, Token>,
    peeked: Option<Option<Lexeme>>,
    /// Whether the last consumed token ended a statement
    at_boundary: bool,
}

/// Parse `source` statement by statement
pub fn parse_statements(source: &str) -> Statements<'_> {
    Statements {
        source,
        lexer: Token::lexer(source),
        peeked: None,
        at_boundary: true,
    }
}

/// Parse exactly one statement
pub fn parse_statement(source: &str) -> Result<Statement> {
    let mut statements = parse_statements(source);
    let statement = match statements.next() {
        Some(result) => result?,
        None => {
            return Err(AssemblerError::syntax(
                Position::of_offset(source, source.len()),
                "expected a statement, found end of input",
            ))
        }
    };

    if let Some((token, span)) = statements.bump() {
        return Err(AssemblerError::syntax(
            statements.locate(span.start),
            format!("unexpected {} after the statement", describe(&token)),
        ));
    }
    Ok(statement)
}

/// Parse a whole program, stopping at the first error
pub fn parse_program(source: &str) -> Result<Vec<Statement>> {
    parse_statements(source).collect()
}

fn describe(token: &std::result::Result<Token, ()>) -> String {
    match token {
        Ok(token) => token.to_string(),
        Err(()) => "character".to_string(),
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        self.peek()?;
        let result = self.statement();
        if result.is_err() {
            self.recover();
        }
        Some(result)
    }
}

impl<'a> Statements<'a> {
    // ========== Token Stream ==========

    fn peek(&mut self) -> Option<&Lexeme> {
        if self.peeked.is_none() {
            let next = self.lexer.next().map(|token| (token, self.lexer.span()));
            self.peeked = Some(next);
        }
        self.peeked.as_ref().and_then(|lexeme| lexeme.as_ref())
    }

    fn peek_is(&mut self, expected: &Token) -> bool {
        matches!(self.peek(), Some((Ok(token), _)) if token == expected)
    }

    fn bump(&mut self) -> Option<Lexeme> {
        let lexeme = match self.peeked.take() {
            Some(lexeme) => lexeme,
            None => self.lexer.next().map(|token| (token, self.lexer.span())),
        };
        if let Some((token, _)) = &lexeme {
            self.at_boundary = matches!(token, Ok(Token::Semicolon));
        }
        lexeme
    }

    fn locate(&self, offset: usize) -> Position {
        Position::of_offset(self.source, offset)
    }

    fn unexpected(&self, lexeme: Option<Lexeme>, expected: &str) -> AssemblerError {
        match lexeme {
            Some((Err(()), span)) => AssemblerError::syntax(
                self.locate(span.start),
                format!("unexpected character `{}`", &self.source[span]),
            ),
            Some((Ok(token), span)) => AssemblerError::syntax(
                self.locate(span.start),
                format!("expected {}, found {}", expected, token),
            ),
            None => AssemblerError::syntax(
                self.locate(self.source.len()),
                format!("expected {}, found end of input", expected),
            ),
        }
    }

    /// Consume the next token, failing on end of input or a bad character
    fn next_token(&mut self, expected: &str) -> Result<(Token, Span)> {
        match self.bump() {
            Some((Ok(token), span)) => Ok((token, span)),
            other => Err(self.unexpected(other, expected)),
        }
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<Span> {
        match self.bump() {
            Some((Ok(token), span)) if token == expected => Ok(span),
            other => Err(self.unexpected(other, description)),
        }
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_is(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Skip to just after the next `;`
    fn recover(&mut self) {
        let mut skipped = 0usize;
        while !self.at_boundary {
            if self.bump().is_none() {
                break;
            }
            skipped += 1;
        }
        tracing::trace!(skipped, "resynchronised after statement error");
    }

    // ========== Statements ==========

    fn statement(&mut self) -> Result<Statement> {
        let (token, span) = self.next_token("a statement")?;
        let position = self.locate(span.start);

        let kind = match token {
            Token::Ret => self.ret()?,
            Token::Call => {
                let mode = self.jump_mode()?;
                let target = self.operand()?;
                StatementKind::Call { mode, target }
            }
            Token::Jmp => self.jump()?,
            Token::Ap => {
                self.expect(Token::PlusAssign, "`+=`")?;
                let value = self.expression()?;
                StatementKind::AddAp { value }
            }
            Token::LBracket | Token::Number(_) | Token::Minus => {
                let dst = self.operand_from(token, span)?;
                self.expect(Token::Assign, "`=`")?;
                let value = self.expression()?;
                let ap_incr = self.ap_incr()?;
                StatementKind::AssertEq {
                    dst,
                    value,
                    ap_incr,
                }
            }
            other => return Err(self.unexpected(Some((Ok(other), span)), "a statement")),
        };

        self.expect(Token::Semicolon, "`;`")?;
        Ok(Statement { kind, position })
    }

    fn ret(&mut self) -> Result<StatementKind> {
        let start = match self.peek() {
            Some((Ok(Token::Semicolon), _)) | None => return Ok(StatementKind::Ret),
            Some((_, span)) => span.start,
        };
        Err(AssemblerError::semantic(
            self.locate(start),
            "`ret` takes no operands",
        ))
    }

    fn jump(&mut self) -> Result<StatementKind> {
        let mode = self.jump_mode()?;
        let target = self.expression()?;

        if self.eat(&Token::If) {
            let condition = self.operand()?;
            self.expect(Token::NotEqual, "`!=`")?;
            self.zero()?;
            let ap_incr = self.ap_incr()?;
            return Ok(StatementKind::JumpNz {
                mode,
                target,
                condition,
                ap_incr,
            });
        }

        let ap_incr = self.ap_incr()?;
        Ok(StatementKind::Jump {
            mode,
            target,
            ap_incr,
        })
    }

    fn jump_mode(&mut self) -> Result<JumpMode> {
        match self.bump() {
            Some((Ok(Token::Abs), _)) => Ok(JumpMode::Abs),
            Some((Ok(Token::Rel), _)) => Ok(JumpMode::Rel),
            other => Err(self.unexpected(other, "`abs` or `rel`")),
        }
    }

    /// The literal `0` closing `if cond != 0`
    fn zero(&mut self) -> Result<()> {
        match self.bump() {
            Some((Ok(Token::Number(digits)), span)) => {
                if self.number(&digits, &span)?.is_zero() {
                    Ok(())
                } else {
                    Err(AssemblerError::syntax(
                        self.locate(span.start),
                        format!("conditional jumps compare against `0`, found `{}`", digits),
                    ))
                }
            }
            other => Err(self.unexpected(other, "`0`")),
        }
    }

    /// Optional `, ap++` suffix
    fn ap_incr(&mut self) -> Result<bool> {
        if !self.eat(&Token::Comma) {
            return Ok(false);
        }
        self.expect(Token::Ap, "`ap`")?;
        self.expect(Token::Increment, "`++`")?;
        Ok(true)
    }

    // ========== Expressions and Operands ==========

    fn expression(&mut self) -> Result<Expression> {
        let lhs = self.operand()?;

        let op = if self.eat(&Token::Plus) {
            BinaryOp::Add
        } else if self.eat(&Token::Star) {
            BinaryOp::Mul
        } else {
            return Ok(Expression::Operand(lhs));
        };

        let rhs = self.operand()?;

        let extra = match self.peek() {
            Some((Ok(Token::Plus | Token::Star), span)) => Some(span.start),
            _ => None,
        };
        if let Some(start) = extra {
            let position = self.locate(start);
            self.bump();
            return Err(AssemblerError::syntax(
                position,
                "only one `+` or `*` is allowed per instruction",
            ));
        }

        Ok(Expression::Binary { op, lhs, rhs })
    }

    fn operand(&mut self) -> Result<Operand> {
        let (token, span) = self.next_token("an operand")?;
        self.operand_from(token, span)
    }

    fn operand_from(&mut self, token: Token, span: Span) -> Result<Operand> {
        match token {
            Token::LBracket => self.deref_body(),
            Token::Number(digits) => Ok(Operand::Immediate(self.number(&digits, &span)?)),
            Token::Minus => {
                let (digits, span) = self.number_token()?;
                Ok(Operand::Immediate(-self.number(&digits, &span)?))
            }
            Token::Ap | Token::Fp => Err(AssemblerError::syntax(
                self.locate(span.start),
                format!("register {} must be dereferenced, as in `[{}]`", token, &self.source[span]),
            )),
            other => Err(self.unexpected(Some((Ok(other), span)), "an operand")),
        }
    }

    /// Everything after the opening `[` of a dereference
    fn deref_body(&mut self) -> Result<Operand> {
        let (token, span) = self.next_token("`ap`, `fp` or `[`")?;

        if token == Token::LBracket {
            let register = self.register()?;
            let inner = self.offset()?;
            self.expect(Token::RBracket, "`]`")?;
            let outer = self.offset()?;
            self.expect(Token::RBracket, "`]`")?;
            return Ok(Operand::DoubleDeref {
                register,
                inner,
                outer,
            });
        }

        let register = self.register_from(token, span)?;
        let offset = self.offset()?;
        self.expect(Token::RBracket, "`]`")?;
        Ok(Operand::Deref { register, offset })
    }

    fn register(&mut self) -> Result<Register> {
        let (token, span) = self.next_token("`ap` or `fp`")?;
        self.register_from(token, span)
    }

    fn register_from(&mut self, token: Token, span: Span) -> Result<Register> {
        match token {
            Token::Ap => Ok(Register::Ap),
            Token::Fp => Ok(Register::Fp),
            other => Err(self.unexpected(Some((Ok(other), span)), "`ap` or `fp`")),
        }
    }

    /// Optional `+ n` / `- n`, defaulting to zero
    fn offset(&mut self) -> Result<BigInt> {
        let negative = if self.eat(&Token::Plus) {
            false
        } else if self.eat(&Token::Minus) {
            true
        } else {
            return Ok(BigInt::zero());
        };

        let (digits, span) = self.number_token()?;
        let value = self.number(&digits, &span)?;
        Ok(if negative { -value } else { value })
    }

    fn number_token(&mut self) -> Result<(String, Span)> {
        match self.bump() {
            Some((Ok(Token::Number(digits)), span)) => Ok((digits, span)),
            other => Err(self.unexpected(other, "a number")),
        }
    }

    fn number(&self, digits: &str, span: &Span) -> Result<BigInt> {
        BigInt::from_str(digits).map_err(|_| {
            AssemblerError::syntax(
                self.locate(span.start),
                format!("invalid number `{}`", digits),
            )
        })
    }
}
