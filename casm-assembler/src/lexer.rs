//! # Lexer for CASM

use logos::Logos;
use std::fmt;

/// Tokens for CASM source
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")] // Statements end at `;`, not at newlines
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Registers
    #[token("ap")]
    Ap,

    #[token("fp")]
    Fp,

    // Keywords
    #[token("call")]
    Call,

    #[token("jmp")]
    Jmp,

    #[token("ret")]
    Ret,

    #[token("rel")]
    Rel,

    #[token("abs")]
    Abs,

    #[token("if")]
    If,

    /// Unsigned decimal number, kept as text so literals of any size survive lexing
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),

    /// Any other word; never valid, lexed so errors can name it
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("=")]
    Assign,

    #[token("+=")]
    PlusAssign,

    #[token("++")]
    Increment,

    #[token("!=")]
    NotEqual,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ap => write!(f, "`ap`"),
            Token::Fp => write!(f, "`fp`"),
            Token::Call => write!(f, "`call`"),
            Token::Jmp => write!(f, "`jmp`"),
            Token::Ret => write!(f, "`ret`"),
            Token::Rel => write!(f, "`rel`"),
            Token::Abs => write!(f, "`abs`"),
            Token::If => write!(f, "`if`"),
            Token::Number(n) => write!(f, "number `{}`", n),
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::LBracket => write!(f, "`[`"),
            Token::RBracket => write!(f, "`]`"),
            Token::Plus => write!(f, "`+`"),
            Token::Minus => write!(f, "`-`"),
            Token::Star => write!(f, "`*`"),
            Token::Assign => write!(f, "`=`"),
            Token::PlusAssign => write!(f, "`+=`"),
            Token::Increment => write!(f, "`++`"),
            Token::NotEqual => write!(f, "`!=`"),
            Token::Comma => write!(f, "`,`"),
            Token::Semicolon => write!(f, "`;`"),
        }
    }
}
