//! Lexical errors — category `Lex` in the compiler's unified error surface.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: u32 },

    #[error("line {line}: integer constant '{text}' is out of range 0..=32767")]
    IntegerOutOfRange { text: String, line: u32 },

    #[error("line {line}: identifier '{text}' cannot start with a digit")]
    IdentifierStartsWithDigit { text: String, line: u32 },

    #[error("line {line}: unrecognized character '{ch}'")]
    UnrecognizedCharacter { ch: char, line: u32 },
}

impl LexError {
    pub fn line(&self) -> u32 {
        match self {
            LexError::UnterminatedString { line } => *line,
            LexError::IntegerOutOfRange { line, .. } => *line,
            LexError::IdentifierStartsWithDigit { line, .. } => *line,
            LexError::UnrecognizedCharacter { line, .. } => *line,
        }
    }
}

pub type LexResult<T> = std::result::Result<T, LexError>;
