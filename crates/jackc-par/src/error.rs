//! The unified compile-time error surface (spec §6/§7): every failure the
//! parser can raise, tagged with its category (`Lex`, `Parse`, or `Symbol`)
//! so a caller can branch on the kind of problem without string-matching a
//! message.

use jackc_lex::LexError;
use jackc_sym::SymbolError;
use thiserror::Error;

/// The three failure categories named in the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Parse,
    Symbol,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token mismatch: the parser expected one spelling or category and
    /// found another.
    #[error("line {line}: expected {expected}, found {found}")]
    Parse {
        expected: String,
        found: String,
        line: u32,
    },

    /// Input ended where the grammar still expected something.
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, line: u32 },

    /// A duplicate `define` in one scope.
    #[error("line {line}: {source}")]
    Symbol {
        #[source]
        source: SymbolError,
        line: u32,
    },

    /// An identifier used as a variable (in `let`, or as a bare/array term)
    /// that no scope defines.
    #[error("line {line}: '{name}' is not defined")]
    UndefinedVariable { name: String, line: u32 },
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::Lex(_) => ErrorCategory::Lex,
            CompileError::Parse { .. } | CompileError::UnexpectedEof { .. } => ErrorCategory::Parse,
            CompileError::Symbol { .. } | CompileError::UndefinedVariable { .. } => {
                ErrorCategory::Symbol
            }
        }
    }

    /// The source line the failure was detected on, for user-facing
    /// reporting.
    pub fn line(&self) -> u32 {
        match self {
            CompileError::Lex(e) => e.line(),
            CompileError::Parse { line, .. } => *line,
            CompileError::UnexpectedEof { line, .. } => *line,
            CompileError::Symbol { line, .. } => *line,
            CompileError::UndefinedVariable { line, .. } => *line,
        }
    }
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;
