//! Symbol-table errors — category `Symbol` in the compiler's unified error
//! surface.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// `define` was called with a name already present in the same scope.
    #[error("'{name}' is already defined in this scope")]
    AlreadyDefined { name: String },
}

pub type SymbolResult<T> = std::result::Result<T, SymbolError>;
