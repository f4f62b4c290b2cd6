//! jackc-lex — Lexical Analysis for Jack
//!
//! Converts Jack source text into a flat stream of [`Token`]s. This crate
//! owns exactly two things: the character-to-token conversion ([`Lexer`])
//! and the bounded view the parser drives over the resulting token vector
//! ([`TokenCursor`]). It has no knowledge of Jack's grammar beyond the
//! lexical rules — keywords, symbols, integer and string literals, and
//! comment stripping.
//!
//! Tokenization is all-or-nothing: [`Lexer::tokenize`] returns the complete
//! token vector or the first [`LexError`] encountered. There is no recovery
//! inside the lexer; recovery, where it exists at all, lives one layer up in
//! the parser's single speculative-match point.

mod cursor;
mod error;
mod lexer;
mod token;
mod token_cursor;

pub use error::{LexError, LexResult};
pub use lexer::Lexer;
pub use token::{Keyword, Symbol, Token, TokenKind};
pub use token_cursor::TokenCursor;
