//! A bounded, random-access view over a token vector.
//!
//! `TokenCursor` is the component the parser drives directly. It never owns
//! the token stream; it only tracks a position into it. It supports a single
//! saved position (`mark`/`rewind`), which is all the parser ever needs: one
//! speculative lookahead at the term/subroutine-call disambiguation point.

use crate::token::Token;

pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
    mark: Option<usize>,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            mark: None,
        }
    }

    /// The token at the cursor, without advancing. `None` past the end.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// The token `offset` positions ahead of the cursor (`offset == 0` is
    /// [`peek`](Self::peek)).
    pub fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + offset)
    }

    /// Returns the current token and advances past it. `None` past the end
    /// (the cursor does not move further).
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Whether any tokens remain under the cursor.
    pub fn more(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Saves the current position. Overwrites any previously saved mark —
    /// the cursor supports exactly one level of speculation, never nested.
    pub fn mark(&mut self) {
        self.mark = Some(self.position);
    }

    /// Restores the position saved by the most recent [`mark`](Self::mark).
    /// A no-op if no mark is set.
    pub fn rewind(&mut self) {
        if let Some(mark) = self.mark.take() {
            self.position = mark;
        }
    }

    /// Discards a pending mark without rewinding — the speculative
    /// alternative succeeded, so there is nothing to roll back to.
    pub fn commit(&mut self) {
        self.mark = None;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The line of the token under the cursor, or the last token's line if
    /// the cursor is past the end of input, so an end-of-input error still
    /// has a useful line number to report.
    pub fn line(&self) -> u32 {
        self.peek()
            .map(|t| t.line)
            .unwrap_or_else(|| self.tokens.last().map(|t| t.line).unwrap_or(1))
    }
}
