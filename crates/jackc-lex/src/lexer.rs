//! The Jack lexer.
//!
//! Converts source text into a flat `Vec<Token>`, stripping whitespace and
//! both comment forms along the way. Tokenization either succeeds completely
//! or stops at the first [`LexError`] — there is no partial token stream on
//! failure.

use crate::cursor::Cursor;
use crate::error::{LexError, LexResult};
use crate::token::{Keyword, Symbol, Token, TokenKind};

const MAX_INT_CONSTANT: u32 = 32767;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenizes an entire source file.
    pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Produces the next token, or `None` at end of input. Skips whitespace
    /// and comments before looking at the next real character.
    fn next_token(&mut self) -> LexResult<Option<Token>> {
        self.skip_trivia()?;
        if self.cursor.is_at_end() {
            return Ok(None);
        }

        let line = self.cursor.line();
        let ch = self.cursor.current();

        let kind = if ch == '"' {
            self.lex_string()?
        } else if ch.is_ascii_digit() {
            self.lex_integer(line)?
        } else if is_identifier_start(ch) {
            self.lex_word()
        } else if let Some(sym) = Symbol::from_char(ch) {
            self.cursor.advance();
            TokenKind::Symbol(sym)
        } else {
            self.cursor.advance();
            return Err(LexError::UnrecognizedCharacter { ch, line });
        };

        Ok(Some(Token::new(kind, line)))
    }

    /// Skips whitespace, `//` line comments, and `/* ... */` (including
    /// `/** ... */`) block comments. Block comments do not nest: the first
    /// `*/` closes them.
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            match self.cursor.current() {
                c if c.is_whitespace() => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
                        self.cursor.advance();
                    }
                }
                '/' if self.cursor.peek(1) == '*' => {
                    self.cursor.eat('/');
                    self.cursor.eat('*');
                    loop {
                        if self.cursor.is_at_end() {
                            break;
                        }
                        if self.cursor.current() == '*' && self.cursor.peek(1) == '/' {
                            self.cursor.eat('*');
                            self.cursor.eat('/');
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// A string literal: `"` up to the next unescaped `"`. Jack strings have
    /// no escape sequences, so the first closing quote always terminates the
    /// literal; interior whitespace is part of the content.
    fn lex_string(&mut self) -> LexResult<TokenKind> {
        let start_line = self.cursor.line();
        self.cursor.eat('"'); // opening quote
        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() || self.cursor.current() == '\n' {
                return Err(LexError::UnterminatedString { line: start_line });
            }
            if self.cursor.eat('"') {
                return Ok(TokenKind::StringConstant(content));
            }
            content.push(self.cursor.advance());
        }
    }

    /// An integer constant: one or more digits, optionally immediately
    /// followed by identifier characters, which is a lex error (`1abc`).
    fn lex_integer(&mut self, line: u32) -> LexResult<TokenKind> {
        let mut text = String::new();
        while self.cursor.current().is_ascii_digit() {
            text.push(self.cursor.advance());
        }
        if is_identifier_continue(self.cursor.current()) {
            while is_identifier_continue(self.cursor.current()) {
                text.push(self.cursor.advance());
            }
            return Err(LexError::IdentifierStartsWithDigit { text, line });
        }
        match text.parse::<u32>() {
            Ok(value) if value <= MAX_INT_CONSTANT => Ok(TokenKind::IntegerConstant(value as u16)),
            _ => Err(LexError::IntegerOutOfRange { text, line }),
        }
    }

    /// A keyword or identifier: a maximal run of identifier characters,
    /// classified against the keyword table afterward.
    fn lex_word(&mut self) -> TokenKind {
        let mut text = String::new();
        while is_identifier_continue(self.cursor.current()) {
            text.push(self.cursor.advance());
        }
        match Keyword::from_str(&text) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(text),
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn splits_symbols_adjacent_to_words() {
        let kinds = kinds("if(a=true)");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::If),
                TokenKind::Symbol(Symbol::LParen),
                TokenKind::Identifier("a".into()),
                TokenKind::Symbol(Symbol::Eq),
                TokenKind::Keyword(Keyword::True),
                TokenKind::Symbol(Symbol::RParen),
            ]
        );
    }

    #[test]
    fn strips_line_comments() {
        let kinds = kinds("let x = 1; // trailing comment\nlet y = 2;");
        assert_eq!(kinds.len(), 10);
    }

    #[test]
    fn strips_block_and_doc_comments_across_lines() {
        let src = "/** doc\n * comment\n */\nclass Main {}";
        let kinds = kinds(src);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Class),
                TokenKind::Identifier("Main".into()),
                TokenKind::Symbol(Symbol::LBrace),
                TokenKind::Symbol(Symbol::RBrace),
            ]
        );
    }

    #[test]
    fn preserves_spaces_inside_string_literals() {
        let kinds = kinds("\"hello world\"");
        assert_eq!(
            kinds,
            vec![TokenKind::StringConstant("hello world".into())]
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Lexer::tokenize("\"unterminated").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { line: 1 }));
    }

    #[test]
    fn integer_out_of_range_is_an_error() {
        let err = Lexer::tokenize("32768").unwrap_err();
        assert!(matches!(err, LexError::IntegerOutOfRange { .. }));
    }

    #[test]
    fn integer_max_value_is_accepted() {
        assert_eq!(kinds("32767"), vec![TokenKind::IntegerConstant(32767)]);
    }

    #[test]
    fn digit_leading_identifier_is_an_error() {
        let err = Lexer::tokenize("1abc").unwrap_err();
        assert!(matches!(err, LexError::IdentifierStartsWithDigit { .. }));
    }

    #[test]
    fn unrecognized_character_is_an_error() {
        let err = Lexer::tokenize("let x = 1 @ 2;").unwrap_err();
        assert!(matches!(err, LexError::UnrecognizedCharacter { ch: '@', .. }));
    }

    #[test]
    fn line_numbers_advance_across_newlines() {
        let tokens = Lexer::tokenize("let x;\nlet y;").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens.last().unwrap().line, 2);
    }
}
