//! The lexer proper — `spec.md` §4.1.
//!
//! Scanning is single-pass with a running "accumulator" buffer. Whitespace
//! and `;` flush the accumulator (classifying it as a keyword, an `Int`, or
//! an `Ident`); `;` additionally emits an `Eos` token. Every punctuation
//! operator character flushes the accumulator first, then emits its own
//! token. `=` needs one character of lookahead to distinguish `==` from `=`.
//! A `/>` digraph starts a line comment running to (not including) the next
//! newline.

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{Token, TokenKind};
use toyc_util::{Interner, Span};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: &'a mut Interner,
    tokens: Vec<Token>,
    /// The accumulator and the position/line/column it started at.
    accumulator: String,
    accumulator_start: Option<(usize, u32, u32)>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner) -> Self {
        Self {
            cursor: Cursor::new(source),
            interner,
            tokens: Vec::new(),
            accumulator: String::new(),
            accumulator_start: None,
        }
    }

    /// Runs the lexer to completion, returning the ordered token stream or
    /// the first lexical error encountered.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while !self.cursor.is_at_end() {
            let c = self.cursor.current();
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.flush_accumulator()?;
                    self.cursor.advance();
                }
                ';' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Eos);
                }
                '(' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::LParen);
                }
                ')' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::RParen);
                }
                '{' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::LBrace);
                }
                '}' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::RBrace);
                }
                '*' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Star);
                }
                '%' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Percent);
                }
                '+' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Plus);
                }
                '-' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Minus);
                }
                '<' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Lt);
                }
                '>' => {
                    self.flush_accumulator()?;
                    self.emit_single(TokenKind::Gt);
                }
                '=' => {
                    self.flush_accumulator()?;
                    if self.cursor.peek_next() == '=' {
                        self.emit_double(TokenKind::Eq);
                    } else {
                        self.emit_single(TokenKind::Assign);
                    }
                }
                '/' if self.cursor.peek_next() == '>' => {
                    self.flush_accumulator()?;
                    self.skip_line_comment();
                }
                c if is_ident_continue(c) => {
                    if self.accumulator.is_empty() {
                        self.accumulator_start =
                            Some((self.cursor.position(), self.cursor.line(), self.cursor.column()));
                    }
                    self.accumulator.push(c);
                    self.cursor.advance();
                }
                other => {
                    let span = Span::point(self.cursor.line(), self.cursor.column());
                    return Err(LexError::UnknownChar { ch: other, span });
                }
            }
        }
        self.flush_accumulator()?;
        Ok(self.tokens)
    }

    fn emit_single(&mut self, kind: TokenKind) {
        let span = Span::new(
            self.cursor.position(),
            self.cursor.position() + 1,
            self.cursor.line(),
            self.cursor.column(),
        );
        self.cursor.advance();
        self.tokens.push(Token::new(kind, None, span));
    }

    fn emit_double(&mut self, kind: TokenKind) {
        let span = Span::new(
            self.cursor.position(),
            self.cursor.position() + 2,
            self.cursor.line(),
            self.cursor.column(),
        );
        self.cursor.advance();
        self.cursor.advance();
        self.tokens.push(Token::new(kind, None, span));
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
            self.cursor.advance();
        }
    }

    /// Classifies and emits the accumulator, then clears it. A no-op when
    /// the accumulator is empty (e.g. consecutive whitespace).
    fn flush_accumulator(&mut self) -> Result<(), LexError> {
        if self.accumulator.is_empty() {
            return Ok(());
        }
        let (start, line, column) = self.accumulator_start.take().unwrap();
        let end = start + self.accumulator.len();
        let span = Span::new(start, end, line, column);
        let text = std::mem::take(&mut self.accumulator);

        if let Some(kind) = TokenKind::keyword(&text) {
            self.tokens.push(Token::new(kind, None, span));
        } else if text.bytes().all(|b| b.is_ascii_digit()) {
            let sym = self.interner.intern(&text);
            self.tokens.push(Token::new(TokenKind::Int, Some(sym), span));
        } else if text.as_bytes()[0].is_ascii_digit() {
            return Err(LexError::MalformedInteger { lexeme: text, span });
        } else {
            let sym = self.interner.intern(&text);
            self.tokens.push(Token::new(TokenKind::Ident, Some(sym), span));
        }
        Ok(())
    }
}

/// A character that may continue (or, for letters/underscore, start) an
/// identifier or integer lexeme: ASCII letters, digits, and underscore.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        Lexer::new(src, &mut interner)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn token_boundary_semicolons() {
        assert_eq!(
            kinds("; ; ;"),
            vec![TokenKind::Eos, TokenKind::Eos, TokenKind::Eos]
        );
    }

    #[test]
    fn token_boundary_ident_eos_ident() {
        assert_eq!(
            kinds("a;b"),
            vec![TokenKind::Ident, TokenKind::Eos, TokenKind::Ident]
        );
    }

    #[test]
    fn keyword_vs_identifier() {
        assert_eq!(kinds("exits"), vec![TokenKind::Ident]);
        assert_eq!(kinds("exit"), vec![TokenKind::Exit]);
    }

    #[test]
    fn equality_vs_assignment() {
        assert_eq!(
            kinds("a==b"),
            vec![TokenKind::Ident, TokenKind::Eq, TokenKind::Ident]
        );
        assert_eq!(
            kinds("a=b"),
            vec![TokenKind::Ident, TokenKind::Assign, TokenKind::Ident]
        );
    }

    #[test]
    fn line_comment_runs_to_newline() {
        assert_eq!(
            kinds("let /> comment\nx"),
            vec![TokenKind::Let, TokenKind::Ident]
        );
    }

    #[test]
    fn malformed_integer_is_an_error() {
        let mut interner = Interner::new();
        let err = Lexer::new("123abc", &mut interner).tokenize().unwrap_err();
        assert!(matches!(err, LexError::MalformedInteger { .. }));
    }

    #[test]
    fn unknown_character_is_an_error() {
        let mut interner = Interner::new();
        let err = Lexer::new("a $ b", &mut interner).tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnknownChar { ch: '$', .. }));
    }

    #[test]
    fn full_keyword_table() {
        assert_eq!(
            kinds("exit if else for while let define return"),
            vec![
                TokenKind::Exit,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::For,
                TokenKind::While,
                TokenKind::Let,
                TokenKind::Define,
                TokenKind::Return,
            ]
        );
    }

    #[test]
    fn trailing_accumulator_with_no_terminator_is_flushed() {
        assert_eq!(kinds("foo"), vec![TokenKind::Ident]);
        assert_eq!(kinds("42"), vec![TokenKind::Int]);
    }
}
