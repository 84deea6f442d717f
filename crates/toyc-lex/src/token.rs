//! Token kinds.
//!
//! One variant per terminal in `spec.md` §3/§6's grammar, plus `Error` for a
//! token the lexer could not classify (kept as a variant rather than only a
//! `Result::Err` so callers that want to recover a partial token stream can
//! still do so; the parser, however, always treats an `Error` token the same
//! as a hard lex failure and aborts — see `spec.md` §7).

use toyc_util::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Exit,
    Int,
    Eos,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Star,
    Percent,
    Plus,
    Minus,
    Eq,
    Lt,
    Gt,
    Assign,
    Ident,
    For,
    If,
    Else,
    Let,
    Define,
    While,
    Return,
    Error,
}

impl TokenKind {
    /// Maps an exact keyword lexeme to its `TokenKind`. Returns `None` for
    /// anything that is not one of the eight reserved words in `spec.md`
    /// §4.1's keyword table.
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        Some(match lexeme {
            "exit" => TokenKind::Exit,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "let" => TokenKind::Let,
            "define" => TokenKind::Define,
            "return" => TokenKind::Return,
            _ => return None,
        })
    }
}

/// A token: its kind, an optional lexeme (present for `Int` and `Ident`,
/// carried for `Error` so the diagnostic can quote the offending text), and
/// the source span it was scanned from.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<Symbol>,
    pub span: toyc_util::Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: Option<Symbol>, span: toyc_util::Span) -> Self {
        Self { kind, lexeme, span }
    }
}
