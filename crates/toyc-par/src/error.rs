//! Parse errors — `spec.md` §7 categories 2 (syntactic) and 3 (name
//! resolution). Both are fatal: the parser stops at the first one.

use thiserror::Error;
use toyc_lex::TokenKind;
use toyc_util::Span;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected:?}, found {actual:?} at {span}")]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        actual: TokenKind,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected:?}")]
    UnexpectedEof { expected: Vec<TokenKind> },

    #[error("use of undeclared variable '{name}' at {span}")]
    UndeclaredVariable { name: String, span: Span },

    #[error("call to undefined function '{name}' at {span}")]
    UndefinedFunction { name: String, span: Span },

    #[error("'return' is not legal in a non-returning block, at {span}")]
    ReturnOutsideReturningBlock { span: Span },

    #[error("block-expression at {span} must contain at least one 'return'")]
    MissingReturn { span: Span },

    #[error("lexical error: {0}")]
    Lex(#[from] toyc_lex::LexError),
}
