//! Code generation errors — `spec.md` §7 category 5 (internal). The
//! generator never rejects a well-formed `Program`; this variant exists
//! only for a case the parser should have made unreachable.

use thiserror::Error;
use toyc_lex::TokenKind;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("internal: unsupported binary operator {0:?} reached code generation — the parser should never build a BinaryOp with this kind")]
    UnsupportedOperator(TokenKind),
}
