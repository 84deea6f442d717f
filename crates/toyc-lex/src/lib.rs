//! toyc-lex — the lexer for the toyc language.
//!
//! Converts source text into a flat [`Token`] stream. See [`lexer`] for the
//! scanning algorithm and `spec.md` §4.1 for the specified behavior it
//! implements.

pub mod cursor;
pub mod error;
pub mod lexer;
pub mod token;

pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use toyc_util::Interner;

    fn tokenize(src: &str) -> Result<Vec<TokenKind>, LexError> {
        let mut interner = Interner::new();
        Lexer::new(src, &mut interner)
            .tokenize()
            .map(|toks| toks.into_iter().map(|t| t.kind).collect())
    }

    proptest! {
        /// Lexing is a pure function of its input: running it twice on the
        /// same source produces the same token kinds (or the same failure).
        #[test]
        fn lexing_is_deterministic(src in "[a-zA-Z0-9_;(){}*%+<>=/\\n \t-]{0,64}") {
            let first = tokenize(&src);
            let second = tokenize(&src);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                _ => prop_assert!(false, "tokenizing the same source diverged"),
            }
        }
    }
}
