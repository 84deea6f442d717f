//! Function-definition parsing — `spec.md` §4.2/§6's `FunctionDef` rule.
//! Parameter lists are `;`-separated, the same peculiarity as call
//! arguments (`spec.md` §9).

use crate::ast::FunctionDef;
use crate::{ParseError, Parser};
use toyc_lex::TokenKind;

impl<'a> Parser<'a> {
    /// Inserts the function name into the known-functions set *before* the
    /// body is parsed, so a function may call itself recursively. Its
    /// parameters are added to the known-variables set for the body and
    /// removed once it has been parsed.
    pub(crate) fn parse_function_def(&mut self) -> Result<FunctionDef, ParseError> {
        let kw = self.expect(TokenKind::Define)?;
        let (name, _) = self.expect_ident()?;
        self.known_fns.insert(name);

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            let (first, _) = self.expect_ident()?;
            params.push(first);
            while self.check(TokenKind::Eos) {
                self.advance();
                let (next, _) = self.expect_ident()?;
                params.push(next);
            }
        }
        self.expect(TokenKind::RParen)?;

        for &param in &params {
            self.known_vars.insert(param);
        }
        let body = self.parse_block(true)?;
        for param in &params {
            self.known_vars.remove(param);
        }

        Ok(FunctionDef {
            name,
            params,
            body,
            span: kw.span,
        })
    }
}
