//! Expression parsing — precedence-climbing (Pratt) over the primary
//! grammar in `spec.md` §4.2/§6.

use crate::ast::{BinaryOp, BlockExpr, Expr, FunctionCall, Ident, IntLit};
use crate::{ParseError, Parser};
use toyc_lex::TokenKind;
use toyc_util::Span;

/// `{*, %} = 5`, `{+, -} = 4`, `{<, >, ==} = 3` — `spec.md` §3.
fn precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Star | TokenKind::Percent => Some(5),
        TokenKind::Plus | TokenKind::Minus => Some(4),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Eq => Some(3),
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// `parseBinary(minPrec)`: parse a primary, then repeatedly consume an
    /// operator whose precedence is `>= min_prec`, recursing with
    /// `prec + 1` so equal-precedence operators stay left-associative.
    pub(crate) fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;
        loop {
            let Some(prec) = self.current_kind().and_then(precedence) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let op_tok = self.advance().expect("precedence() only returns Some for a present token");
            let right = self.parse_expr(prec + 1)?;
            let span = Span::new(
                left.span().start,
                right.span().end,
                left.span().line,
                left.span().column,
            );
            left = Expr::BinaryOp(BinaryOp {
                left: Box::new(left),
                op: op_tok.kind,
                right: Box::new(right),
                span,
            });
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current_kind() {
            Some(TokenKind::Int) => {
                let tok = self.advance().unwrap();
                let lexeme = tok.lexeme.expect("Int token always carries a lexeme");
                let text = self.interner.resolve(lexeme);
                let value = text
                    .parse::<i64>()
                    .expect("lexer guarantees an all-digit Int lexeme");
                Ok(Expr::IntLit(IntLit { value, span: tok.span }))
            }
            Some(TokenKind::Ident) => {
                if self.peek_kind(1) == Some(TokenKind::LParen) {
                    self.parse_call_expr()
                } else {
                    let (name, span) = self.expect_ident()?;
                    if !self.known_vars.contains(&name) {
                        return Err(ParseError::UndeclaredVariable {
                            name: self.resolve(name),
                            span,
                        });
                    }
                    Ok(Expr::Ident(Ident { name, span }))
                }
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::LBrace) => {
                let block = self.parse_block(true)?;
                Ok(Expr::BlockExpr(BlockExpr { block }))
            }
            _ => Err(self.unexpected(&[
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::LBrace,
            ])),
        }
    }

    /// `Call ::= IDENT "(" [Expr {";" Expr}] ")"` — arguments are
    /// semicolon-separated, matching the parameter list's separator
    /// (`spec.md` §9).
    pub(crate) fn parse_call_expr(&mut self) -> Result<Expr, ParseError> {
        let (name, span) = self.expect_ident()?;
        if !self.known_fns.contains(&name) {
            return Err(ParseError::UndefinedFunction {
                name: self.resolve(name),
                span,
            });
        }
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            args.push(self.parse_expr(0)?);
            while self.check(TokenKind::Eos) {
                self.advance();
                args.push(self.parse_expr(0)?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Expr::FunctionCall(FunctionCall { name, args, span }))
    }
}
