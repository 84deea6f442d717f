//! Statement-level recursive descent — `spec.md` §4.2's dispatch table.

use crate::ast::{AssignStmt, Block, ExitStmt, ForStmt, IfStmt, LetStmt, ReturnStmt, Stmt, WhileStmt};
use crate::{ParseError, Parser};
use toyc_lex::TokenKind;
use toyc_util::Span;

impl<'a> Parser<'a> {
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_kind() {
            Some(TokenKind::Exit) => self.parse_exit_stmt().map(Stmt::Exit),
            Some(TokenKind::Let) => self.parse_let_stmt().map(Stmt::Let),
            Some(TokenKind::If) => self.parse_if_stmt().map(Stmt::If),
            Some(TokenKind::While) => self.parse_while_stmt().map(Stmt::While),
            Some(TokenKind::For) => self.parse_for_stmt().map(Stmt::For),
            Some(TokenKind::Define) => self.parse_function_def().map(Stmt::FunctionDef),
            Some(TokenKind::LBrace) => self.parse_block(self.returning).map(Stmt::Block),
            Some(TokenKind::Ident) => {
                if self.peek_kind(1) == Some(TokenKind::LParen) {
                    let call = self.parse_call_expr()?;
                    self.expect(TokenKind::Eos)?;
                    Ok(Stmt::Expr(call))
                } else {
                    self.parse_assign_stmt().map(Stmt::Assign)
                }
            }
            _ => Err(self.unexpected(&[
                TokenKind::Exit,
                TokenKind::Let,
                TokenKind::If,
                TokenKind::While,
                TokenKind::For,
                TokenKind::Define,
                TokenKind::LBrace,
                TokenKind::Ident,
            ])),
        }
    }

    /// Parses `{ stmt* }`, treating `return` specially: legal only when
    /// `returning` is set, and then required to appear at least once anywhere
    /// in the block, at any nesting depth — see [`contains_return`].
    /// `returning` becomes the current context for anything nested inside
    /// this block (if/while/for bodies, and a bare `{ ... }` statement) via
    /// [`Parser::returning`]; it is restored to the caller's value once this
    /// block closes.
    pub(crate) fn parse_block(&mut self, returning: bool) -> Result<Block, ParseError> {
        let open = self.expect(TokenKind::LBrace)?;
        let outer_returning = self.returning;
        self.returning = returning;
        let mut stmts = Vec::new();
        loop {
            if self.is_at_end() {
                self.returning = outer_returning;
                return Err(ParseError::UnexpectedEof {
                    expected: vec![TokenKind::RBrace],
                });
            }
            if self.check(TokenKind::RBrace) {
                break;
            }
            if self.check(TokenKind::Return) {
                if !returning {
                    self.returning = outer_returning;
                    return Err(ParseError::ReturnOutsideReturningBlock {
                        span: self.current_span(),
                    });
                }
                stmts.push(Stmt::Return(self.parse_return_stmt()?));
            } else {
                match self.parse_stmt() {
                    Ok(stmt) => stmts.push(stmt),
                    Err(e) => {
                        self.returning = outer_returning;
                        return Err(e);
                    }
                }
            }
        }
        let close = match self.expect(TokenKind::RBrace) {
            Ok(tok) => tok,
            Err(e) => {
                self.returning = outer_returning;
                return Err(e);
            }
        };
        self.returning = outer_returning;
        if returning && !contains_return(&stmts) {
            return Err(ParseError::MissingReturn { span: close.span });
        }
        Ok(Block {
            stmts,
            span: Span::new(open.span.start, close.span.end, open.span.line, open.span.column),
        })
    }

    fn parse_return_stmt(&mut self) -> Result<ReturnStmt, ParseError> {
        let kw = self.expect(TokenKind::Return)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Eos)?;
        Ok(ReturnStmt { value, span: kw.span })
    }

    fn parse_exit_stmt(&mut self) -> Result<ExitStmt, ParseError> {
        let kw = self.expect(TokenKind::Exit)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Eos)?;
        Ok(ExitStmt { value, span: kw.span })
    }

    /// Inserts `name` into the known-variables set only *after* the
    /// initializer is parsed, so `let x = x;` is a use-before-declare error
    /// (`spec.md` §4.2).
    pub(crate) fn parse_let_stmt(&mut self) -> Result<LetStmt, ParseError> {
        let kw = self.expect(TokenKind::Let)?;
        let (name, _) = self.expect_ident()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expr(0)?;
        self.expect(TokenKind::Eos)?;
        self.known_vars.insert(name);
        Ok(LetStmt { name, init, span: kw.span })
    }

    pub(crate) fn parse_assign_stmt(&mut self) -> Result<AssignStmt, ParseError> {
        let (name, span) = self.expect_ident()?;
        if !self.known_vars.contains(&name) {
            return Err(ParseError::UndeclaredVariable {
                name: self.resolve(name),
                span,
            });
        }
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr(0)?;
        self.expect(TokenKind::Eos)?;
        Ok(AssignStmt { name, value, span })
    }

    fn parse_if_stmt(&mut self) -> Result<IfStmt, ParseError> {
        let kw = self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block(self.returning)?;
        let else_block = if self.check(TokenKind::Else) {
            self.advance();
            Some(self.parse_block(self.returning)?)
        } else {
            None
        };
        Ok(IfStmt {
            cond,
            then_block,
            else_block,
            span: kw.span,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<WhileStmt, ParseError> {
        let kw = self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr(0)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block(self.returning)?;
        Ok(WhileStmt { cond, body, span: kw.span })
    }

    /// `for ( let-header cond ; step-header ) body` — note the header's
    /// inner `;`s are the `Let`/`Assign` rules' own terminators, not
    /// additional separators (`spec.md` §4.2).
    fn parse_for_stmt(&mut self) -> Result<ForStmt, ParseError> {
        let kw = self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;
        let init = self.parse_let_stmt()?;
        let cond = self.parse_expr(0)?;
        self.expect(TokenKind::Eos)?;
        let step = self.parse_assign_stmt()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block(false)?;
        Ok(ForStmt {
            init: Box::new(init),
            cond,
            step: Box::new(step),
            body,
            span: kw.span,
        })
    }
}

/// Whether a statement list contains at least one `return`, at any nesting
/// depth reachable within the same function (`if`/`while`/`for` bodies,
/// nested `{ ... }` blocks) — `spec.md` §4.2/§3's rule for a `returning`
/// block is exactly "must contain at least one `return`", not that every
/// path returns. A nested `FunctionDef`'s body is its own scope and is not
/// searched: a `return` belonging to an inner function definition doesn't
/// satisfy the outer block's requirement.
fn contains_return(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_contains_return)
}

fn stmt_contains_return(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) => true,
        Stmt::If(i) => {
            contains_return(&i.then_block.stmts)
                || i.else_block.as_ref().is_some_and(|b| contains_return(&b.stmts))
        }
        Stmt::While(w) => contains_return(&w.body.stmts),
        Stmt::For(f) => contains_return(&f.body.stmts),
        Stmt::Block(b) => contains_return(&b.stmts),
        _ => false,
    }
}
