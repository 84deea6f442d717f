//! AST node definitions — `spec.md` §3.
//!
//! Two tagged-sum families, `Stmt` and `Expr`. Every variant is a plain
//! record; there is no shared base type and no mutation after a node is
//! built. A parser routine consumes tokens and returns a freshly built node
//! that its caller immediately takes ownership of, so the tree has no
//! back-pointers and no cycles.

use toyc_lex::TokenKind;
use toyc_util::{Span, Symbol};

/// The parsed translation unit: a flat list of top-level statements, almost
/// always `FunctionDef`s plus an entry point named `main`.
#[derive(Debug, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Let(LetStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    FunctionDef(FunctionDef),
    Return(ReturnStmt),
    Exit(ExitStmt),
    /// A braced block used in statement position (`returning = false`).
    Block(Block),
    /// A call used as a bare statement, e.g. `f(1; 2);`.
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: Symbol,
    pub init: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub name: Symbol,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub span: Span,
}

/// `for (let-header cond ; step-header) body`. `init` and `step` are parsed
/// with the same grammar rules as a standalone `LetStmt`/`AssignStmt`; the
/// header's own `;` tokens serve as separators rather than statement
/// terminators (`spec.md` §4.2).
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Box<LetStmt>,
    pub cond: Expr,
    pub step: Box<AssignStmt>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExitStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(IntLit),
    Ident(Ident),
    BinaryOp(BinaryOp),
    FunctionCall(FunctionCall),
    BlockExpr(BlockExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit(n) => n.span,
            Expr::Ident(i) => i.span,
            Expr::BinaryOp(b) => b.span,
            Expr::FunctionCall(c) => c.span,
            Expr::BlockExpr(b) => b.block.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntLit {
    pub value: i64,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: Symbol,
    pub span: Span,
}

/// `op` is restricted to the operator-kind tokens (`Star`, `Percent`,
/// `Plus`, `Minus`, `Lt`, `Gt`, `Eq`) by construction — the parser never
/// builds a `BinaryOp` with any other `TokenKind`.
#[derive(Debug, Clone)]
pub struct BinaryOp {
    pub left: Box<Expr>,
    pub op: TokenKind,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// A `{ ... }` used in expression position; parsed with `returning = true`
/// and guaranteed (by the parser) to contain at least one `Return`.
#[derive(Debug, Clone)]
pub struct BlockExpr {
    pub block: Block,
}
