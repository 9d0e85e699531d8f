//! AST node types for the Lilac language.
//!
//! Every node carries a [`Span`] for error reporting. Equality is structural
//! and ignores spans, so a tree built by hand compares equal to the same tree
//! produced by the parser. Recursive children are boxed; each subtree has
//! exactly one owner.
//!
//! `Display` renders the canonical, fully-parenthesized form used by the
//! parser REPL mode and by function inspection.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: statements in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name = expr;`
    Let(LetStmt),
    /// `return expr;`
    Return(ReturnStmt),
    /// A bare expression; its value is the statement's value.
    Expr(ExprStmt),
    /// `{ statements... }`
    Block(Block),
}

/// `let name = expr;`
#[derive(Debug, Clone)]
pub struct LetStmt {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

impl PartialEq for LetStmt {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

/// `return expr;`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

impl PartialEq for ReturnStmt {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A bare expression statement.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

impl PartialEq for ExprStmt {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

/// `{ statements... }`
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.stmts == other.stmts
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node. Uses `Box` for recursive variants.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `foo`
    Identifier(String),
    /// `42`
    IntegerLit(i64),
    /// `"hello"`
    StringLit(String),
    /// `true` / `false`
    BoolLit(bool),
    /// `[expr, ...]`
    ArrayLit(Vec<Expr>),
    /// `{ key: value, ... }` in source order, duplicates kept.
    HashLit(Vec<(Expr, Expr)>),

    // ── Operators ──
    /// `-x`, `!x`
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    /// `a + b`, `a == b`, etc.
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },

    // ── Control Flow ──
    /// `if (cond) { ... } [else { ... }]`
    If(Box<IfExpr>),

    // ── Functions ──
    /// `fn(params) { body }`
    Function(Box<FunctionLit>),
    /// `callee(args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    // ── Indexing ──
    /// `collection[index]`
    Index {
        collection: Box<Expr>,
        index: Box<Expr>,
    },
}

/// `if (cond) { ... } [else { ... }]`
#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Expr,
    pub consequence: Block,
    pub alternative: Option<Block>,
    pub span: Span,
}

impl PartialEq for IfExpr {
    fn eq(&self, other: &Self) -> bool {
        self.condition == other.condition
            && self.consequence == other.consequence
            && self.alternative == other.alternative
    }
}

/// `fn(params) { body }`
#[derive(Debug, Clone)]
pub struct FunctionLit {
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

impl PartialEq for FunctionLit {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
}

impl PrefixOp {
    /// Returns the operator symbol for rendering and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        }
    }
}

/// Binary infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    NotEq,
}

impl InfixOp {
    /// Returns the operator symbol for rendering and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Less => "<",
            InfixOp::Greater => ">",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Rendering
// ══════════════════════════════════════════════════════════════════════════════

/// Write `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(s) => write!(f, "let {} = {};", s.name, s.value),
            Stmt::Return(s) => write!(f, "return {};", s.value),
            Stmt::Expr(s) => write!(f, "{}", s.expr),
            Stmt::Block(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            write!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_list(f, &self.params)?;
        write!(f, ") {{ {} }}", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::IntegerLit(n) => write!(f, "{n}"),
            ExprKind::StringLit(s) => f.write_str(s),
            ExprKind::BoolLit(b) => write!(f, "{b}"),
            ExprKind::ArrayLit(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            ExprKind::HashLit(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            ExprKind::Prefix { op, operand } => write!(f, "({op}{operand})"),
            ExprKind::Infix { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::If(if_expr) => {
                write!(f, "if {} {{ {} }}", if_expr.condition, if_expr.consequence)?;
                if let Some(alt) = &if_expr.alternative {
                    write!(f, " else {{ {alt} }}")?;
                }
                Ok(())
            }
            ExprKind::Function(func) => write!(f, "{func}"),
            ExprKind::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::Index { collection, index } => write!(f, "({collection}[{index}])"),
        }
    }
}
