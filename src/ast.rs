//! Abstract syntax tree produced by the parser and consumed by the
//! evaluator.
//!
//! Nodes form a strict owned tree: every child is owned exclusively by its
//! parent, nothing is shared, and nodes are immutable once built.  Function
//! bodies are the one part of the tree that outlives evaluation of their
//! declaration: a runtime function value clones and retains them.

use serde::Serialize;

/// Root node: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Type annotation on a declaration (`int x = 5;`).  `let`/`const`
/// declarations carry no annotation; `Any` is an annotation that opts out of
/// enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeAnnotation {
    Int,
    Float,
    Str,
    Bool,
    Obj,
    Any,
}

/// A complete executable construct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `let x = e;` / `const x = e;` / `int x = e;` / `let x;`
    VarDeclaration {
        constant: bool,
        annotation: Option<TypeAnnotation>,
        identifier: String,
        value: Option<Expr>,
    },

    /// `function name(a, b) { ... }`; becomes a first-class callable value.
    FunctionDeclaration {
        name: String,
        parameters: Vec<String>,
        body: Vec<Stmt>,
    },

    /// `if (cond) { ... };` with optional `else` / `else if` chain.  An
    /// `else if` is represented as a one-element `else_body` holding a
    /// nested `If`.
    If {
        condition: Expr,
        body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },

    /// `for (init; cond; iteration) { ... }`; all three clauses mandatory,
    /// `init` must be a variable declaration and `iteration` an assignment.
    For {
        init: Box<Stmt>,
        condition: Expr,
        iteration: Expr,
        body: Vec<Stmt>,
    },

    /// `while (cond) { ... }`
    While { condition: Expr, body: Vec<Stmt> },

    /// A bare expression in statement position.
    Expr(Expr),
}

/// One entry of an object literal.  A property without a value is shorthand:
/// the key is looked up as a variable at evaluation time.  The value is a
/// statement rather than an expression so that `{ f: function g() {...} }`
/// parses; everything else lands here wrapped as `Stmt::Expr`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: Option<Box<Stmt>>,
}

/// An expression node.  `Break`/`Continue`/`Return` live here because the
/// grammar admits them in expression position inside loop and function
/// bodies; the parser has already rejected them anywhere illegal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    NumericLiteral(f64),

    StringLiteral(String),

    BoolLiteral(bool),

    Null,

    Unassigned,

    Identifier(String),

    /// Infix binary operator expression; the operator is kept as its source
    /// spelling (`+`, `//`, `&&`, …).
    Binary {
        left: Box<Expr>,
        operator: String,
        right: Box<Expr>,
    },

    /// Prefix `+`/`-`.
    Unary { operator: String, right: Box<Expr> },

    /// `assignee = value`; the assignee must evaluate to an identifier or a
    /// member expression, anything else fails at runtime.
    Assignment { assignee: Box<Expr>, value: Box<Expr> },

    /// `f(a, b)`; right-recursive for chained calls `f()()`.
    Call { caller: Box<Expr>, args: Vec<Expr> },

    /// `a.b` (`computed = false`, property is an identifier) or `a[b]`
    /// (`computed = true`, property is any expression).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },

    ObjectLiteral(Vec<Property>),

    ArrayLiteral(Vec<Expr>),

    Break,

    Continue,

    Return(Box<Expr>),
}
