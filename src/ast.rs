//! Abstract syntax tree consumed by the type inference core.
//!
//! This is the interface the (out-of-scope) lexer/parser produces: a plain
//! tree of UCLE's surface grammar, matching `docs/mini/Grammar.lllg` —
//! `type`/`let` declarations, lambdas, `const`-in, `match`, record literals,
//! application/`.field` suffixes, and patterns. Every node carries a
//! [`NodeId`] rather than relying on pointer identity, so the generator can
//! record a type for each node in a plain `HashMap<NodeId, Type>` the way
//! downstream tooling would key diagnostics off a parser-assigned id rather
//! than an address.
//!
//! There is no span/hygiene tracking here (unlike `aurora_ast`'s `Expr`):
//! UCLE's parser is external and out of scope, and the inference core never
//! needs source locations to do its job.

use serde::{Deserialize, Serialize};

/// Identifies an AST node for the purpose of recording its inferred type.
pub type NodeId = u32;

/// A complete UCLE program: a sequence of `type`/`let` declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Program {
    /// Top-level declarations, in source order.
    pub decls: Vec<Decl>,
}

impl Program {
    /// Construct a program from its top-level declarations.
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    /// `let name => body;`
    ///
    /// Any parameter-list sugar on the `let` itself (`let f(x) => x;`) is
    /// parser-level desugaring into `let f => fn(x) => x;` and is not
    /// represented here — by the time this AST is built, the body is
    /// already a lambda if the source used that shorthand.
    Let {
        /// The bound name.
        name: String,
        /// The declaration's own node id (used to record the scheme's body
        /// type for the whole binding, before generalization).
        id: NodeId,
        /// The bound expression.
        body: Expr,
    },
    /// `type Name => <type expression>;`
    Type {
        /// The declared name.
        name: String,
        /// The node id for this declaration.
        id: NodeId,
        /// The right-hand type expression (parsed but not structurally
        /// enforced, per `spec.md` §4.6).
        expr: TypeExpr,
    },
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// This node's id.
    pub id: NodeId,
    /// The expression's kind.
    pub kind: ExprKind,
}

impl Expr {
    /// Construct an expression node.
    pub fn new(id: NodeId, kind: ExprKind) -> Self {
        Self { id, kind }
    }
}

/// Expression kinds (exhaustive for the core, per `spec.md` §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Integer literal, e.g. `42`.
    Int(i64),
    /// String literal, e.g. `"hi"`.
    Str(String),
    /// Boolean literal, `True` or `False`.
    Bool(bool),
    /// A lower-case identifier reference (ordinary variable use).
    Ident(String),
    /// An upper-case identifier reference (type/constructor use).
    TypeIdent(String),
    /// `fn(p1, ..., pn) => body`.
    Lambda {
        /// Parameters.
        params: Vec<Param>,
        /// Body expression.
        body: Box<Expr>,
    },
    /// A primary expression followed by zero or more application/access
    /// suffixes, e.g. `f(x).field(y)`.
    Compound {
        /// The base expression.
        primary: Box<Expr>,
        /// Suffixes applied left-to-right.
        suffixes: Vec<Suffix>,
    },
    /// `rect { f1: e1, ..., fn: en }`.
    Record(Vec<(String, Expr)>),
    /// `const x = e1 in e2`.
    Const {
        /// The bound name.
        name: String,
        /// The bound expression.
        value: Box<Expr>,
        /// The body in which `name` is visible.
        body: Box<Expr>,
    },
    /// `match scrutinee { case p1 => b1 ... }`.
    Match {
        /// The scrutinee.
        scrutinee: Box<Expr>,
        /// Match arms, tried in order.
        arms: Vec<MatchArm>,
    },
}

/// A lambda parameter, with an optional type annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// This parameter's node id.
    pub id: NodeId,
    /// The parameter name.
    pub name: String,
    /// An optional type annotation.
    pub annotation: Option<TypeExpr>,
}

/// A suffix applied to a compound expression's primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suffix {
    /// The node id of the *result* of applying this suffix.
    pub id: NodeId,
    /// The suffix's kind.
    pub kind: SuffixKind,
}

/// Suffix kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SuffixKind {
    /// `(e1, ..., en)` — function application.
    Call(Vec<Expr>),
    /// `.field` — row-polymorphic field access.
    Access(String),
}

/// A single `match` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    /// The pattern.
    pub pattern: Pattern,
    /// The arm's body expression.
    pub body: Expr,
}

/// A pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// This pattern's node id.
    pub id: NodeId,
    /// The pattern's kind.
    pub kind: PatternKind,
}

impl Pattern {
    /// Construct a pattern node.
    pub fn new(id: NodeId, kind: PatternKind) -> Self {
        Self { id, kind }
    }
}

/// Pattern kinds (exhaustive for the core, per `spec.md` §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    /// A variable pattern, e.g. `x`.
    Var(String),
    /// A literal pattern, e.g. `42`, `"hi"`, `True`.
    Literal(Literal),
    /// `rect { f1: p1, ..., fn: pn }`.
    Record(Vec<(String, Pattern)>),
    /// `C(p1, ..., pn)` — a constructor pattern.
    Constructor(String, Vec<Pattern>),
}

/// A literal value, shared between expressions and patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal.
    Int(i64),
    /// String literal.
    Str(String),
    /// Boolean literal.
    Bool(bool),
}

/// A surface type annotation, resolved compositionally per `spec.md` §4.6.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpr {
    /// A bare type name, e.g. `Number`, or a user-declared type name.
    Name(String),
    /// `rect { f1: t1, ..., fn: tn }` — always closed.
    Record(Vec<(String, TypeExpr)>),
    /// `a -> b`. Chains of `a -> b -> c` are right-associated by the parser
    /// into `Arrow(a, Arrow(b, c))`, matching `spec.md` §4.6.1.
    Arrow(Box<TypeExpr>, Box<TypeExpr>),
    /// `a | b | ...`.
    Union(Vec<TypeExpr>),
    /// `a & b & ...`.
    Intersection(Vec<TypeExpr>),
    /// A literal-refinement annotation, e.g. `42`.
    Literal(Literal),
}
