//! Hindley-Milner type inference core for UCLE.
//!
//! UCLE is a small expression-oriented functional language: lambdas,
//! structurally-typed records with row-polymorphic field access, pattern
//! matching, and polymorphic `let`-bindings in the style of Algorithm W.
//! This crate consumes an already-parsed AST (module [`ast`]) and produces,
//! for every top-level binding and every sub-expression, a principal type
//! in a closed type algebra (module [`ty`]).
//!
//! The two entry points an embedder needs are [`driver::infer`] and
//! [`driver::inferred_types_as_strings`]. Everything else — the type
//! algebra, substitution, fresh-variable supply, environment, constraint
//! set, generator, and unifier — is exposed for embedders that want to
//! drive the passes themselves or inspect intermediate state.

pub mod ast;
pub mod constraint;
pub mod driver;
pub mod env;
pub mod error;
pub mod fresh;
pub mod generator;
pub mod subst;
pub mod ty;
pub mod unify;

pub use driver::{infer, inferred_types_as_strings, InferConfig};
pub use error::{InferError, InferResult};
pub use ty::{RecordType, Type, TypeScheme, TypeVarId};
