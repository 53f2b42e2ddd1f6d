//! Error kinds for the type inference core.
//!
//! A single, flat `InferError` covers both constraint-generation failures
//! (unbound identifiers) and solver failures (unification), mirroring how
//! `aurora_types::infer::InferenceError` wraps
//! `aurora_types::unify::UnificationError` via `#[from]`. The core fails
//! fast: the first error aborts the current `infer` call and no partial
//! results are returned alongside it (`spec.md` §7).

use crate::ty::{Type, TypeVarId};
use thiserror::Error;

/// Everything that can go wrong during constraint generation or solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferError {
    /// A lower-case identifier had no binding in the environment.
    #[error("unbound identifier: {0}")]
    UnboundIdentifier(String),

    /// An upper-case identifier (type/constructor reference) had no
    /// binding in the environment.
    #[error("unbound type or constructor: {0}")]
    UnboundTypeOrConstructor(String),

    /// Two function types had different arity.
    #[error("arity mismatch: expected {expected} parameter(s), got {got}")]
    ArityMismatch {
        /// Arity of the left-hand function type.
        expected: usize,
        /// Arity of the right-hand function type.
        got: usize,
    },

    /// Two closed records (or a closed/open pair whose open side lacks a
    /// matching row) had incompatible key sets.
    #[error("record field mismatch: {{{}}} vs {{{}}}", keys1.join(", "), keys2.join(", "))]
    RecordFieldMismatch {
        /// Field names on the left-hand record.
        keys1: Vec<String>,
        /// Field names on the right-hand record.
        keys2: Vec<String>,
    },

    /// The occurs check rejected binding a variable to a type containing
    /// itself.
    #[error("recursive type: T{var} occurs in {ty}")]
    RecursiveType {
        /// The offending variable.
        var: TypeVarId,
        /// The type it would have been bound to.
        ty: Type,
    },

    /// Two literal types disagreed.
    #[error("literal mismatch: {v1} vs {v2}")]
    LiteralMismatch {
        /// Left-hand literal, rendered.
        v1: String,
        /// Right-hand literal, rendered.
        v2: String,
    },

    /// No unification rule applies to this pair of types.
    #[error("cannot unify {t1} with {t2}")]
    UnificationFailure {
        /// Left-hand type.
        t1: Type,
        /// Right-hand type.
        t2: Type,
    },
}

/// The core's result type.
pub type InferResult<T> = Result<T, InferError>;
