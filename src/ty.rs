//! Type representation for the UCLE type inference core.
//!
//! This module defines the closed type algebra: type variables, named
//! (built-in/nominal) types, function types, row-polymorphic records, and
//! the positionally-treated union/intersection and literal-refinement
//! annotations. It also defines type schemes and the free-variable /
//! substitution-application / occurs-check / pretty-printing operations
//! every variant supports.

use crate::subst::Substitution;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a unification (type) variable. Unique within one
/// inference run.
pub type TypeVarId = u32;

/// Name of a built-in base type.
pub const NUMBER: &str = "Number";
/// Name of the built-in string type.
pub const STRING: &str = "String";
/// Name of the built-in boolean type.
pub const BOOLEAN: &str = "Boolean";
/// Name of the built-in top type.
pub const ANY: &str = "Any";
/// Name of the built-in bottom type.
pub const NOTHING: &str = "Nothing";

/// A literal value used both as an expression's value and a literal
/// refinement type's singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// An integer literal.
    Int(i64),
    /// A string literal.
    Str(String),
    /// A boolean literal.
    Bool(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "{s:?}"),
            LiteralValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A structural record type: a closed or open mapping from field name to
/// type.
///
/// `row` being `Some(v)` means the record is **open**: it contains whatever
/// additional fields `v` is later unified to carry. `row` being `None`
/// means the record is **closed**.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    /// Fields in insertion order. Keys are unique.
    pub fields: Vec<(String, Type)>,
    /// The row variable, if this record is open.
    pub row: Option<TypeVarId>,
}

impl RecordType {
    /// A closed record with the given fields.
    pub fn closed(fields: Vec<(String, Type)>) -> Self {
        Self { fields, row: None }
    }

    /// An open record with the given fields and row variable.
    pub fn open(fields: Vec<(String, Type)>, row: TypeVarId) -> Self {
        Self {
            fields,
            row: Some(row),
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// A type in the UCLE type algebra.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// A unification variable.
    Var(TypeVarId),
    /// A nominal/built-in type, e.g. `Number`, or a user type name applied
    /// to zero or more arguments.
    Named(String, Vec<Type>),
    /// An n-ary function type; arity is part of identity.
    Function(Vec<Type>, Box<Type>),
    /// A structural record, closed or row-polymorphic.
    Record(RecordType),
    /// A surface-level union annotation, treated positionally by the
    /// solver (not a lattice).
    Union(Vec<Type>),
    /// A surface-level intersection annotation, treated positionally.
    Intersection(Vec<Type>),
    /// A singleton refinement of a base named type, e.g. `42 : Number`.
    Literal(LiteralValue, String),
}

impl Type {
    /// Shorthand for a built-in `Number`.
    pub fn number() -> Self {
        Type::Named(NUMBER.to_string(), Vec::new())
    }

    /// Shorthand for a built-in `String`.
    pub fn string() -> Self {
        Type::Named(STRING.to_string(), Vec::new())
    }

    /// Shorthand for a built-in `Boolean`.
    pub fn boolean() -> Self {
        Type::Named(BOOLEAN.to_string(), Vec::new())
    }

    /// The type variables reachable from this type, including the row
    /// variable of an open record.
    pub fn free_vars(&self) -> HashSet<TypeVarId> {
        let mut out = HashSet::new();
        self.collect_free_vars(&mut out);
        out
    }

    fn collect_free_vars(&self, out: &mut HashSet<TypeVarId>) {
        match self {
            Type::Var(v) => {
                out.insert(*v);
            }
            Type::Named(_, args) => {
                for arg in args {
                    arg.collect_free_vars(out);
                }
            }
            Type::Function(params, ret) => {
                for param in params {
                    param.collect_free_vars(out);
                }
                ret.collect_free_vars(out);
            }
            Type::Record(rec) => {
                for (_, ty) in &rec.fields {
                    ty.collect_free_vars(out);
                }
                if let Some(row) = rec.row {
                    out.insert(row);
                }
            }
            Type::Union(parts) | Type::Intersection(parts) => {
                for part in parts {
                    part.collect_free_vars(out);
                }
            }
            Type::Literal(..) => {}
        }
    }

    /// Apply a substitution to this type, chasing transitive variable
    /// bindings and merging row-variable bindings into their record.
    pub fn apply(&self, s: &Substitution) -> Type {
        match self {
            Type::Var(v) => match s.get(*v) {
                Some(bound) => bound.apply(s),
                None => Type::Var(*v),
            },
            Type::Named(name, args) => {
                Type::Named(name.clone(), args.iter().map(|a| a.apply(s)).collect())
            }
            Type::Function(params, ret) => Type::Function(
                params.iter().map(|p| p.apply(s)).collect(),
                Box::new(ret.apply(s)),
            ),
            Type::Record(rec) => apply_record(rec, s),
            Type::Union(parts) => Type::Union(parts.iter().map(|p| p.apply(s)).collect()),
            Type::Intersection(parts) => {
                Type::Intersection(parts.iter().map(|p| p.apply(s)).collect())
            }
            Type::Literal(v, base) => Type::Literal(v.clone(), base.clone()),
        }
    }

    /// Does type variable `var` occur anywhere in this type (including a
    /// record's row variable)?
    pub fn occurs(&self, var: TypeVarId) -> bool {
        match self {
            Type::Var(v) => *v == var,
            Type::Named(_, args) => args.iter().any(|a| a.occurs(var)),
            Type::Function(params, ret) => {
                params.iter().any(|p| p.occurs(var)) || ret.occurs(var)
            }
            Type::Record(rec) => {
                rec.row == Some(var) || rec.fields.iter().any(|(_, t)| t.occurs(var))
            }
            Type::Union(parts) | Type::Intersection(parts) => {
                parts.iter().any(|p| p.occurs(var))
            }
            Type::Literal(..) => false,
        }
    }

    /// Canonical pretty-printed rendering.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, false);
        out
    }

    fn write_pretty(&self, out: &mut String, paren_if_fn: bool) {
        match self {
            Type::Var(v) => out.push_str(&format!("T{v}")),
            Type::Named(name, args) => {
                out.push_str(name);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&arg.pretty());
                    }
                    out.push('>');
                }
            }
            Type::Function(params, ret) => {
                let needs_paren = paren_if_fn;
                if needs_paren {
                    out.push('(');
                }
                if params.len() == 1 {
                    let single_is_fn = matches!(params[0], Type::Function(..));
                    params[0].write_pretty(out, single_is_fn);
                } else {
                    out.push('(');
                    for (i, p) in params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&p.pretty());
                    }
                    out.push(')');
                }
                out.push_str(" -> ");
                out.push_str(&ret.pretty());
                if needs_paren {
                    out.push(')');
                }
            }
            Type::Record(rec) => {
                out.push_str("rect { ");
                for (i, (name, ty)) in rec.fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    out.push_str(&ty.pretty());
                }
                if let Some(row) = rec.row {
                    if !rec.fields.is_empty() {
                        out.push_str(" ");
                    }
                    out.push_str(&format!("| T{row}"));
                }
                out.push_str(" }");
            }
            Type::Union(parts) => {
                out.push_str(
                    &parts
                        .iter()
                        .map(Type::pretty)
                        .collect::<Vec<_>>()
                        .join(" | "),
                );
            }
            Type::Intersection(parts) => {
                out.push_str(
                    &parts
                        .iter()
                        .map(Type::pretty)
                        .collect::<Vec<_>>()
                        .join(" & "),
                );
            }
            Type::Literal(value, base) => {
                out.push_str(&format!("{value} : {base}"));
            }
        }
    }
}

/// Merge a record's fields with whatever its (possibly chained) row
/// variable resolves to under `s`.
///
/// Per the invariant in `spec.md` §3, a row variable only ever resolves to
/// another record (possibly itself open) — never a base type, function,
/// union, etc. — because the solver's row-polymorphic rule is the only
/// producer of row-variable bindings.
fn apply_record(rec: &RecordType, s: &Substitution) -> Type {
    let mut fields: Vec<(String, Type)> =
        rec.fields.iter().map(|(k, v)| (k.clone(), v.apply(s))).collect();
    let mut row = rec.row;
    loop {
        let Some(r) = row else { break };
        match s.get(r) {
            None => break,
            Some(Type::Var(r2)) if *r2 == r => break,
            Some(Type::Var(r2)) => row = Some(*r2),
            Some(Type::Record(extra)) => {
                for (k, v) in &extra.fields {
                    if !fields.iter().any(|(k0, _)| k0 == k) {
                        fields.push((k.clone(), v.apply(s)));
                    }
                }
                row = extra.row;
            }
            Some(other) => unreachable!(
                "row variable resolved to non-record type {other:?}; solver invariant violated"
            ),
        }
    }
    Type::Record(RecordType { fields, row })
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// A type scheme: a (possibly empty) universal quantifier over a body
/// type. An empty quantifier list makes this a monotype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScheme {
    /// Quantified type variable identifiers.
    pub vars: Vec<TypeVarId>,
    /// The scheme's body type.
    pub body: Type,
}

impl TypeScheme {
    /// A monomorphic scheme (no quantified variables).
    pub fn mono(body: Type) -> Self {
        Self {
            vars: Vec::new(),
            body,
        }
    }

    /// A polymorphic scheme quantifying over `vars`.
    pub fn poly(vars: Vec<TypeVarId>, body: Type) -> Self {
        Self { vars, body }
    }

    /// Free variables of the body, minus the quantified list.
    pub fn free_vars(&self) -> HashSet<TypeVarId> {
        let mut free = self.body.free_vars();
        for v in &self.vars {
            free.remove(v);
        }
        free
    }

    /// Apply a substitution, leaving quantified variables untouched.
    pub fn apply(&self, s: &Substitution) -> Self {
        let mut filtered = s.clone();
        for v in &self.vars {
            filtered.remove(*v);
        }
        TypeScheme {
            vars: self.vars.clone(),
            body: self.body.apply(&filtered),
        }
    }
}
