//! Unification for Hindley-Milner inference.
//!
//! Implements the ten rules of `spec.md` §4.7 in the stated order: trivial
//! equality, variable binding (with occurs check), function/record/named/
//! union/intersection/literal structural rules, and the literal-vs-named
//! base-type rule. The record rule also needs to mint fresh row variables
//! for the case where two *disjoint* open records are unified (their
//! leftover openness has to be shared through a new variable rather than
//! referencing each other directly, or the resulting substitution would be
//! cyclic) — so, unlike `aurora_types::unify::unify`, this solver threads a
//! [`FreshVarGen`] through every call.

use crate::constraint::{Constraint, ConstraintSet};
use crate::error::{InferError, InferResult};
use crate::fresh::FreshVarGen;
use crate::subst::Substitution;
use crate::ty::{RecordType, Type};

/// Unify two types, returning a substitution that makes them equal (after
/// `apply`), or an [`InferError`].
pub fn unify(t1: &Type, t2: &Type, gen: &mut FreshVarGen) -> InferResult<Substitution> {
    // Rule 1: structural equality.
    if t1 == t2 {
        return Ok(Substitution::new());
    }

    match (t1, t2) {
        // Rules 2 and 3: variable binds to anything (with occurs check).
        (Type::Var(v), other) | (other, Type::Var(v)) => bind_var(*v, other),

        // Rule 4: function types.
        (Type::Function(p1, r1), Type::Function(p2, r2)) => {
            if p1.len() != p2.len() {
                return Err(InferError::ArityMismatch {
                    expected: p1.len(),
                    got: p2.len(),
                });
            }
            let s_params = unify_many(p1, p2, gen)?;
            let r1 = r1.apply(&s_params);
            let r2 = r2.apply(&s_params);
            let s_ret = unify(&r1, &r2, gen)?;
            Ok(Substitution::compose(&s_ret, &s_params))
        }

        // Rule 5: records, with row polymorphism.
        (Type::Record(rec1), Type::Record(rec2)) => unify_records(rec1, rec2, gen),

        // Rule 6: named types.
        (Type::Named(n1, a1), Type::Named(n2, a2)) => {
            if n1 != n2 {
                return Err(InferError::UnificationFailure {
                    t1: t1.clone(),
                    t2: t2.clone(),
                });
            }
            if a1.len() != a2.len() {
                return Err(InferError::ArityMismatch {
                    expected: a1.len(),
                    got: a2.len(),
                });
            }
            unify_many(a1, a2, gen)
        }

        // Rule 7: union/intersection, positional.
        (Type::Union(p1), Type::Union(p2)) | (Type::Intersection(p1), Type::Intersection(p2)) => {
            if p1.len() != p2.len() {
                return Err(InferError::ArityMismatch {
                    expected: p1.len(),
                    got: p2.len(),
                });
            }
            unify_many(p1, p2, gen)
        }

        // Rule 8: literal vs literal.
        (Type::Literal(v1, b1), Type::Literal(v2, b2)) => {
            if v1 == v2 && b1 == b2 {
                Ok(Substitution::new())
            } else {
                Err(InferError::LiteralMismatch {
                    v1: format!("{v1} : {b1}"),
                    v2: format!("{v2} : {b2}"),
                })
            }
        }

        // Rule 9: literal vs named — succeeds iff the literal's base
        // matches the named type's name.
        (Type::Literal(_, base), Type::Named(name, _)) | (Type::Named(name, _), Type::Literal(_, base)) => {
            if base == name {
                Ok(Substitution::new())
            } else {
                Err(InferError::UnificationFailure {
                    t1: t1.clone(),
                    t2: t2.clone(),
                })
            }
        }

        // Rule 10: nothing else unifies.
        _ => Err(InferError::UnificationFailure {
            t1: t1.clone(),
            t2: t2.clone(),
        }),
    }
}

/// Unify two equal-length slices pairwise, composing substitutions and
/// applying the running substitution to each subsequent pair (`unify_many`
/// in `aurora_types::unify`'s style).
fn unify_many(types1: &[Type], types2: &[Type], gen: &mut FreshVarGen) -> InferResult<Substitution> {
    let mut subst = Substitution::new();
    for (a, b) in types1.iter().zip(types2.iter()) {
        let a = a.apply(&subst);
        let b = b.apply(&subst);
        let s = unify(&a, &b, gen)?;
        subst = Substitution::compose(&s, &subst);
    }
    Ok(subst)
}

/// Bind a type variable to a type, after the occurs check.
fn bind_var(var: crate::ty::TypeVarId, ty: &Type) -> InferResult<Substitution> {
    if let Type::Var(v) = ty {
        if *v == var {
            return Ok(Substitution::new());
        }
    }
    if ty.occurs(var) {
        return Err(InferError::RecursiveType {
            var,
            ty: ty.clone(),
        });
    }
    Ok(Substitution::singleton(var, ty.clone()))
}

/// The row-polymorphic record unification rule.
fn unify_records(
    rec1: &RecordType,
    rec2: &RecordType,
    gen: &mut FreshVarGen,
) -> InferResult<Substitution> {
    let mut subst = Substitution::new();

    // Unify values shared between both records, in rec1's field order.
    for (key, t1) in &rec1.fields {
        if let Some(t2) = rec2.get(key) {
            let t1 = t1.apply(&subst);
            let t2 = t2.apply(&subst);
            let s = unify(&t1, &t2, gen)?;
            subst = Substitution::compose(&s, &subst);
        }
    }

    let rest1: Vec<(String, Type)> = rec1
        .fields
        .iter()
        .filter(|(k, _)| rec2.get(k).is_none())
        .map(|(k, t)| (k.clone(), t.apply(&subst)))
        .collect();
    let rest2: Vec<(String, Type)> = rec2
        .fields
        .iter()
        .filter(|(k, _)| rec1.get(k).is_none())
        .map(|(k, t)| (k.clone(), t.apply(&subst)))
        .collect();

    match (rest1.is_empty(), rest2.is_empty()) {
        (true, true) => {
            // Same key set. Reconcile leftover openness, if any.
            match (rec1.row, rec2.row) {
                (None, None) => {}
                (Some(r1v), None) => {
                    let s =
                        unify(&Type::Var(r1v), &Type::Record(RecordType::closed(vec![])), gen)?;
                    subst = Substitution::compose(&s, &subst);
                }
                (None, Some(r2v)) => {
                    let s =
                        unify(&Type::Var(r2v), &Type::Record(RecordType::closed(vec![])), gen)?;
                    subst = Substitution::compose(&s, &subst);
                }
                (Some(r1v), Some(r2v)) => {
                    let s = unify(&Type::Var(r1v), &Type::Var(r2v), gen)?;
                    subst = Substitution::compose(&s, &subst);
                }
            }
            Ok(subst)
        }
        (false, true) => {
            // rec1 has fields rec2 lacks: rec2's row must absorb them.
            let r2v = rec2.row.ok_or_else(|| mismatch_err(rec1, rec2))?;
            let binding = Type::Record(RecordType {
                fields: rest1,
                row: rec1.row,
            });
            let s = unify(&Type::Var(r2v), &binding, gen)?;
            subst = Substitution::compose(&s, &subst);
            Ok(subst)
        }
        (true, false) => {
            // rec2 has fields rec1 lacks: rec1's row must absorb them.
            let r1v = rec1.row.ok_or_else(|| mismatch_err(rec1, rec2))?;
            let binding = Type::Record(RecordType {
                fields: rest2,
                row: rec2.row,
            });
            let s = unify(&Type::Var(r1v), &binding, gen)?;
            subst = Substitution::compose(&s, &subst);
            Ok(subst)
        }
        (false, false) => {
            // Both records have fields the other lacks: each side's row
            // must absorb the other's extras, sharing one new row
            // variable for whatever remains beyond both, so the two
            // bindings don't reference each other directly (which would
            // make the substitution cyclic).
            let r1v = rec1.row.ok_or_else(|| mismatch_err(rec1, rec2))?;
            let r2v = rec2.row.ok_or_else(|| mismatch_err(rec1, rec2))?;
            let shared_row = gen.fresh_id();
            let s1 = unify(
                &Type::Var(r1v),
                &Type::Record(RecordType::open(rest2, shared_row)),
                gen,
            )?;
            subst = Substitution::compose(&s1, &subst);
            let r2v_applied = subst.apply(&Type::Var(r2v));
            let binding2 = Type::Record(RecordType::open(
                rest1.into_iter().map(|(k, t)| (k, t.apply(&subst))).collect(),
                shared_row,
            ));
            let s2 = unify(&r2v_applied, &binding2, gen)?;
            subst = Substitution::compose(&s2, &subst);
            Ok(subst)
        }
    }
}

fn mismatch_err(rec1: &RecordType, rec2: &RecordType) -> InferError {
    InferError::RecordFieldMismatch {
        keys1: rec1.fields.iter().map(|(k, _)| k.clone()).collect(),
        keys2: rec2.fields.iter().map(|(k, _)| k.clone()).collect(),
    }
}

/// Fold constraints in insertion order, applying the running substitution
/// to both sides before each `unify` call, composing the result in.
pub fn solve(constraints: &ConstraintSet, gen: &mut FreshVarGen) -> InferResult<Substitution> {
    let mut subst = Substitution::new();
    for constraint in constraints.iter() {
        let (a, b) = match constraint {
            Constraint::Equal(a, b) => (a, b),
            Constraint::Subtype(a, b) => (a, b),
        };
        let a = a.apply(&subst);
        let b = b.apply(&subst);
        let s = unify(&a, &b, gen)?;
        subst = Substitution::compose(&s, &subst);
    }
    Ok(subst)
}
