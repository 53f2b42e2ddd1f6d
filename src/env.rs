//! Type environment: a persistent map from identifier name to type scheme.
//!
//! Mirrors `aurora_types::infer::TypeEnv`'s extend-by-clone approach (no
//! persistent-map crate; the teacher workspace doesn't reach for one
//! either, and environments in a single UCLE program are small).

use crate::error::{InferError, InferResult};
use crate::fresh::FreshVarGen;
use crate::subst::Substitution;
use crate::ty::{Type, TypeScheme, TypeVarId};
use std::collections::{HashMap, HashSet};

/// A type environment: name -> type scheme.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    bindings: HashMap<String, TypeScheme>,
}

impl TypeEnv {
    /// An empty environment.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// An environment seeded with the built-in base types, per `spec.md`
    /// §4.8 step 2.
    pub fn with_builtins() -> Self {
        let mut env = Self::new();
        for name in [
            crate::ty::NUMBER,
            crate::ty::STRING,
            crate::ty::BOOLEAN,
            crate::ty::ANY,
            crate::ty::NOTHING,
        ] {
            env.bindings.insert(
                name.to_string(),
                TypeScheme::mono(Type::Named(name.to_string(), Vec::new())),
            );
        }
        env
    }

    /// Look up a lower-case identifier, instantiating its scheme with
    /// fresh variables. Fails with `UnboundIdentifier`.
    pub fn lookup(&self, name: &str, gen: &mut FreshVarGen) -> InferResult<Type> {
        self.bindings
            .get(name)
            .map(|scheme| instantiate(scheme, gen))
            .ok_or_else(|| InferError::UnboundIdentifier(name.to_string()))
    }

    /// Look up an upper-case identifier (type/constructor reference).
    /// Fails with `UnboundTypeOrConstructor`.
    pub fn lookup_type(&self, name: &str, gen: &mut FreshVarGen) -> InferResult<Type> {
        self.bindings
            .get(name)
            .map(|scheme| instantiate(scheme, gen))
            .ok_or_else(|| InferError::UnboundTypeOrConstructor(name.to_string()))
    }

    /// Raw scheme lookup, without instantiation (used by the driver when
    /// resolving top-level names for the final result).
    pub fn scheme(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    /// An environment extended with one more binding.
    pub fn extend(&self, name: String, scheme: TypeScheme) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.insert(name, scheme);
        Self { bindings }
    }

    /// An environment with `name`'s binding removed, if present.
    ///
    /// Used before generalizing a `let` binding's own body: the driver
    /// pre-declares the name with a placeholder scheme so a recursive
    /// reference to it resolves, but that placeholder must not itself
    /// count as "free in the environment" when deciding what to
    /// quantify, or every variable in the body would spuriously appear
    /// free in the environment too (via the placeholder binding's own
    /// resolved type) and nothing would ever generalize.
    pub fn without(&self, name: &str) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.remove(name);
        Self { bindings }
    }

    /// Free variables of every scheme in this environment.
    pub fn free_vars(&self) -> HashSet<TypeVarId> {
        let mut vars = HashSet::new();
        for scheme in self.bindings.values() {
            vars.extend(scheme.free_vars());
        }
        vars
    }

    /// Apply a substitution to every scheme in this environment.
    pub fn apply(&self, s: &Substitution) -> Self {
        Self {
            bindings: self
                .bindings
                .iter()
                .map(|(k, v)| (k.clone(), v.apply(s)))
                .collect(),
        }
    }

    /// Generalize `ty` against this environment: quantify exactly the
    /// variables free in `ty` but not free in the environment.
    pub fn generalize(&self, ty: &Type) -> TypeScheme {
        let env_vars = self.free_vars();
        let mut quantified: Vec<TypeVarId> =
            ty.free_vars().into_iter().filter(|v| !env_vars.contains(v)).collect();
        quantified.sort_unstable();
        TypeScheme::poly(quantified, ty.clone())
    }

    /// Iterate over all (name, scheme) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeScheme)> {
        self.bindings.iter()
    }
}

/// Instantiate a scheme: replace each quantified variable with a fresh
/// one throughout the body.
fn instantiate(scheme: &TypeScheme, gen: &mut FreshVarGen) -> Type {
    if scheme.vars.is_empty() {
        return scheme.body.clone();
    }
    let mut s = Substitution::new();
    for &v in &scheme.vars {
        s.insert(v, gen.fresh());
    }
    scheme.body.apply(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_missing_is_unbound() {
        let env = TypeEnv::new();
        let mut gen = FreshVarGen::new();
        let err = env.lookup("x", &mut gen).unwrap_err();
        assert_eq!(err, InferError::UnboundIdentifier("x".to_string()));
    }

    #[test]
    fn lookup_missing_type_is_unbound_type_or_constructor() {
        let env = TypeEnv::new();
        let mut gen = FreshVarGen::new();
        let err = env.lookup_type("Foo", &mut gen).unwrap_err();
        assert_eq!(err, InferError::UnboundTypeOrConstructor("Foo".to_string()));
    }

    #[test]
    fn instantiate_produces_fresh_variables_each_time() {
        let env = TypeEnv::new().extend(
            "id".to_string(),
            TypeScheme::poly(vec![0], Type::Function(vec![Type::Var(0)], Box::new(Type::Var(0)))),
        );
        let mut gen = FreshVarGen::new();
        let t1 = env.lookup("id", &mut gen).unwrap();
        let t2 = env.lookup("id", &mut gen).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn generalize_quantifies_only_vars_free_in_env() {
        let env = TypeEnv::new().extend("x".to_string(), TypeScheme::mono(Type::Var(1)));
        let scheme = env.generalize(&Type::Function(vec![Type::Var(0)], Box::new(Type::Var(1))));
        assert_eq!(scheme.vars, vec![0]);
    }

    #[test]
    fn builtins_are_seeded() {
        let env = TypeEnv::with_builtins();
        let mut gen = FreshVarGen::new();
        assert_eq!(env.lookup_type("Number", &mut gen).unwrap(), Type::number());
    }
}
