//! Constraint generator: walks the AST, assigns every node a type, and
//! emits equality constraints (`spec.md` §4.6).
//!
//! Mirrors `aurora_types::infer::InferContext`'s shape (a struct owning the
//! fresh-variable supply and the running constraint/node-type accumulators,
//! with one method per AST shape) but the node-type map is keyed by the
//! plain [`crate::ast::NodeId`] this crate's AST carries rather than by
//! the teacher's span-derived identity.

use std::collections::HashMap;

use crate::ast::{Decl, Expr, ExprKind, Literal, MatchArm, Param, Pattern, PatternKind, Suffix, SuffixKind, TypeExpr};
use crate::ast::NodeId;
use crate::constraint::ConstraintSet;
use crate::env::TypeEnv;
use crate::error::InferResult;
use crate::fresh::FreshVarGen;
use crate::ty::{LiteralValue, RecordType, Type, TypeScheme, TypeVarId};
use crate::unify;

/// Owns the fresh-variable supply and the growing constraint/node-type
/// accumulators for one inference run.
#[derive(Debug, Default)]
pub struct Generator {
    pub(crate) gen: FreshVarGen,
    pub(crate) constraints: ConstraintSet,
    pub(crate) node_types: HashMap<NodeId, Type>,
}

impl Generator {
    /// A fresh generator with the counter reset (`spec.md` §4.8 step 1).
    pub fn new() -> Self {
        Self {
            gen: FreshVarGen::new(),
            constraints: ConstraintSet::new(),
            node_types: HashMap::new(),
        }
    }

    /// Consume the generator, handing back its accumulated constraints,
    /// node-type map, and fresh-variable supply.
    pub fn into_parts(self) -> (ConstraintSet, HashMap<NodeId, Type>, FreshVarGen) {
        (self.constraints, self.node_types, self.gen)
    }

    /// Process one top-level declaration, per `spec.md` §4.6's "Let
    /// declaration" and "Type declaration" bullets, returning the extended
    /// environment.
    ///
    /// `placeholder` is the fresh variable the driver pre-declared this
    /// `Let`'s name with (per §4.8 step 3); passing it lets a binding's
    /// body reference its own name recursively, resolving to the same
    /// variable the driver seeded `env` with.
    pub fn generate_decl(
        &mut self,
        env: &TypeEnv,
        decl: &Decl,
        placeholder: Option<TypeVarId>,
    ) -> InferResult<TypeEnv> {
        match decl {
            Decl::Let { name, id, body } => {
                let body_ty = self.infer_expr(env, body)?;
                if let Some(var) = placeholder {
                    self.constraints.push_equal(Type::Var(var), body_ty.clone());
                }
                let subst = unify::solve(&self.constraints, &mut self.gen)?;
                let resolved_body = subst.apply(&body_ty);
                let resolved_env = env.apply(&subst);
                // Exclude this binding's own (placeholder) entry before
                // generalizing: otherwise its free variables "leak" into
                // `resolved_env.free_vars()` by definition (it resolves to
                // `resolved_body` itself), making every variable in
                // `resolved_body` look env-bound and nothing would ever
                // generalize.
                let scheme = resolved_env.without(name).generalize(&resolved_body);
                self.node_types.insert(*id, resolved_body);
                Ok(resolved_env.extend(name.clone(), scheme))
            }
            Decl::Type { name, id, expr } => {
                let resolved = self.resolve_type_expr(env, expr)?;
                self.node_types.insert(*id, resolved);
                Ok(env.extend(
                    name.clone(),
                    TypeScheme::mono(Type::Named(name.clone(), Vec::new())),
                ))
            }
        }
    }

    /// Infer the type of an expression, recording it (and every sub-node's
    /// type) into the node-type map, and emitting constraints as needed.
    pub fn infer_expr(&mut self, env: &TypeEnv, expr: &Expr) -> InferResult<Type> {
        let ty = match &expr.kind {
            ExprKind::Int(_) => Type::number(),
            ExprKind::Str(_) => Type::string(),
            ExprKind::Bool(_) => Type::boolean(),
            ExprKind::Ident(name) => env.lookup(name, &mut self.gen)?,
            ExprKind::TypeIdent(name) => env.lookup_type(name, &mut self.gen)?,
            ExprKind::Lambda { params, body } => self.infer_lambda(env, params, body)?,
            ExprKind::Compound { primary, suffixes } => {
                self.infer_compound(env, primary, suffixes)?
            }
            ExprKind::Record(fields) => {
                let mut typed = Vec::with_capacity(fields.len());
                for (name, field_expr) in fields {
                    let field_ty = self.infer_expr(env, field_expr)?;
                    typed.push((name.clone(), field_ty));
                }
                Type::Record(RecordType::closed(typed))
            }
            ExprKind::Const { name, value, body } => {
                let value_ty = self.infer_expr(env, value)?;
                let inner_env = env.extend(name.clone(), TypeScheme::mono(value_ty));
                self.infer_expr(&inner_env, body)?
            }
            ExprKind::Match { scrutinee, arms } => self.infer_match(env, scrutinee, arms)?,
        };
        self.node_types.insert(expr.id, ty.clone());
        Ok(ty)
    }

    fn infer_lambda(&mut self, env: &TypeEnv, params: &[Param], body: &Expr) -> InferResult<Type> {
        let mut param_types = Vec::with_capacity(params.len());
        let mut inner_env = env.clone();
        for param in params {
            let param_ty = match &param.annotation {
                Some(annotation) => self.resolve_type_expr(env, annotation)?,
                None => self.gen.fresh(),
            };
            self.node_types.insert(param.id, param_ty.clone());
            inner_env = inner_env.extend(param.name.clone(), TypeScheme::mono(param_ty.clone()));
            param_types.push(param_ty);
        }
        let body_ty = self.infer_expr(&inner_env, body)?;
        Ok(Type::Function(param_types, Box::new(body_ty)))
    }

    fn infer_compound(
        &mut self,
        env: &TypeEnv,
        primary: &Expr,
        suffixes: &[Suffix],
    ) -> InferResult<Type> {
        let mut current = self.infer_expr(env, primary)?;
        for suffix in suffixes {
            current = match &suffix.kind {
                SuffixKind::Call(args) => {
                    let mut arg_types = Vec::with_capacity(args.len());
                    for arg in args {
                        arg_types.push(self.infer_expr(env, arg)?);
                    }
                    let result = self.gen.fresh();
                    self.constraints.push_equal(
                        current.clone(),
                        Type::Function(arg_types, Box::new(result.clone())),
                    );
                    result
                }
                SuffixKind::Access(field) => {
                    let field_ty = self.gen.fresh();
                    let row = self.gen.fresh_id();
                    self.constraints.push_equal(
                        current.clone(),
                        Type::Record(RecordType::open(
                            vec![(field.clone(), field_ty.clone())],
                            row,
                        )),
                    );
                    field_ty
                }
            };
            self.node_types.insert(suffix.id, current.clone());
        }
        Ok(current)
    }

    fn infer_match(
        &mut self,
        env: &TypeEnv,
        scrutinee: &Expr,
        arms: &[MatchArm],
    ) -> InferResult<Type> {
        let scrutinee_ty = self.infer_expr(env, scrutinee)?;
        let result = self.gen.fresh();
        for arm in arms {
            let (pattern_ty, bindings) = self.infer_pattern(env, &arm.pattern)?;
            self.constraints
                .push_equal(scrutinee_ty.clone(), pattern_ty);
            let mut arm_env = env.clone();
            for (name, ty) in bindings {
                arm_env = arm_env.extend(name, TypeScheme::mono(ty));
            }
            let body_ty = self.infer_expr(&arm_env, &arm.body)?;
            self.constraints.push_equal(result.clone(), body_ty);
        }
        Ok(result)
    }

    /// Infer a pattern's type and the bindings it introduces (`Δ` in
    /// `spec.md` §4.6), recording the pattern node's own type as well.
    fn infer_pattern(
        &mut self,
        env: &TypeEnv,
        pattern: &Pattern,
    ) -> InferResult<(Type, Vec<(String, Type)>)> {
        let (ty, bindings) = match &pattern.kind {
            PatternKind::Var(name) => {
                let var_ty = self.gen.fresh();
                (var_ty.clone(), vec![(name.clone(), var_ty)])
            }
            PatternKind::Literal(lit) => (literal_base_type(lit), Vec::new()),
            PatternKind::Record(fields) => {
                let mut typed = Vec::with_capacity(fields.len());
                let mut bindings = Vec::new();
                for (name, sub_pattern) in fields {
                    let (sub_ty, sub_bindings) = self.infer_pattern(env, sub_pattern)?;
                    typed.push((name.clone(), sub_ty));
                    bindings.extend(sub_bindings);
                }
                (Type::Record(RecordType::closed(typed)), bindings)
            }
            PatternKind::Constructor(name, args) => {
                let ctor_ty = env.lookup_type(name, &mut self.gen)?;
                let mut arg_types = Vec::with_capacity(args.len());
                let mut bindings = Vec::new();
                for arg in args {
                    let (arg_ty, arg_bindings) = self.infer_pattern(env, arg)?;
                    arg_types.push(arg_ty);
                    bindings.extend(arg_bindings);
                }
                let result = self.gen.fresh();
                self.constraints.push_equal(
                    ctor_ty,
                    Type::Function(arg_types, Box::new(result.clone())),
                );
                (result, bindings)
            }
        };
        self.node_types.insert(pattern.id, ty.clone());
        Ok((ty, bindings))
    }

    /// Resolve a surface type annotation to a core type, per `spec.md`
    /// §4.6.1.
    pub fn resolve_type_expr(&mut self, env: &TypeEnv, texpr: &TypeExpr) -> InferResult<Type> {
        Ok(match texpr {
            TypeExpr::Name(name) => env.lookup_type(name, &mut self.gen)?,
            TypeExpr::Record(fields) => {
                let mut typed = Vec::with_capacity(fields.len());
                for (name, field_expr) in fields {
                    typed.push((name.clone(), self.resolve_type_expr(env, field_expr)?));
                }
                Type::Record(RecordType::closed(typed))
            }
            // Right-associated: `a -> b -> c` parses as `Arrow(a, Arrow(b, c))`.
            TypeExpr::Arrow(param, ret) => {
                let param_ty = self.resolve_type_expr(env, param)?;
                let ret_ty = self.resolve_type_expr(env, ret)?;
                Type::Function(vec![param_ty], Box::new(ret_ty))
            }
            TypeExpr::Union(parts) => {
                let mut typed = Vec::with_capacity(parts.len());
                for part in parts {
                    typed.push(self.resolve_type_expr(env, part)?);
                }
                Type::Union(typed)
            }
            TypeExpr::Intersection(parts) => {
                let mut typed = Vec::with_capacity(parts.len());
                for part in parts {
                    typed.push(self.resolve_type_expr(env, part)?);
                }
                Type::Intersection(typed)
            }
            TypeExpr::Literal(lit) => literal_refinement_type(lit),
        })
    }
}

fn literal_base_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::number(),
        Literal::Str(_) => Type::string(),
        Literal::Bool(_) => Type::boolean(),
    }
}

fn literal_refinement_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(n) => Type::Literal(LiteralValue::Int(*n), crate::ty::NUMBER.to_string()),
        Literal::Str(s) => {
            Type::Literal(LiteralValue::Str(s.clone()), crate::ty::STRING.to_string())
        }
        Literal::Bool(b) => {
            Type::Literal(LiteralValue::Bool(*b), crate::ty::BOOLEAN.to_string())
        }
    }
}
