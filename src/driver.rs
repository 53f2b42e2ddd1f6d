//! Inference driver: orchestrates the passes described in `spec.md` §4.8
//! and exposes this crate's two external entry points (§6).
//!
//! Mirrors `aurorac::driver`'s phase-boundary logging style
//! (`tracing::info!("Starting compilation of {:?}", ...)`) but, being a
//! library rather than a binary, never installs a subscriber itself.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::ast::{Decl, NodeId, Program};
use crate::env::TypeEnv;
use crate::error::InferResult;
use crate::fresh::FreshVarGen;
use crate::generator::Generator;
use crate::ty::{Type, TypeScheme};

/// Knobs for one `infer` call. Analogous in spirit to `aurorac`'s
/// `CompilationOptions`, scaled down to what a library entry point needs.
#[derive(Debug, Clone)]
pub struct InferConfig {
    /// Seed `Number`/`String`/`Boolean`/`Any`/`Nothing` into the initial
    /// environment. Disabling this is only useful for embedders supplying
    /// their own prelude; the core's own tests always leave it on.
    pub seed_builtins: bool,
    /// Emit phase-boundary events at `info` level instead of `debug`.
    pub verbose: bool,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            seed_builtins: true,
            verbose: false,
        }
    }
}

impl InferConfig {
    fn log_phase(&self, message: &str) {
        if self.verbose {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }
}

/// Run the six steps of `spec.md` §4.8 over `program`, returning the
/// resolved top-level environment and the per-node type map.
pub fn infer(
    program: &Program,
    config: &InferConfig,
) -> InferResult<(TypeEnv, HashMap<NodeId, Type>)> {
    // Step 1: reset the fresh-variable counter (a new `FreshVarGen` already
    // starts at zero; "reset" here just means this run owns a fresh one).
    config.log_phase("resetting fresh-variable counter");
    let mut generator = Generator::new();

    // Step 2: seed built-ins.
    let mut env = if config.seed_builtins {
        TypeEnv::with_builtins()
    } else {
        TypeEnv::new()
    };
    config.log_phase("seeded built-in environment");

    // Step 3: pre-declare every top-level `let`/`type` name.
    let mut let_placeholders: HashMap<String, u32> = HashMap::new();
    for decl in &program.decls {
        match decl {
            Decl::Let { name, .. } => {
                let placeholder = generator_fresh_placeholder(&mut generator);
                let_placeholders.insert(name.clone(), placeholder);
                env = env.extend(name.clone(), TypeScheme::mono(Type::Var(placeholder)));
            }
            Decl::Type { name, .. } => {
                env = env.extend(
                    name.clone(),
                    TypeScheme::mono(Type::Named(name.clone(), Vec::new())),
                );
            }
        }
    }
    config.log_phase(&format!(
        "pre-declared {} top-level name(s)",
        program.decls.len()
    ));

    // Step 4: generate constraints for each declaration, sequentially.
    // Step 4.6's "Let declaration" rule folds solve+generalize into each
    // binding as it's processed, so by the time this loop ends every
    // binding has already been solved and generalized once.
    for decl in &program.decls {
        let name = match decl {
            Decl::Let { name, .. } => Some(name.as_str()),
            Decl::Type { name, .. } => Some(name.as_str()),
        };
        config.log_phase(&format!("generating constraints for {:?}", name));
        let placeholder = match decl {
            Decl::Let { name, .. } => let_placeholders.get(name).copied(),
            Decl::Type { .. } => None,
        };
        env = generator.generate_decl(&env, decl, placeholder)?;
    }

    // Step 5: final solve, applying the substitution to every node-type
    // binding and every environment scheme, for idempotent output even
    // though each binding was already solved incrementally (per §9: an
    // implementation may fuse the two passes; this one keeps them visibly
    // separate instead).
    config.log_phase("solving final constraint set");
    let (constraints, mut node_types, mut gen) = generator.into_parts();
    let final_subst = crate::unify::solve(&constraints, &mut gen)?;
    for ty in node_types.values_mut() {
        *ty = final_subst.apply(ty);
    }
    let env = env.apply(&final_subst);

    // Step 6.
    config.log_phase("inference complete");
    Ok((env, node_types))
}

fn generator_fresh_placeholder(generator: &mut Generator) -> u32 {
    generator.gen.fresh_id()
}

/// Convenience wrapper: `infer` with default configuration, pretty-printing
/// each of the program's own top-level scheme bodies (`spec.md` §6).
///
/// Only names the program itself declares are included — not the seeded
/// builtins (`Number`, `String`, ...), which live in the same environment
/// but aren't "top-level" in the sense this entry point means.
pub fn inferred_types_as_strings(program: &Program) -> InferResult<HashMap<String, String>> {
    let (env, _) = infer(program, &InferConfig::default())?;
    Ok(program
        .decls
        .iter()
        .filter_map(|decl| {
            let name = match decl {
                Decl::Let { name, .. } | Decl::Type { name, .. } => name,
            };
            env.scheme(name).map(|scheme| (name.clone(), scheme.body.pretty()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind, Param};

    fn lambda_identity(id: NodeId, param_id: NodeId, body_id: NodeId) -> Expr {
        Expr::new(
            id,
            ExprKind::Lambda {
                params: vec![Param {
                    id: param_id,
                    name: "x".to_string(),
                    annotation: None,
                }],
                body: Box::new(Expr::new(body_id, ExprKind::Ident("x".to_string()))),
            },
        )
    }

    #[test]
    fn identity_generalizes_to_a_single_polymorphic_variable() {
        let program = Program::new(vec![Decl::Let {
            name: "identity".to_string(),
            id: 0,
            body: lambda_identity(1, 2, 3),
        }]);
        let types = inferred_types_as_strings(&program).unwrap();
        let ty = &types["identity"];
        // T<k> -> T<k> for some single k.
        let parts: Vec<&str> = ty.split(" -> ").collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], parts[1]);
        assert!(parts[0].starts_with('T'));
    }

    #[test]
    fn sequential_let_reuses_prior_generalization() {
        // let identity => fn(x) => x; let r => identity(5);
        let program = Program::new(vec![
            Decl::Let {
                name: "identity".to_string(),
                id: 0,
                body: lambda_identity(1, 2, 3),
            },
            Decl::Let {
                name: "r".to_string(),
                id: 4,
                body: Expr::new(
                    5,
                    ExprKind::Compound {
                        primary: Box::new(Expr::new(6, ExprKind::Ident("identity".to_string()))),
                        suffixes: vec![crate::ast::Suffix {
                            id: 7,
                            kind: crate::ast::SuffixKind::Call(vec![Expr::new(
                                8,
                                ExprKind::Int(5),
                            )]),
                        }],
                    },
                ),
            },
        ]);
        let types = inferred_types_as_strings(&program).unwrap();
        assert_eq!(types["r"], "Number");
    }

    #[test]
    fn polymorphic_let_is_usable_at_two_distinct_types() {
        // let identity => fn(x) => x; let a => identity(5); let b => identity("hi");
        // Regression for the generalization bug where `identity`'s own
        // pre-declared placeholder leaked into its generalizing environment:
        // both call sites would then share one monomorphic variable and the
        // second call would spuriously fail to unify against the first.
        let program = Program::new(vec![
            Decl::Let {
                name: "identity".to_string(),
                id: 0,
                body: lambda_identity(1, 2, 3),
            },
            Decl::Let {
                name: "a".to_string(),
                id: 4,
                body: Expr::new(
                    5,
                    ExprKind::Compound {
                        primary: Box::new(Expr::new(6, ExprKind::Ident("identity".to_string()))),
                        suffixes: vec![crate::ast::Suffix {
                            id: 7,
                            kind: crate::ast::SuffixKind::Call(vec![Expr::new(
                                8,
                                ExprKind::Int(5),
                            )]),
                        }],
                    },
                ),
            },
            Decl::Let {
                name: "b".to_string(),
                id: 9,
                body: Expr::new(
                    10,
                    ExprKind::Compound {
                        primary: Box::new(Expr::new(11, ExprKind::Ident("identity".to_string()))),
                        suffixes: vec![crate::ast::Suffix {
                            id: 12,
                            kind: crate::ast::SuffixKind::Call(vec![Expr::new(
                                13,
                                ExprKind::Str("hi".to_string()),
                            )]),
                        }],
                    },
                ),
            },
        ]);
        let types = inferred_types_as_strings(&program).unwrap();
        assert_eq!(types["a"], "Number");
        assert_eq!(types["b"], "String");
    }

    #[test]
    fn verbose_config_logs_phase_boundaries_at_info_level() {
        // Installs a real subscriber so `InferConfig { verbose: true, .. }`
        // actually exercises the `info!` branch of `log_phase` under a test
        // harness, rather than just the default `debug!` one. `try_init`
        // rather than `init` since other tests in this binary may run first.
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::INFO)
            .try_init();

        let program = Program::new(vec![Decl::Let {
            name: "identity".to_string(),
            id: 0,
            body: lambda_identity(1, 2, 3),
        }]);
        let config = InferConfig {
            verbose: true,
            ..Default::default()
        };
        let (env, _) = infer(&program, &config).unwrap();
        assert!(env.scheme("identity").is_some());
    }

    #[test]
    fn lambda_parameter_is_not_generalized_but_let_binding_is() {
        // A lambda parameter used twice in its own body must unify to one
        // monomorphic type, unlike a generalized top-level let.
        let program = Program::new(vec![Decl::Let {
            name: "same".to_string(),
            id: 0,
            body: Expr::new(
                1,
                ExprKind::Lambda {
                    params: vec![
                        Param {
                            id: 2,
                            name: "x".to_string(),
                            annotation: None,
                        },
                        Param {
                            id: 3,
                            name: "y".to_string(),
                            annotation: None,
                        },
                    ],
                    body: Box::new(Expr::new(
                        4,
                        ExprKind::Record(vec![
                            ("a".to_string(), Expr::new(5, ExprKind::Ident("x".to_string()))),
                            ("b".to_string(), Expr::new(6, ExprKind::Ident("x".to_string()))),
                        ]),
                    )),
                },
            ),
        }]);
        let types = inferred_types_as_strings(&program).unwrap();
        // `y` is unconstrained and unused, so it stays a free variable;
        // what matters is that both occurrences of `x` in the body share
        // identity, which a failed monomorphic binding would break.
        assert!(types["same"].contains("rect { a: "));
    }
}
