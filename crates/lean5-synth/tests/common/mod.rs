//! Shared fixture for the integration tests: a toy term elaborator, a toy
//! tactic evaluator and an instance table with a few classes.

#![allow(dead_code)]

use lean5_meta::{Expr, MVarId, MetavarKind, Name, SourceInfo, Syntax};
use lean5_synth::{
    ElabResult, ElabState, Exception, Frontend, InstanceTable, SynthConfig, SynthCtx, TacticEvaluator,
    TermElaborator, Unifier, DEFAULT_PRIORITY,
};

pub const HOLE: &str = "term.hole";
pub const ANONYMOUS_CTOR: &str = "term.anonymousCtor";
pub const FORCED_ERROR: &str = "term.error";
pub const BY_TACTIC: &str = "term.byTactic";
pub const EXACT: &str = "tactic.exact";

pub fn pos(start: usize) -> SourceInfo {
    SourceInfo::new(start, start + 1)
}

pub fn ident(start: usize, name: &str) -> Syntax {
    Syntax::ident(pos(start), name)
}

pub fn num(start: usize, n: u64) -> Syntax {
    Syntax::atom(pos(start), &n.to_string())
}

/// `⟨a, b, ...⟩`
pub fn anonymous_ctor(start: usize, args: Vec<Syntax>) -> Syntax {
    Syntax::node(pos(start), ANONYMOUS_CTOR, args)
}

pub fn hole(start: usize) -> Syntax {
    Syntax::node(pos(start), HOLE, vec![])
}

pub fn forced_error(start: usize) -> Syntax {
    Syntax::node(pos(start), FORCED_ERROR, vec![])
}

pub fn tactic(start: usize, name: &str) -> Syntax {
    Syntax::atom(pos(start), name)
}

pub fn exact(start: usize, term: Syntax) -> Syntax {
    Syntax::node(pos(start), EXACT, vec![term])
}

pub fn by_tactic(start: usize, code: Syntax) -> Syntax {
    Syntax::node(pos(start), BY_TACTIC, vec![code])
}

pub fn c(name: &str) -> Expr {
    Expr::const_(name)
}

pub fn app(f: &str, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::mk_app(Expr::const_(f), args)
}

pub fn nat() -> Expr {
    c("Nat")
}

/// Elaborates identifiers, numerals, holes, anonymous constructors for
/// `Prod`, tactic blocks and a term that always fails
pub struct ToyElab;

impl ToyElab {
    fn elab_core(&self, ctx: &mut SynthCtx<'_>, stx: &Syntax, expected: Option<&Expr>) -> ElabResult<Expr> {
        if let Some(name) = stx.as_ident() {
            return Ok(match ctx.lctx().find_by_name(name) {
                Some(decl) => Expr::fvar(decl.fvar),
                None => Expr::const_(name.clone()),
            });
        }
        if let Some(atom) = stx.as_atom() {
            return atom
                .parse::<u64>()
                .map(Expr::nat_lit)
                .map_err(|_| Exception::msg(format!("unexpected token '{atom}'")));
        }
        if stx.is_of_kind(HOLE) {
            let ty = match expected {
                Some(ty) => ty.clone(),
                None => ctx.mctx_mut().mk_fresh_type_mvar(&Default::default()),
            };
            return Ok(Expr::mvar(ctx.mk_fresh_mvar(ty, MetavarKind::Natural)));
        }
        if stx.is_of_kind(ANONYMOUS_CTOR) {
            return self.elab_anonymous_ctor(ctx, stx, expected);
        }
        if stx.is_of_kind(BY_TACTIC) {
            let code = stx.child(0).cloned().unwrap_or_else(Syntax::missing);
            let ty = match expected {
                Some(ty) => ty.clone(),
                None => return Err(Exception::msg("invalid 'by' tactic, expected type must be known")),
            };
            return Ok(ctx.register_tactic_block(stx, code, ty)?);
        }
        if stx.is_of_kind(FORCED_ERROR) {
            return Err(Exception::msg("forced error"));
        }
        Err(Exception::msg(format!("unexpected syntax\n  {stx}")))
    }

    fn elab_anonymous_ctor(&self, ctx: &mut SynthCtx<'_>, stx: &Syntax, expected: Option<&Expr>) -> ElabResult<Expr> {
        let expected = expected.map(|ty| ctx.instantiate(ty));
        let known = match &expected {
            Some(ty) if !ty.get_app_fn().is_mvar() => ty.clone(),
            _ => {
                ctx.try_postpone()?;
                return Err(Exception::msg(format!(
                    "invalid constructor ⟨...⟩, expected type must be known\n  {stx}"
                )));
            }
        };
        let args = known.get_app_args();
        match (known.get_app_fn().const_name(), args.as_slice(), stx.children()) {
            (Some(head), [a, b], [x, y]) if *head == Name::from_string("Prod") => {
                let (a, b) = ((*a).clone(), (*b).clone());
                let x = self.elab_arg(ctx, x, &a)?;
                let y = self.elab_arg(ctx, y, &b)?;
                Ok(app("Prod.mk", [a, b, x, y]))
            }
            _ => Err(Exception::msg(format!(
                "invalid constructor ⟨...⟩, expected type must be an inductive type\n  {known}"
            ))),
        }
    }

    /// Nested terms that cannot be elaborated yet are postponed on their own
    fn elab_arg(&self, ctx: &mut SynthCtx<'_>, stx: &Syntax, expected: &Expr) -> ElabResult<Expr> {
        match self.elab_core(ctx, stx, Some(expected)) {
            Err(Exception::Postpone) => Ok(ctx.postpone_elab_term(stx, Some(expected))?),
            other => other,
        }
    }
}

impl TermElaborator for ToyElab {
    fn elab_term(
        &self,
        ctx: &mut SynthCtx<'_>,
        stx: &Syntax,
        expected: Option<&Expr>,
        errors_to_sorry: bool,
    ) -> ElabResult<Expr> {
        match self.elab_core(ctx, stx, expected) {
            Err(Exception::Error(err)) if errors_to_sorry => {
                ctx.log_error(stx, err);
                let ty = match expected {
                    Some(ty) => ty.clone(),
                    None => ctx.mctx_mut().mk_fresh_type_mvar(&Default::default()),
                };
                Ok(Expr::sorry(ty))
            }
            other => other,
        }
    }
}

/// `skip`, `fail`, `trivial`, `assumption` and `exact t`, each acting on
/// the first goal
pub struct ToyTactics;

impl ToyTactics {
    fn goal_type(ctx: &mut SynthCtx<'_>, goal: MVarId) -> ElabResult<Expr> {
        Ok(ctx.mctx_mut().instantiate_decl_type(goal)?)
    }
}

impl TacticEvaluator for ToyTactics {
    fn run_tactic(&self, ctx: &mut SynthCtx<'_>, code: &Syntax, goals: Vec<MVarId>) -> ElabResult<Vec<MVarId>> {
        let Some((&main, rest)) = goals.split_first() else {
            return Err(Exception::msg("no goals to be proved"));
        };
        let rest = rest.to_vec();
        if code.is_of_kind(EXACT) {
            let term = code.child(0).cloned().unwrap_or_else(Syntax::missing);
            let elaborator = ctx.frontend().elaborator;
            ctx.with_mvar_context(main, |ctx| {
                let ty = Self::goal_type(ctx, main)?;
                let value = elaborator.elab_term(ctx, &term, Some(&ty), false)?;
                let value = ctx.instantiate(&value);
                ctx.mctx_mut().assign(main, value)?;
                Ok(rest)
            })
        } else {
            match code.as_atom() {
                Some("skip") => Ok(goals),
                Some("fail") => Err(Exception::msg("tactic 'fail' failed")),
                Some("trivial") => {
                    let ty = Self::goal_type(ctx, main)?;
                    if ty != c("True") {
                        return Err(Exception::msg(format!("tactic 'trivial' failed, goal\n  {ty}")));
                    }
                    ctx.mctx_mut().assign(main, c("True.intro"))?;
                    Ok(rest)
                }
                Some("assumption") => ctx.with_mvar_context(main, |ctx| {
                    let ty = Self::goal_type(ctx, main)?;
                    let hyp = ctx.lctx().iter().rev().find(|decl| decl.ty == ty).map(|decl| decl.fvar);
                    match hyp {
                        Some(fvar) => {
                            ctx.mctx_mut().assign(main, Expr::fvar(fvar))?;
                            Ok(rest)
                        }
                        None => Err(Exception::msg("tactic 'assumption' failed")),
                    }
                }),
                _ => Err(Exception::msg(format!("unknown tactic\n  {code}"))),
            }
        }
    }
}

/// State plus collaborators for one test
pub struct Fixture {
    pub state: ElabState,
    pub instances: InstanceTable,
    pub unifier: Unifier,
    pub elab: ToyElab,
    pub tactics: ToyTactics,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(SynthConfig::default())
    }

    pub fn with_config(config: SynthConfig) -> Self {
        let mut instances = InstanceTable::new();
        for class in ["Monad", "Decidable", "Inhabited", "OfNat"] {
            instances.register_class(Name::from_string(class), 1, vec![]);
        }
        add_instance(&mut instances, "instMonadList", "Monad", c("List"));
        add_instance(&mut instances, "instDecidableTrue", "Decidable", c("True"));
        add_instance(&mut instances, "instInhabitedNat", "Inhabited", nat());
        add_instance(&mut instances, "instOfNatNat", "OfNat", nat());
        instances.register_class(Name::from_string("HAdd"), 3, vec![2]);
        instances.add_instance(
            Name::from_string("instHAddNat"),
            Name::from_string("HAdd"),
            c("instHAddNat"),
            app("HAdd", [nat(), nat(), nat()]),
            DEFAULT_PRIORITY,
        );
        instances.add_default_instance(
            Name::from_string("instOfNatNat"),
            Name::from_string("OfNat"),
            c("instOfNatNat"),
            app("OfNat", [nat()]),
            100,
        );

        let mut unifier = Unifier::new();
        unifier.add_coercion("Nat", "Int", "Int.ofNat");

        Self {
            state: ElabState::with_config(config).in_decl("test"),
            instances,
            unifier,
            elab: ToyElab,
            tactics: ToyTactics,
        }
    }

    pub fn ctx(&mut self) -> SynthCtx<'_> {
        let frontend = Frontend::new(&self.instances, &self.unifier, &self.elab, &self.tactics);
        SynthCtx::new(&mut self.state, frontend)
    }

    pub fn error_texts(&self) -> Vec<String> {
        self.state.messages.errors().map(|m| m.text.clone()).collect()
    }
}

fn add_instance(table: &mut InstanceTable, name: &str, class: &str, arg: Expr) {
    table.add_instance(
        Name::from_string(name),
        Name::from_string(class),
        c(name),
        app(class, [arg]),
        DEFAULT_PRIORITY,
    );
}
