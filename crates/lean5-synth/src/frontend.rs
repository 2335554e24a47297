//! Collaborator seams
//!
//! The resolver decides *when* to retry a pending metavariable; *how* to
//! solve one is delegated to the collaborators below. Each receives the
//! state it needs by reference. The term elaborator and the tactic
//! evaluator receive the whole `SynthCtx` because they may register new
//! pending metavariables or run nested resolutions.

use crate::context::SynthCtx;
use crate::error::ElabResult;
use lean5_meta::{Expr, LocalContext, MVarId, MetavarContext, Syntax};

/// Type class instance search
pub trait InstanceSearch {
    /// Find an instance of `ty` in `lctx`. `Exception::Postpone` means the
    /// problem cannot be decided yet (typically `ty` still contains
    /// unassigned metavariables).
    fn synth_instance(&self, mctx: &mut MetavarContext, lctx: &LocalContext, ty: &Expr) -> ElabResult<Expr>;

    /// Default instance for a problem that is otherwise stuck, e.g.
    /// `OfNat ?α 2` defaulting `?α := Nat`. May assign metavariables of `ty`.
    fn default_instance(
        &self,
        _mctx: &mut MetavarContext,
        _lctx: &LocalContext,
        _ty: &Expr,
    ) -> ElabResult<Option<Expr>> {
        Ok(None)
    }
}

/// Definitional equality and coercion insertion
pub trait DefEq {
    /// Unify `a` and `b`, assigning metavariables on success. Leaves the
    /// context untouched on failure.
    fn is_def_eq(&self, mctx: &mut MetavarContext, a: &Expr, b: &Expr) -> bool;

    /// Return a term of type `expected` built from `e : e_type`, inserting
    /// a coercion if needed.
    fn ensure_has_type(
        &self,
        mctx: &mut MetavarContext,
        lctx: &LocalContext,
        expected: &Expr,
        e: &Expr,
        e_type: &Expr,
    ) -> ElabResult<Expr>;
}

/// The general term elaborator
pub trait TermElaborator {
    /// Elaborate `stx` against the optional expected type. With
    /// `errors_to_sorry`, recoverable errors are logged and replaced by the
    /// error sentinel instead of being returned.
    fn elab_term(
        &self,
        ctx: &mut SynthCtx<'_>,
        stx: &Syntax,
        expected: Option<&Expr>,
        errors_to_sorry: bool,
    ) -> ElabResult<Expr>;
}

/// Tactic framework
pub trait TacticEvaluator {
    /// Run `code` on `goals`, returning the goals left unsolved
    fn run_tactic(&self, ctx: &mut SynthCtx<'_>, code: &Syntax, goals: Vec<MVarId>) -> ElabResult<Vec<MVarId>>;
}

/// The collaborators used by one resolution
#[derive(Clone, Copy)]
pub struct Frontend<'a> {
    pub instances: &'a dyn InstanceSearch,
    pub def_eq: &'a dyn DefEq,
    pub elaborator: &'a dyn TermElaborator,
    pub tactics: &'a dyn TacticEvaluator,
}

impl<'a> Frontend<'a> {
    pub fn new(
        instances: &'a dyn InstanceSearch,
        def_eq: &'a dyn DefEq,
        elaborator: &'a dyn TermElaborator,
        tactics: &'a dyn TacticEvaluator,
    ) -> Self {
        Self {
            instances,
            def_eq,
            elaborator,
            tactics,
        }
    }
}
