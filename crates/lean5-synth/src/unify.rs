//! First-order unification and coercion insertion
//!
//! A structural unifier over `Expr`: metavariables unify with anything they
//! do not occur in, applications and binders unify componentwise. There is
//! no reduction. Synthetic-opaque metavariables are never assigned here;
//! problems that would need one are `Stuck`.
//!
//! Coercions are looked up by the head constants of the source and target
//! types and inserted as `f e`.

use crate::error::{ElabError, ElabResult, Exception};
use crate::frontend::DefEq;
use hashbrown::HashMap;
use lean5_meta::{Expr, LocalContext, MVarId, MetavarContext, MetavarKind, Name};

/// Result of a unification problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyResult {
    Success,
    Failure(String),
    /// Needs an assignment this unifier is not allowed to make
    Stuck,
}

impl UnifyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UnifyResult::Success)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Unifier {
    /// `(source head, target head)` to coercion function
    coercions: HashMap<(Name, Name), Name>,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func : from → to` as a coercion
    pub fn add_coercion(&mut self, from: impl Into<Name>, to: impl Into<Name>, func: impl Into<Name>) {
        self.coercions.insert((from.into(), to.into()), func.into());
    }

    pub fn find_coercion(&self, from: &Name, to: &Name) -> Option<&Name> {
        self.coercions.get(&(from.clone(), to.clone()))
    }

    /// Unify `a` and `b`. Assignments made before a failure are kept; use
    /// `is_def_eq` for an all-or-nothing check.
    pub fn unify(&self, mctx: &mut MetavarContext, a: &Expr, b: &Expr) -> UnifyResult {
        let a = mctx.instantiate_mvars(a);
        let b = mctx.instantiate_mvars(b);
        if a == b {
            return UnifyResult::Success;
        }
        match (&a, &b) {
            (Expr::MVar(m), _) if self.assignable(mctx, *m) => self.assign(mctx, *m, &b),
            (_, Expr::MVar(m)) if self.assignable(mctx, *m) => self.assign(mctx, *m, &a),
            (Expr::MVar(_), _) | (_, Expr::MVar(_)) => UnifyResult::Stuck,
            (Expr::App(f1, a1), Expr::App(f2, a2)) => match self.unify(mctx, f1, f2) {
                UnifyResult::Success => self.unify(mctx, a1, a2),
                other => other,
            },
            (Expr::Lam(_, t1, b1), Expr::Lam(_, t2, b2)) | (Expr::Pi(_, t1, b1), Expr::Pi(_, t2, b2)) => {
                match self.unify(mctx, t1, t2) {
                    UnifyResult::Success => self.unify(mctx, b1, b2),
                    other => other,
                }
            }
            _ => UnifyResult::Failure(format!("{a} =?= {b}")),
        }
    }

    fn assignable(&self, mctx: &MetavarContext, mvar: MVarId) -> bool {
        mctx.get_decl(mvar)
            .map(|decl| decl.kind != MetavarKind::SyntheticOpaque)
            .unwrap_or(false)
    }

    fn assign(&self, mctx: &mut MetavarContext, mvar: MVarId, value: &Expr) -> UnifyResult {
        if value.occurs(mvar) {
            return UnifyResult::Failure(format!("occurs check failed: {mvar} in {value}"));
        }
        match mctx.assign(mvar, value.clone()) {
            Ok(()) => UnifyResult::Success,
            Err(err) => UnifyResult::Failure(err.to_string()),
        }
    }

    fn coerce(&self, mctx: &MetavarContext, expected: &Expr, e: &Expr, e_type: &Expr) -> Option<Expr> {
        let from = mctx.instantiate_mvars(e_type);
        let to = mctx.instantiate_mvars(expected);
        let func = self.find_coercion(from.get_app_fn().const_name()?, to.get_app_fn().const_name()?)?;
        Some(Expr::app(Expr::const_(func.clone()), e.clone()))
    }
}

impl DefEq for Unifier {
    fn is_def_eq(&self, mctx: &mut MetavarContext, a: &Expr, b: &Expr) -> bool {
        let checkpoint = mctx.clone();
        let result = self.unify(mctx, a, b);
        tracing::trace!(%a, %b, ?result, "is_def_eq");
        if result.is_success() {
            true
        } else {
            *mctx = checkpoint;
            false
        }
    }

    fn ensure_has_type(
        &self,
        mctx: &mut MetavarContext,
        _lctx: &LocalContext,
        expected: &Expr,
        e: &Expr,
        e_type: &Expr,
    ) -> ElabResult<Expr> {
        if self.is_def_eq(mctx, expected, e_type) {
            return Ok(e.clone());
        }
        if let Some(coerced) = self.coerce(mctx, expected, e, e_type) {
            return Ok(coerced);
        }
        if mctx.has_unassigned_mvar(expected) || mctx.has_unassigned_mvar(e_type) {
            return Err(Exception::Postpone);
        }
        Err(ElabError::type_mismatch(
            None,
            &mctx.instantiate_mvars(expected),
            &mctx.instantiate_mvars(e_type),
            e,
            None,
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(mctx: &mut MetavarContext, kind: MetavarKind) -> MVarId {
        mctx.mk_fresh_mvar(Expr::type_(), &LocalContext::new(), kind)
    }

    #[test]
    fn test_unify_assigns_under_application() {
        let mut mctx = MetavarContext::new();
        let m = fresh(&mut mctx, MetavarKind::Natural);
        let a = Expr::app(Expr::const_("Monad"), Expr::mvar(m));
        let b = Expr::app(Expr::const_("Monad"), Expr::const_("List"));
        assert_eq!(Unifier::new().unify(&mut mctx, &a, &b), UnifyResult::Success);
        assert_eq!(mctx.get_assignment(m), Some(&Expr::const_("List")));
    }

    #[test]
    fn test_occurs_check() {
        let mut mctx = MetavarContext::new();
        let m = fresh(&mut mctx, MetavarKind::Natural);
        let b = Expr::app(Expr::const_("List"), Expr::mvar(m));
        let result = Unifier::new().unify(&mut mctx, &Expr::mvar(m), &b);
        assert!(matches!(result, UnifyResult::Failure(_)));
        assert!(!mctx.is_assigned(m));
    }

    #[test]
    fn test_opaque_mvars_are_stuck() {
        let mut mctx = MetavarContext::new();
        let m = fresh(&mut mctx, MetavarKind::SyntheticOpaque);
        let result = Unifier::new().unify(&mut mctx, &Expr::mvar(m), &Expr::const_("Nat"));
        assert_eq!(result, UnifyResult::Stuck);
    }

    #[test]
    fn test_is_def_eq_rolls_back_on_failure() {
        let mut mctx = MetavarContext::new();
        let m = fresh(&mut mctx, MetavarKind::Natural);
        let a = Expr::mk_app(Expr::const_("Prod"), [Expr::mvar(m), Expr::const_("Nat")]);
        let b = Expr::mk_app(Expr::const_("Prod"), [Expr::const_("Bool"), Expr::const_("Int")]);
        assert!(!Unifier::new().is_def_eq(&mut mctx, &a, &b));
        assert!(!mctx.is_assigned(m));
    }

    #[test]
    fn test_ensure_has_type_inserts_coercion() {
        let mut unifier = Unifier::new();
        unifier.add_coercion("Nat", "Int", "Int.ofNat");
        let mut mctx = MetavarContext::new();
        let lctx = LocalContext::new();
        let e = Expr::nat_lit(3);
        let coerced = unifier
            .ensure_has_type(&mut mctx, &lctx, &Expr::const_("Int"), &e, &Expr::const_("Nat"))
            .unwrap();
        assert_eq!(coerced, Expr::app(Expr::const_("Int.ofNat"), e));
    }

    #[test]
    fn test_ensure_has_type_postpones_on_mvars_and_fails_otherwise() {
        let unifier = Unifier::new();
        let mut mctx = MetavarContext::new();
        let lctx = LocalContext::new();
        let m = fresh(&mut mctx, MetavarKind::SyntheticOpaque);
        let e = Expr::const_("x");
        let result = unifier.ensure_has_type(&mut mctx, &lctx, &Expr::mvar(m), &e, &Expr::const_("Nat"));
        assert_eq!(result, Err(Exception::Postpone));

        let result = unifier.ensure_has_type(&mut mctx, &lctx, &Expr::const_("Bool"), &e, &Expr::const_("Nat"));
        assert!(matches!(result, Err(Exception::Error(ElabError::TypeMismatch { .. }))));
    }
}
