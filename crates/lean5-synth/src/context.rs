//! The resolution context
//!
//! `SynthCtx` pairs the mutable `ElabState` with the collaborators and is
//! threaded by reference through every call, including calls into the
//! collaborators themselves. Scoped changes (`without_postponing`,
//! `with_mvar_context`, ...) take a closure and restore the previous scope
//! when it returns, whatever it returned.

use crate::error::{ElabError, ElabResult, Exception, SynthError, SynthResult};
use crate::frontend::Frontend;
use crate::kind::{SavedContext, SyntheticMVarDecl, SyntheticMVarKind};
use crate::message::Message;
use crate::state::{ElabScope, ElabState, SavedState};
use lean5_meta::{Expr, LocalContext, MVarId, MetaError, MetavarContext, MetavarKind, Syntax};

pub struct SynthCtx<'a> {
    pub state: &'a mut ElabState,
    frontend: Frontend<'a>,
}

impl<'a> SynthCtx<'a> {
    pub fn new(state: &'a mut ElabState, frontend: Frontend<'a>) -> Self {
        Self { state, frontend }
    }

    pub fn frontend(&self) -> Frontend<'a> {
        self.frontend
    }

    pub fn mctx(&self) -> &MetavarContext {
        &self.state.mctx
    }

    pub fn mctx_mut(&mut self) -> &mut MetavarContext {
        &mut self.state.mctx
    }

    pub fn lctx(&self) -> &LocalContext {
        &self.state.scope.lctx
    }

    pub fn instantiate(&self, e: &Expr) -> Expr {
        self.state.mctx.instantiate_mvars(e)
    }

    pub fn is_def_eq(&mut self, a: &Expr, b: &Expr) -> bool {
        let def_eq = self.frontend.def_eq;
        def_eq.is_def_eq(&mut self.state.mctx, a, b)
    }

    // ------------------------------------------------------------------
    // Postponement
    // ------------------------------------------------------------------

    pub fn may_postpone(&self) -> bool {
        self.state.scope.may_postpone
    }

    /// Raise the postpone signal if postponing is currently allowed
    pub fn try_postpone(&self) -> ElabResult<()> {
        if self.may_postpone() {
            Err(Exception::Postpone)
        } else {
            Ok(())
        }
    }

    /// Postpone if the head of `e` is an unassigned metavariable
    pub fn try_postpone_if_mvar(&self, e: &Expr) -> ElabResult<()> {
        if self.state.mctx.is_mvar_headed(e) {
            self.try_postpone()
        } else {
            Ok(())
        }
    }

    /// Postpone if `e` contains unassigned metavariables
    pub fn try_postpone_if_has_mvars(&self, e: &Expr) -> ElabResult<()> {
        if self.state.mctx.has_unassigned_mvar(e) {
            self.try_postpone()
        } else {
            Ok(())
        }
    }

    /// Run `f` with postponement disabled, forcing elaborators to guess
    pub fn without_postponing<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_scope(|scope| scope.may_postpone = false, f)
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    pub(crate) fn with_scope<R>(
        &mut self,
        modify: impl FnOnce(&mut ElabScope),
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.state.scope.clone();
        modify(&mut self.state.scope);
        let result = f(self);
        self.state.scope = saved;
        result
    }

    /// Run `f` in the local context `mvar` was created in
    pub fn with_mvar_context<R, E: From<MetaError>>(
        &mut self,
        mvar: MVarId,
        f: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<R, E> {
        let lctx = self.state.mctx.get_decl(mvar)?.lctx.clone();
        self.with_scope(|scope| scope.lctx = lctx, f)
    }

    /// Run `f` with the declaration name and macro stack of a postponed term
    pub(crate) fn with_saved_context<R>(&mut self, saved: &SavedContext, f: impl FnOnce(&mut Self) -> R) -> R {
        self.with_scope(
            |scope| {
                scope.macro_stack = saved.macro_stack.clone();
                scope.decl_name = saved.decl_name.clone();
            },
            f,
        )
    }

    pub fn save_context(&self) -> SavedContext {
        SavedContext {
            macro_stack: self.state.scope.macro_stack.clone(),
            decl_name: self.state.scope.decl_name.clone(),
        }
    }

    pub fn save_state(&self) -> SavedState {
        self.state.save()
    }

    pub fn restore_state(&mut self, saved: SavedState) {
        self.state.restore(saved);
    }

    // ------------------------------------------------------------------
    // Recursion depth
    // ------------------------------------------------------------------

    /// Consume one level of recursion depth
    pub(crate) fn inc_rec_depth(&mut self) -> SynthResult<()> {
        let max = self.state.config.max_rec_depth;
        if self.state.rec_depth >= max {
            tracing::warn!(max, "maximum recursion depth reached");
            return Err(SynthError::MaxRecDepth { max });
        }
        self.state.rec_depth += 1;
        Ok(())
    }

    /// Run `f`, then give back every depth level it consumed
    pub(crate) fn with_depth_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> SynthResult<R>) -> SynthResult<R> {
        let depth = self.state.rec_depth;
        let result = f(self);
        self.state.rec_depth = depth;
        result
    }

    // ------------------------------------------------------------------
    // Registering pending metavariables
    // ------------------------------------------------------------------

    pub fn register_synthetic_mvar(&mut self, stx: &Syntax, mvar: MVarId, kind: SyntheticMVarKind) -> SynthResult<()> {
        tracing::trace!(%mvar, kind = kind.name(), "registering synthetic metavariable");
        if self
            .state
            .pending
            .push(SyntheticMVarDecl::new(mvar, stx.clone(), kind))
        {
            Ok(())
        } else {
            Err(SynthError::DuplicatePending(mvar))
        }
    }

    /// Fresh metavariable in the current local context
    pub fn mk_fresh_mvar(&mut self, ty: Expr, kind: MetavarKind) -> MVarId {
        self.state.mctx.mk_fresh_mvar(ty, &self.state.scope.lctx, kind)
    }

    /// Metavariable for an instance of `ty`. Instance search runs right away;
    /// if it cannot decide yet, the metavariable is left pending.
    pub fn mk_inst_mvar(&mut self, stx: &Syntax, ty: Expr) -> ElabResult<Expr> {
        let mvar_id = self.mk_fresh_mvar(ty.clone(), MetavarKind::Synthetic);
        let instances = self.frontend.instances;
        let ty = self.instantiate(&ty);
        match instances.synth_instance(&mut self.state.mctx, &self.state.scope.lctx, &ty) {
            Ok(inst) => self.assign_result(mvar_id, inst)?,
            Err(Exception::Postpone) => {
                self.register_synthetic_mvar(stx, mvar_id, SyntheticMVarKind::TypeClass)?
            }
            Err(other) => return Err(other),
        }
        Ok(Expr::mvar(mvar_id))
    }

    /// Coerce `e : e_type` to `expected`. If that cannot be decided yet, a
    /// placeholder of type `expected` is returned and left pending.
    pub fn mk_coe(
        &mut self,
        stx: &Syntax,
        expected: &Expr,
        e: &Expr,
        e_type: &Expr,
        header: Option<&str>,
        f: Option<&Expr>,
    ) -> ElabResult<Expr> {
        let def_eq = self.frontend.def_eq;
        match def_eq.ensure_has_type(&mut self.state.mctx, &self.state.scope.lctx, expected, e, e_type) {
            Ok(coerced) => Ok(coerced),
            Err(Exception::Postpone) => {
                let mvar = self.mk_fresh_mvar(expected.clone(), MetavarKind::SyntheticOpaque);
                let kind = SyntheticMVarKind::Coe {
                    header: header.map(str::to_string),
                    expected_type: expected.clone(),
                    e_type: e_type.clone(),
                    e: e.clone(),
                    f: f.cloned(),
                };
                self.register_synthetic_mvar(stx, mvar, kind)?;
                Ok(Expr::mvar(mvar))
            }
            Err(Exception::Error(_)) => Err(ElabError::type_mismatch(header, expected, e_type, e, f).into()),
            Err(internal) => Err(internal),
        }
    }

    /// Metavariable of type `ty` that falls back to `default`
    pub fn mk_with_default(&mut self, stx: &Syntax, ty: Expr, default: Expr) -> SynthResult<Expr> {
        let mvar = self.mk_fresh_mvar(ty, MetavarKind::Natural);
        self.register_synthetic_mvar(stx, mvar, SyntheticMVarKind::WithDefault(default))?;
        Ok(Expr::mvar(mvar))
    }

    /// Postpone elaboration of `stx`, returning the placeholder standing for it
    pub fn postpone_elab_term(&mut self, stx: &Syntax, expected: Option<&Expr>) -> SynthResult<Expr> {
        tracing::trace!(%stx, "postponing");
        let ty = match expected {
            Some(ty) => ty.clone(),
            None => self.state.mctx.mk_fresh_type_mvar(&self.state.scope.lctx),
        };
        let mvar = self.mk_fresh_mvar(ty, MetavarKind::SyntheticOpaque);
        let saved = self.save_context();
        self.register_synthetic_mvar(stx, mvar, SyntheticMVarKind::Postponed(saved))?;
        Ok(Expr::mvar(mvar))
    }

    /// Goal of type `ty` to be proved by the tactic block `code`
    pub fn register_tactic_block(&mut self, stx: &Syntax, code: Syntax, ty: Expr) -> SynthResult<Expr> {
        let mvar = self.mk_fresh_mvar(ty, MetavarKind::SyntheticOpaque);
        let kind = SyntheticMVarKind::Tactic {
            decl_name: self.state.scope.decl_name.clone(),
            code,
        };
        self.register_synthetic_mvar(stx, mvar, kind)?;
        Ok(Expr::mvar(mvar))
    }

    // ------------------------------------------------------------------
    // Assignment and diagnostics
    // ------------------------------------------------------------------

    /// Assign `value` to `mvar`, or check it against the existing assignment
    pub(crate) fn assign_result(&mut self, mvar: MVarId, value: Expr) -> ElabResult<()> {
        match self.state.mctx.get_assignment(mvar).cloned() {
            None => Ok(self.state.mctx.assign(mvar, value)?),
            Some(current) if self.is_def_eq(&current, &value) => Ok(()),
            Some(current) => Err(Exception::msg(format!(
                "synthesized value is not definitionally equal to the one inferred by typing rules, synthesized\n  {value}\ninferred\n  {current}"
            ))),
        }
    }

    /// Assign the error sentinel to `mvar` unless it is already assigned
    pub fn admit(&mut self, mvar: MVarId) -> SynthResult<()> {
        if self.state.mctx.is_assigned(mvar) {
            return Ok(());
        }
        let ty = self.state.mctx.instantiate_decl_type(mvar)?;
        self.state.mctx.assign(mvar, Expr::sorry(ty))?;
        Ok(())
    }

    /// Log an error at the position of `stx`
    pub fn log_error(&mut self, stx: &Syntax, err: impl std::fmt::Display) {
        let mut text = err.to_string();
        if self.state.config.show_macro_stack {
            if let Some(top) = self.state.scope.macro_stack.first() {
                text.push_str(&format!("\nwith resulting expansion\n  {}", top.after));
            }
            for elem in &self.state.scope.macro_stack {
                text.push_str(&format!("\nwhile expanding\n  {}", elem.before));
            }
        }
        self.state.messages.push(Message {
            pos: stx.pos().cloned(),
            decl_name: self.state.scope.decl_name.clone(),
            text,
        });
    }
}
