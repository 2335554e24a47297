//! One resolution pass over the pending queue
//!
//! The live queue is swapped out for an empty one before the pass. Entries
//! registered while the batch is processed land in the fresh queue and are
//! left alone until the next pass. After the pass the queue holds the kept
//! entries of the batch followed by the newly registered ones.

use crate::context::SynthCtx;
use crate::error::{ElabError, ElabResult, Exception, SynthResult};
use crate::kind::{SyntheticMVarDecl, SyntheticMVarKind};
use crate::state::SavedState;
use lean5_meta::{Expr, MVarId, Name, Syntax};

/// What happened to one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Assigned, or dropped after its error was reported
    Resolved,
    /// Left for a later pass
    Kept,
}

impl<'a> SynthCtx<'a> {
    /// Attempt every pending entry once, oldest first. Returns whether any
    /// entry of the batch was resolved.
    ///
    /// With `postpone_on_error`, entries that fail with an error are kept
    /// for a later step instead of being reported. Tactic blocks only run
    /// with `run_tactics`.
    pub fn synthesize_step(&mut self, postpone_on_error: bool, run_tactics: bool) -> SynthResult<bool> {
        let batch = self.state.pending.take();
        let batch_len = batch.len();
        let mut kept = Vec::with_capacity(batch_len);
        for decl in batch {
            match self.synthesize_pending(&decl, postpone_on_error, run_tactics)? {
                Outcome::Resolved => {}
                Outcome::Kept => kept.push(decl),
            }
        }
        let kept_len = kept.len();
        let discovered = self.state.pending.take();
        let discovered_len = discovered.len();
        self.state.pending.extend(kept);
        self.state.pending.extend(discovered);

        let progress = batch_len != kept_len;
        tracing::debug!(
            postpone_on_error,
            run_tactics,
            batch = batch_len,
            kept = kept_len,
            discovered = discovered_len,
            progress,
            "synthesis step"
        );
        Ok(progress)
    }

    fn synthesize_pending(
        &mut self,
        decl: &SyntheticMVarDecl,
        postpone_on_error: bool,
        run_tactics: bool,
    ) -> SynthResult<Outcome> {
        let mvar = decl.mvar_id;
        tracing::trace!(%mvar, kind = decl.kind.name(), "attempting");

        if !matches!(decl.kind, SyntheticMVarKind::WithDefault(_)) && self.state.mctx.is_assigned(mvar) {
            // solved as a side effect of an earlier entry
            return Ok(Outcome::Resolved);
        }

        match &decl.kind {
            SyntheticMVarKind::TypeClass => {
                self.with_mvar_context(mvar, |ctx| ctx.synthesize_pending_instance(decl, postpone_on_error))
            }
            SyntheticMVarKind::Coe {
                header,
                expected_type,
                e_type,
                e,
                f,
            } => self.with_mvar_context(mvar, |ctx| {
                let saved = ctx.save_state();
                let result = ctx.synthesize_coe(mvar, header.as_deref(), expected_type, e, e_type, f.as_ref());
                ctx.finish_attempt(decl, saved, result, postpone_on_error)
            }),
            SyntheticMVarKind::Postponed(saved_ctx) => self.with_mvar_context(mvar, |ctx| {
                ctx.with_saved_context(saved_ctx, |ctx| ctx.resume_postponed(decl, postpone_on_error))
            }),
            SyntheticMVarKind::WithDefault(_) => Ok(Outcome::Kept),
            SyntheticMVarKind::Tactic { decl_name, code } => {
                if !run_tactics {
                    return Ok(Outcome::Kept);
                }
                self.with_mvar_context(mvar, |ctx| ctx.run_tactic_block(decl, decl_name.as_ref(), code))?;
                Ok(Outcome::Resolved)
            }
        }
    }

    fn synthesize_pending_instance(&mut self, decl: &SyntheticMVarDecl, postpone_on_error: bool) -> SynthResult<Outcome> {
        let mvar = decl.mvar_id;
        let saved = self.save_state();
        let result = self.synthesize_instance(mvar);
        self.finish_attempt(decl, saved, result, postpone_on_error)
    }

    fn synthesize_instance(&mut self, mvar: MVarId) -> ElabResult<()> {
        let ty = self.state.mctx.instantiate_decl_type(mvar)?;
        let instances = self.frontend().instances;
        let inst = instances.synth_instance(&mut self.state.mctx, &self.state.scope.lctx, &ty)?;
        self.assign_result(mvar, inst)
    }

    fn synthesize_coe(
        &mut self,
        mvar: MVarId,
        header: Option<&str>,
        expected: &Expr,
        e: &Expr,
        e_type: &Expr,
        f: Option<&Expr>,
    ) -> ElabResult<()> {
        let expected = self.instantiate(expected);
        let e = self.instantiate(e);
        let e_type = self.instantiate(e_type);
        let def_eq = self.frontend().def_eq;
        match def_eq.ensure_has_type(&mut self.state.mctx, &self.state.scope.lctx, &expected, &e, &e_type) {
            Ok(coerced) => self.assign_result(mvar, coerced),
            Err(Exception::Error(_)) => {
                let f = f.map(|f| self.instantiate(f));
                Err(ElabError::type_mismatch(header, &expected, &e_type, &e, f.as_ref()).into())
            }
            Err(other) => Err(other),
        }
    }

    fn resume_postponed(&mut self, decl: &SyntheticMVarDecl, postpone_on_error: bool) -> SynthResult<Outcome> {
        let mvar = decl.mvar_id;
        let saved = self.save_state();
        let result = self.elab_postponed(mvar, &decl.stx, postpone_on_error);
        self.finish_attempt(decl, saved, result, postpone_on_error)
    }

    fn elab_postponed(&mut self, mvar: MVarId, stx: &Syntax, postpone_on_error: bool) -> ElabResult<()> {
        let expected = self.state.mctx.instantiate_decl_type(mvar)?;
        let elaborator = self.frontend().elaborator;
        let value = elaborator.elab_term(self, stx, Some(&expected), !postpone_on_error)?;
        let value = self.instantiate(&value);
        self.assign_result(mvar, value)
    }

    /// Settle an attempt: keep the entry (undoing the attempt) or drop it
    fn finish_attempt(
        &mut self,
        decl: &SyntheticMVarDecl,
        saved: SavedState,
        result: ElabResult<()>,
        postpone_on_error: bool,
    ) -> SynthResult<Outcome> {
        match result {
            Ok(()) => Ok(Outcome::Resolved),
            Err(Exception::Postpone) => {
                self.restore_state(saved);
                Ok(Outcome::Kept)
            }
            Err(Exception::Error(err)) if postpone_on_error => {
                tracing::trace!(mvar = %decl.mvar_id, %err, "error postponed");
                self.restore_state(saved);
                Ok(Outcome::Kept)
            }
            Err(Exception::Error(err)) => {
                self.restore_state(saved);
                self.log_error(&decl.stx, err);
                self.admit(decl.mvar_id)?;
                Ok(Outcome::Resolved)
            }
            Err(Exception::Internal(err)) => Err(err),
        }
    }

    /// Run a tactic block on its goal. Failures are reported; the entry is
    /// resolved either way.
    fn run_tactic_block(&mut self, decl: &SyntheticMVarDecl, decl_name: Option<&Name>, code: &Syntax) -> SynthResult<()> {
        let mvar = decl.mvar_id;
        self.state.mctx.instantiate_decl_type(mvar)?;
        let tactics = self.frontend().tactics;
        let result = self.without_postponing(|ctx| {
            ctx.with_synthesize(|ctx| tactics.run_tactic(ctx, code, vec![mvar]), false)
        });
        let decl_name = decl_name.cloned();
        self.with_scope(
            |scope| scope.decl_name = decl_name,
            |ctx| match result {
                Ok(remaining) if remaining.is_empty() => Ok(()),
                Ok(remaining) => {
                    let mut goals = Vec::with_capacity(remaining.len());
                    for goal in &remaining {
                        goals.push(ctx.state.mctx.instantiate_decl_type(*goal)?);
                    }
                    ctx.log_error(&decl.stx, ElabError::UnsolvedGoals { goals });
                    for goal in remaining {
                        ctx.admit(goal)?;
                    }
                    ctx.admit(mvar)
                }
                Err(Exception::Postpone) => {
                    ctx.log_error(&decl.stx, ElabError::TacticPostponed);
                    ctx.admit(mvar)
                }
                Err(Exception::Error(err)) => {
                    ctx.log_error(&decl.stx, err);
                    ctx.admit(mvar)
                }
                Err(Exception::Internal(err)) => Err(err),
            },
        )
    }
}
