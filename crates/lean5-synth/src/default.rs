//! Default values
//!
//! `WithDefault` entries are only ever settled here. Each one whose value is
//! still headed by an unassigned metavariable is unified with its default;
//! all of them are removed from the queue whether or not that worked.
//! When there are none, default instances are tried for pending type class
//! problems, one at a time.

use crate::context::SynthCtx;
use crate::error::{ElabError, ElabResult, Exception, SynthResult};
use crate::kind::SyntheticMVarKind;
use lean5_meta::{Expr, MVarId, Syntax};

impl<'a> SynthCtx<'a> {
    /// Apply default values to pending `WithDefault` entries. Returns whether
    /// the queue changed.
    pub fn synthesize_using_defaults(&mut self) -> SynthResult<bool> {
        let defaults: Vec<(MVarId, Syntax, Expr)> = self
            .state
            .pending
            .iter()
            .filter_map(|decl| match &decl.kind {
                SyntheticMVarKind::WithDefault(default) => Some((decl.mvar_id, decl.stx.clone(), default.clone())),
                _ => None,
            })
            .collect();

        let before = self.state.pending.len();
        for (mvar, stx, default) in defaults {
            self.with_mvar_context(mvar, |ctx| ctx.apply_default(mvar, &stx, &default))?;
            self.state.pending.remove(mvar);
        }
        if self.state.pending.len() != before {
            return Ok(true);
        }
        self.synthesize_using_default_instance()
    }

    fn apply_default(&mut self, mvar: MVarId, stx: &Syntax, default: &Expr) -> SynthResult<()> {
        let value = self.instantiate(&Expr::mvar(mvar));
        if !self.state.mctx.is_mvar_headed(&value) {
            // decided by the context; the default is not needed
            tracing::trace!(%mvar, %value, "default skipped");
            return Ok(());
        }
        if self.is_def_eq(&value, default) {
            tracing::trace!(%mvar, %default, "default applied");
            return Ok(());
        }
        let err = ElabError::DefaultValue {
            mvar,
            value,
            default: self.instantiate(default),
        };
        self.log_error(stx, err);
        self.admit(mvar)
    }

    /// Commit the first default instance found for a pending type class
    /// problem, oldest first
    fn synthesize_using_default_instance(&mut self) -> SynthResult<bool> {
        let candidates: Vec<MVarId> = self
            .state
            .pending
            .iter()
            .filter(|decl| matches!(decl.kind, SyntheticMVarKind::TypeClass))
            .map(|decl| decl.mvar_id)
            .collect();

        for mvar in candidates {
            let saved = self.save_state();
            match self.with_mvar_context(mvar, |ctx| ctx.try_default_instance(mvar)) {
                Ok(true) => {
                    tracing::debug!(%mvar, "default instance applied");
                    self.state.pending.remove(mvar);
                    return Ok(true);
                }
                Ok(false) | Err(Exception::Postpone) | Err(Exception::Error(_)) => self.restore_state(saved),
                Err(Exception::Internal(err)) => return Err(err),
            }
        }
        Ok(false)
    }

    fn try_default_instance(&mut self, mvar: MVarId) -> ElabResult<bool> {
        let ty = self.state.mctx.instantiate_decl_type(mvar)?;
        let instances = self.frontend().instances;
        match instances.default_instance(&mut self.state.mctx, &self.state.scope.lctx, &ty)? {
            Some(inst) => {
                self.assign_result(mvar, inst)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
