//! Reporting entries that survived every resolution measure

use crate::context::SynthCtx;
use crate::error::{ElabError, SynthError, SynthResult};
use crate::kind::{SyntheticMVarDecl, SyntheticMVarKind};

impl<'a> SynthCtx<'a> {
    /// Report every pending entry at its own position, assign each the error
    /// sentinel and clear the queue.
    ///
    /// Only type class and coercion problems can get stuck. Any other kind
    /// reaching this point is an internal error.
    pub(crate) fn report_stuck_mvars(&mut self) -> SynthResult<()> {
        let stuck = self.state.pending.take();
        tracing::debug!(count = stuck.len(), "reporting stuck metavariables");
        for decl in &stuck {
            self.with_mvar_context(decl.mvar_id, |ctx| ctx.report_stuck(decl))?;
        }
        Ok(())
    }

    fn report_stuck(&mut self, decl: &SyntheticMVarDecl) -> SynthResult<()> {
        let mvar = decl.mvar_id;
        if self.state.mctx.is_assigned(mvar) {
            return Ok(());
        }
        match &decl.kind {
            SyntheticMVarKind::TypeClass => {
                // usually a consequence of an error already reported
                if self.state.config.report_stuck_tc || !self.state.messages.has_errors() {
                    let ty = self.state.mctx.instantiate_decl_type(mvar)?;
                    self.log_error(&decl.stx, ElabError::StuckInstance { ty });
                }
            }
            SyntheticMVarKind::Coe {
                header,
                expected_type,
                e_type,
                e,
                f,
            } => {
                let f = f.as_ref().map(|f| self.instantiate(f));
                let err = ElabError::type_mismatch(
                    header.as_deref(),
                    &self.instantiate(expected_type),
                    &self.instantiate(e_type),
                    &self.instantiate(e),
                    f.as_ref(),
                );
                self.log_error(&decl.stx, err);
            }
            other => {
                return Err(SynthError::StuckUnexpected {
                    mvar,
                    kind: other.name(),
                })
            }
        }
        self.admit(mvar)
    }
}
