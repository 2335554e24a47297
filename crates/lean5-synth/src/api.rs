//! Scoped entry points
//!
//! Each of these resolves only what its action registered: the outer queue
//! is set aside first and put back in front afterwards, on every exit path.

use crate::context::SynthCtx;
use crate::error::{ElabResult, Exception, SynthError, SynthResult};
use lean5_meta::{Expr, Syntax};

impl<'a> SynthCtx<'a> {
    /// Run `f`, then resolve the metavariables it left pending.
    ///
    /// With `may_postpone`, entries that cannot be decided yet stay pending
    /// (in the outer queue) once default values have been tried.
    pub fn with_synthesize<R, E: From<SynthError>>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, E>,
        may_postpone: bool,
    ) -> Result<R, E> {
        self.with_synthesize_impl(f, may_postpone, true)
    }

    /// `with_synthesize` with postponement allowed and no default values
    pub fn with_synthesize_light<R, E: From<SynthError>>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, E>,
    ) -> Result<R, E> {
        self.with_synthesize_impl(f, true, false)
    }

    fn with_synthesize_impl<R, E: From<SynthError>>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, E>,
        may_postpone: bool,
        apply_defaults: bool,
    ) -> Result<R, E> {
        let outer = self.state.pending.take();
        let result = f(self).and_then(|value| {
            self.synthesize(may_postpone)?;
            if may_postpone && apply_defaults && self.synthesize_using_defaults()? {
                self.synthesize(may_postpone)?;
            }
            Ok(value)
        });
        self.state.pending.prepend(outer);
        result
    }

    /// Resolve what can be resolved now, then fall back to default values
    pub fn synthesize_using_default(&mut self) -> SynthResult<()> {
        self.synthesize(true)?;
        if self.synthesize_using_defaults()? {
            self.synthesize(true)?;
        }
        Ok(())
    }

    /// Elaborate `stx` and resolve everything its elaboration left pending.
    /// A term that cannot be elaborated yet is postponed and resolved along
    /// with the rest.
    pub fn elab_term_and_synthesize(&mut self, stx: &Syntax, expected: Option<&Expr>) -> ElabResult<Expr> {
        let elaborator = self.frontend().elaborator;
        let e = self.with_synthesize(
            |ctx| match elaborator.elab_term(ctx, stx, expected, true) {
                Err(Exception::Postpone) => Ok(ctx.postpone_elab_term(stx, expected)?),
                other => other,
            },
            false,
        )?;
        Ok(self.instantiate(&e))
    }
}
