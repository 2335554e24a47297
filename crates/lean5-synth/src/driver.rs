//! The escalating resolution loop
//!
//! Plain steps are repeated while they make progress. When they stop, and
//! postponing the rest is not allowed, stronger measures are tried in order:
//!
//! 1. a step with postponement disabled that still tolerates errors
//! 2. default values (and default instances)
//! 3. a step with postponement disabled that reports errors
//! 4. a step that also runs tactic blocks
//! 5. reporting whatever is left as stuck
//!
//! The loop restarts from plain steps after the first measure that makes
//! progress. Every iteration consumes one level of recursion depth.

use crate::context::SynthCtx;
use crate::error::SynthResult;
use lean5_meta::SourceInfo;

impl<'a> SynthCtx<'a> {
    /// Resolve pending synthetic metavariables.
    ///
    /// With `may_postpone` the loop stops as soon as plain steps stop making
    /// progress and the remaining entries stay pending. Without it the queue
    /// is empty on return and every pending metavariable has been assigned,
    /// possibly to the error sentinel.
    pub fn synthesize(&mut self, may_postpone: bool) -> SynthResult<()> {
        let pos = self.representative_pos().map(ToString::to_string);
        let span = tracing::debug_span!(
            "synthesize",
            may_postpone,
            pending = self.state.pending.len(),
            pos = pos.as_deref().unwrap_or("<unknown>")
        );
        let _guard = span.enter();
        self.with_depth_scope(|ctx| ctx.synthesize_loop(may_postpone))
    }

    /// `synthesize(false)`
    pub fn synthesize_no_postponing(&mut self) -> SynthResult<()> {
        self.synthesize(false)
    }

    fn synthesize_loop(&mut self, may_postpone: bool) -> SynthResult<()> {
        loop {
            if self.state.pending.is_empty() {
                return Ok(());
            }
            self.inc_rec_depth()?;

            if self.synthesize_step(false, false)? {
                continue;
            }
            if may_postpone {
                tracing::debug!(remaining = self.state.pending.len(), "leaving entries pending");
                return Ok(());
            }
            if self.without_postponing(|ctx| ctx.synthesize_step(true, false))? {
                continue;
            }
            if self.synthesize_using_defaults()? {
                continue;
            }
            if self.without_postponing(|ctx| ctx.synthesize_step(false, false))? {
                continue;
            }
            if self.synthesize_step(false, true)? {
                continue;
            }
            self.report_stuck_mvars()?;
            return Ok(());
        }
    }

    /// Position used to locate a driver run in traces: the oldest pending
    /// entry whose syntax has one
    fn representative_pos(&self) -> Option<&SourceInfo> {
        self.state.pending.iter().find_map(|decl| decl.stx.pos())
    }
}
