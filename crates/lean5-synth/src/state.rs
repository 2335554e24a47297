//! Elaboration state
//!
//! One `ElabState` lives for one top-level elaboration. It owns the
//! metavariable context, the pending queue and the message log, plus the
//! ambient scope (local context, declaration name, macro stack, whether
//! postponement is allowed). Nothing here is global.

use crate::config::SynthConfig;
use crate::message::MessageLog;
use crate::queue::PendingQueue;
use lean5_meta::{LocalContext, MacroStack, MetavarContext, Name};

/// Ambient settings, restored when the scope that changed them ends
#[derive(Debug, Clone)]
pub struct ElabScope {
    pub lctx: LocalContext,
    pub decl_name: Option<Name>,
    pub macro_stack: MacroStack,
    /// Whether elaborators may raise the postpone signal
    pub may_postpone: bool,
}

impl Default for ElabScope {
    fn default() -> Self {
        Self {
            lctx: LocalContext::new(),
            decl_name: None,
            macro_stack: MacroStack::new(),
            may_postpone: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElabState {
    pub mctx: MetavarContext,
    pub pending: PendingQueue,
    pub messages: MessageLog,
    pub scope: ElabScope,
    pub config: SynthConfig,
    pub(crate) rec_depth: usize,
}

/// Checkpoint taken before an attempt that may have to be undone
#[derive(Debug, Clone)]
pub struct SavedState {
    mctx: MetavarContext,
    pending: PendingQueue,
    num_messages: usize,
}

impl ElabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SynthConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set the declaration being elaborated
    #[must_use]
    pub fn in_decl(mut self, name: impl Into<Name>) -> Self {
        self.scope.decl_name = Some(name.into());
        self
    }

    pub fn rec_depth(&self) -> usize {
        self.rec_depth
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            mctx: self.mctx.clone(),
            pending: self.pending.clone(),
            num_messages: self.messages.len(),
        }
    }

    /// Undo every assignment, registration and message since `saved`
    pub fn restore(&mut self, saved: SavedState) {
        self.mctx = saved.mctx;
        self.pending = saved.pending;
        self.messages.truncate(saved.num_messages);
    }
}
