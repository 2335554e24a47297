//! Lean5 synthetic metavariable resolution
//!
//! While elaborating a term, some metavariables cannot be solved on the
//! spot: an instance argument whose type is not known yet, a coercion
//! between types that still contain holes, a subterm whose expected type is
//! not available, a tactic block. They are registered as *synthetic*
//! metavariables and resolved later by an escalating fixpoint loop:
//! - plain resolution steps while they make progress
//! - steps with postponement disabled, first tolerating then reporting errors
//! - default values and default instances
//! - tactic blocks
//! - finally, stuck diagnostics for whatever remains
//!
//! Solving itself is delegated to collaborators (instance search,
//! unification, the term elaborator, the tactic framework) behind the
//! traits in [`frontend`]. [`InstanceTable`] and [`Unifier`] are simple
//! implementations of the first two.
//!
//! # Example
//!
//! ```
//! use lean5_meta::{Expr, MVarId, Name, Syntax};
//! use lean5_synth::{
//!     ElabResult, ElabState, Exception, Frontend, InstanceTable, SynthCtx, TacticEvaluator,
//!     TermElaborator, Unifier, DEFAULT_PRIORITY,
//! };
//!
//! struct NoTerms;
//! impl TermElaborator for NoTerms {
//!     fn elab_term(&self, _: &mut SynthCtx<'_>, _: &Syntax, _: Option<&Expr>, _: bool) -> ElabResult<Expr> {
//!         Err(Exception::msg("unsupported"))
//!     }
//! }
//! impl TacticEvaluator for NoTerms {
//!     fn run_tactic(&self, _: &mut SynthCtx<'_>, _: &Syntax, goals: Vec<MVarId>) -> ElabResult<Vec<MVarId>> {
//!         Ok(goals)
//!     }
//! }
//!
//! let mut instances = InstanceTable::new();
//! instances.register_class(Name::from_string("Inhabited"), 1, vec![]);
//! instances.add_instance(
//!     Name::from_string("instInhabitedNat"),
//!     Name::from_string("Inhabited"),
//!     Expr::const_("instInhabitedNat"),
//!     Expr::app(Expr::const_("Inhabited"), Expr::const_("Nat")),
//!     DEFAULT_PRIORITY,
//! );
//! let unifier = Unifier::new();
//! let mut state = ElabState::new();
//! let mut ctx = SynthCtx::new(&mut state, Frontend::new(&instances, &unifier, &NoTerms, &NoTerms));
//!
//! // `Inhabited ?α` cannot be solved until `?α` is known
//! let alpha = ctx.mctx_mut().mk_fresh_type_mvar(&Default::default());
//! let stx = Syntax::missing();
//! let inst = ctx.mk_inst_mvar(&stx, Expr::app(Expr::const_("Inhabited"), alpha.clone())).unwrap();
//! assert_eq!(ctx.state.pending.len(), 1);
//!
//! assert!(ctx.is_def_eq(&alpha, &Expr::const_("Nat")));
//! ctx.synthesize_no_postponing().unwrap();
//! assert!(ctx.state.pending.is_empty());
//! assert_eq!(ctx.instantiate(&inst), Expr::const_("instInhabitedNat"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod frontend;
pub mod instances;
pub mod kind;
pub mod message;
pub mod queue;
pub mod state;
pub mod unify;

mod api;
mod default;
mod driver;
mod step;
mod stuck;

pub use config::{SynthConfig, DEFAULT_MAX_REC_DEPTH};
pub use context::SynthCtx;
pub use error::{ElabError, ElabResult, Exception, SynthError, SynthResult};
pub use frontend::{DefEq, Frontend, InstanceSearch, TacticEvaluator, TermElaborator};
pub use instances::{ClassInfo, InstanceInfo, InstanceTable, DEFAULT_PRIORITY};
pub use kind::{SavedContext, SyntheticMVarDecl, SyntheticMVarKind};
pub use message::{Message, MessageLog};
pub use queue::PendingQueue;
pub use state::{ElabScope, ElabState, SavedState};
pub use unify::{Unifier, UnifyResult};
