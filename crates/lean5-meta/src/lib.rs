//! Lean5 meta-level vocabulary
//!
//! The pieces shared between the term elaborator and the synthetic
//! metavariable resolver:
//! - `Name`, `Level` and `Expr`, with metavariables as first-class terms
//! - `LocalContext`, the hypotheses visible to a metavariable
//! - `MetavarContext`, the assignment table for metavariables
//! - `Syntax`, kept around for terms whose elaboration is postponed
//!
//! # Example
//!
//! ```
//! use lean5_meta::{Expr, LocalContext, MetavarContext, MetavarKind};
//!
//! let mut mctx = MetavarContext::new();
//! let m = mctx.mk_fresh_mvar(Expr::type_(), &LocalContext::new(), MetavarKind::Natural);
//! mctx.assign(m, Expr::const_("Nat")).unwrap();
//! assert_eq!(mctx.instantiate_mvars(&Expr::mvar(m)), Expr::const_("Nat"));
//! ```

pub mod expr;
pub mod lctx;
pub mod level;
pub mod mctx;
pub mod name;
pub mod syntax;

pub use expr::{BinderInfo, Expr, FVarId, Literal, MVarId, SORRY_AX};
pub use lctx::{LocalContext, LocalDecl};
pub use level::Level;
pub use mctx::{MetaError, MetaResult, MetavarContext, MetavarDecl, MetavarKind};
pub use name::Name;
pub use syntax::{MacroStack, MacroStackElem, SourceInfo, Syntax, SyntaxKind, SyntaxNode};
