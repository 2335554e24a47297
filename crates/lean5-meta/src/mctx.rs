//! Metavariable context
//!
//! The assignment table for metavariables. Every metavariable is declared
//! with its type and the local context it was created in; solving it means
//! assigning a term of that type.
//!
//! Assignments are never overwritten: assigning twice is a `MetaError`.
//! Backtracking is done by cloning the whole context and restoring it.

use crate::expr::{Expr, MVarId};
use crate::lctx::LocalContext;
use hashbrown::HashMap;
use thiserror::Error;

/// Result type for metavariable operations
pub type MetaResult<T> = Result<T, MetaError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetaError {
    #[error("unknown metavariable {0}")]
    UnknownMVar(MVarId),

    #[error("metavariable {mvar} is already assigned to {value}")]
    AlreadyAssigned { mvar: MVarId, value: Expr },
}

/// How a metavariable may be solved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetavarKind {
    /// Solvable by unification
    Natural,
    /// Solved by a dedicated procedure (instance search, postponed
    /// elaboration, defaults), unification may still assign it
    Synthetic,
    /// Only the owning procedure (a tactic block) may assign it
    SyntheticOpaque,
}

#[derive(Debug, Clone)]
pub struct MetavarDecl {
    pub lctx: LocalContext,
    pub ty: Expr,
    pub kind: MetavarKind,
}

#[derive(Debug, Clone, Default)]
pub struct MetavarContext {
    decls: HashMap<MVarId, MetavarDecl>,
    assignments: HashMap<MVarId, Expr>,
    next_id: u64,
}

impl MetavarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a fresh metavariable
    pub fn mk_fresh_mvar(&mut self, ty: Expr, lctx: &LocalContext, kind: MetavarKind) -> MVarId {
        let id = MVarId(self.next_id);
        self.next_id += 1;
        self.decls.insert(
            id,
            MetavarDecl {
                lctx: lctx.clone(),
                ty,
                kind,
            },
        );
        id
    }

    /// Declare a fresh metavariable and return it as an expression
    pub fn mk_fresh_expr_mvar(&mut self, ty: Expr, lctx: &LocalContext, kind: MetavarKind) -> Expr {
        Expr::mvar(self.mk_fresh_mvar(ty, lctx, kind))
    }

    /// Fresh `?α : Type`
    pub fn mk_fresh_type_mvar(&mut self, lctx: &LocalContext) -> Expr {
        self.mk_fresh_expr_mvar(Expr::type_(), lctx, MetavarKind::Natural)
    }

    pub fn get_decl(&self, mvar: MVarId) -> MetaResult<&MetavarDecl> {
        self.decls.get(&mvar).ok_or(MetaError::UnknownMVar(mvar))
    }

    pub fn contains(&self, mvar: MVarId) -> bool {
        self.decls.contains_key(&mvar)
    }

    pub fn assign(&mut self, mvar: MVarId, value: Expr) -> MetaResult<()> {
        if !self.decls.contains_key(&mvar) {
            return Err(MetaError::UnknownMVar(mvar));
        }
        if let Some(existing) = self.assignments.get(&mvar) {
            return Err(MetaError::AlreadyAssigned {
                mvar,
                value: existing.clone(),
            });
        }
        self.assignments.insert(mvar, value);
        Ok(())
    }

    pub fn is_assigned(&self, mvar: MVarId) -> bool {
        self.assignments.contains_key(&mvar)
    }

    pub fn get_assignment(&self, mvar: MVarId) -> Option<&Expr> {
        self.assignments.get(&mvar)
    }

    /// Replace every assigned metavariable by its (instantiated) value
    pub fn instantiate_mvars(&self, e: &Expr) -> Expr {
        if !e.has_mvar() {
            return e.clone();
        }
        e.replace(&mut |sub| match sub {
            Expr::MVar(id) => Some(match self.assignments.get(id) {
                Some(value) => self.instantiate_mvars(value),
                None => sub.clone(),
            }),
            _ if !sub.has_mvar() => Some(sub.clone()),
            _ => None,
        })
    }

    /// Instantiate the declared type of `mvar` in place and return it
    pub fn instantiate_decl_type(&mut self, mvar: MVarId) -> MetaResult<Expr> {
        let ty = self.instantiate_mvars(&self.get_decl(mvar)?.ty);
        if let Some(decl) = self.decls.get_mut(&mvar) {
            decl.ty = ty.clone();
        }
        Ok(ty)
    }

    /// Unassigned metavariables of `e` (after instantiation), in occurrence order
    pub fn unassigned_mvars(&self, e: &Expr) -> Vec<MVarId> {
        let mut out = Vec::new();
        self.instantiate_mvars(e).replace(&mut |sub| {
            if let Expr::MVar(id) = sub {
                if !out.contains(id) {
                    out.push(*id);
                }
                return Some(sub.clone());
            }
            None
        });
        out
    }

    pub fn has_unassigned_mvar(&self, e: &Expr) -> bool {
        e.has_mvar() && self.instantiate_mvars(e).has_mvar()
    }

    /// Whether the head of `e` is an unassigned metavariable once instantiated
    pub fn is_mvar_headed(&self, e: &Expr) -> bool {
        self.instantiate_mvars(e).get_app_fn().is_mvar()
    }

    pub fn num_mvars(&self) -> usize {
        self.decls.len()
    }
}
