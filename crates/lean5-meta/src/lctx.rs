//! Local contexts
//!
//! The hypotheses in scope where a metavariable was created. Instance search
//! and tactic blocks run in the local context of the metavariable they solve.

use crate::expr::{Expr, FVarId};
use crate::name::Name;

/// A local declaration: a binder, or a let-binding when `value` is set
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDecl {
    pub fvar: FVarId,
    /// Name for display and lookup
    pub user_name: Name,
    pub ty: Expr,
    pub value: Option<Expr>,
}

/// Stack of local declarations, most recent last
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalContext {
    decls: Vec<LocalDecl>,
    next_fvar: u64,
}

impl LocalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a binder and return its free variable
    pub fn push_binder(&mut self, user_name: impl Into<Name>, ty: Expr) -> FVarId {
        self.push(user_name.into(), ty, None)
    }

    /// Push a let-binding and return its free variable
    pub fn push_let(&mut self, user_name: impl Into<Name>, ty: Expr, value: Expr) -> FVarId {
        self.push(user_name.into(), ty, Some(value))
    }

    fn push(&mut self, user_name: Name, ty: Expr, value: Option<Expr>) -> FVarId {
        let fvar = FVarId(self.next_fvar);
        self.next_fvar += 1;
        self.decls.push(LocalDecl {
            fvar,
            user_name,
            ty,
            value,
        });
        fvar
    }

    pub fn find(&self, fvar: FVarId) -> Option<&LocalDecl> {
        self.decls.iter().find(|d| d.fvar == fvar)
    }

    /// Innermost declaration with the given user name
    pub fn find_by_name(&self, name: &Name) -> Option<&LocalDecl> {
        self.decls.iter().rfind(|d| &d.user_name == name)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LocalDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_shadowing() {
        let mut lctx = LocalContext::new();
        let outer = lctx.push_binder("h", Expr::const_("True"));
        let inner = lctx.push_let("h", Expr::const_("Nat"), Expr::nat_lit(0));
        assert_ne!(outer, inner);
        let found = lctx.find_by_name(&Name::from_string("h")).unwrap();
        assert_eq!(found.fvar, inner);
        assert_eq!(found.value, Some(Expr::nat_lit(0)));
        assert_eq!(lctx.find(outer).unwrap().ty, Expr::const_("True"));
    }
}
