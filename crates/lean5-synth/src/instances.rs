//! Type class instance table
//!
//! Classes are registered by name with their arity and out-params;
//! instances carry the class they belong to, their type and a priority.
//! A goal is ready once every argument that is not an out-param is fully
//! known. It is then solved by the innermost local hypothesis or the
//! highest-priority global instance whose type unifies with it; unifying
//! fixes the out-params (`HAdd Nat Nat ?γ` against `HAdd Nat Nat Nat`
//! assigns `?γ := Nat`). Goals that are not ready are postponed.
//!
//! Default instances are consulted only when resolution is otherwise stuck.
//! They are matched by unification, so they may fix metavariables of the
//! goal (`OfNat ?α 2` with `instOfNatNat : OfNat Nat n` fixes `?α := Nat`).

use crate::error::{ElabError, ElabResult, Exception};
use crate::frontend::{DefEq, InstanceSearch};
use crate::unify::Unifier;
use hashbrown::HashMap;
use lean5_meta::{Expr, LocalContext, MetavarContext, Name};

/// Priority of instances declared without one
pub const DEFAULT_PRIORITY: u32 = 1000;

#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: Name,
    pub num_params: usize,
    /// Parameters determined by the instance rather than the goal
    pub out_params: Vec<usize>,
}

impl ClassInfo {
    pub fn is_out_param(&self, idx: usize) -> bool {
        self.out_params.contains(&idx)
    }
}

#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub name: Name,
    pub class: Name,
    /// The instance term
    pub expr: Expr,
    pub ty: Expr,
    pub priority: u32,
}

#[derive(Debug, Clone, Default)]
pub struct InstanceTable {
    classes: HashMap<Name, ClassInfo>,
    instances: HashMap<Name, Vec<InstanceInfo>>,
    defaults: HashMap<Name, Vec<InstanceInfo>>,
}

impl InstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(&mut self, name: Name, num_params: usize, out_params: Vec<usize>) {
        self.classes.insert(
            name.clone(),
            ClassInfo {
                name,
                num_params,
                out_params,
            },
        );
    }

    pub fn is_class(&self, name: &Name) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get_class(&self, name: &Name) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn add_instance(&mut self, name: Name, class: Name, expr: Expr, ty: Expr, priority: u32) {
        tracing::trace!(%name, %class, priority, "instance added");
        self.instances.entry(class.clone()).or_default().push(InstanceInfo {
            name,
            class,
            expr,
            ty,
            priority,
        });
    }

    /// Register an instance tried only when resolution is stuck
    pub fn add_default_instance(&mut self, name: Name, class: Name, expr: Expr, ty: Expr, priority: u32) {
        self.defaults.entry(class.clone()).or_default().push(InstanceInfo {
            name,
            class,
            expr,
            ty,
            priority,
        });
    }

    pub fn get_instances(&self, class: &Name) -> &[InstanceInfo] {
        self.instances.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_default_instances(&self, class: &Name) -> &[InstanceInfo] {
        self.defaults.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidates in resolution order: highest priority first, later
    /// declarations first among equal priorities
    fn by_priority(candidates: &[InstanceInfo]) -> Vec<&InstanceInfo> {
        let mut sorted: Vec<&InstanceInfo> = candidates.iter().rev().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }

    fn class_of(ty: &Expr) -> Option<&Name> {
        ty.get_app_fn().const_name()
    }

    /// Whether every argument of `ty` the goal has to determine is known.
    /// Arguments of unregistered classes all count as inputs.
    fn is_ready(&self, mctx: &MetavarContext, ty: &Expr) -> bool {
        let info = Self::class_of(ty).and_then(|class| self.get_class(class));
        !ty.get_app_fn().is_mvar()
            && ty.get_app_args().into_iter().enumerate().all(|(i, arg)| {
                info.is_some_and(|info| info.is_out_param(i)) || !mctx.has_unassigned_mvar(arg)
            })
    }
}

impl InstanceSearch for InstanceTable {
    fn synth_instance(&self, mctx: &mut MetavarContext, lctx: &LocalContext, ty: &Expr) -> ElabResult<Expr> {
        let ty = mctx.instantiate_mvars(ty);
        if !self.is_ready(mctx, &ty) {
            tracing::trace!(%ty, "instance problem not ready");
            return Err(Exception::Postpone);
        }
        let not_found = || Exception::from(ElabError::InstanceNotFound { ty: ty.clone() });
        let class = Self::class_of(&ty).ok_or_else(not_found)?;
        if let Some(info) = self.get_class(class) {
            if ty.get_app_num_args() != info.num_params {
                return Err(not_found());
            }
        }

        let unifier = Unifier::new();
        if let Some(local) = lctx.iter().rev().find(|decl| unifier.is_def_eq(mctx, &decl.ty, &ty)) {
            return Ok(Expr::fvar(local.fvar));
        }
        Self::by_priority(self.get_instances(class))
            .into_iter()
            .find(|inst| unifier.is_def_eq(mctx, &inst.ty, &ty))
            .map(|inst| {
                tracing::trace!(instance = %inst.name, %ty, "instance found");
                inst.expr.clone()
            })
            .ok_or_else(not_found)
    }

    fn default_instance(&self, mctx: &mut MetavarContext, _lctx: &LocalContext, ty: &Expr) -> ElabResult<Option<Expr>> {
        let ty = mctx.instantiate_mvars(ty);
        let Some(class) = Self::class_of(&ty) else {
            return Ok(None);
        };
        let unifier = Unifier::new();
        for inst in Self::by_priority(self.get_default_instances(class)) {
            if unifier.is_def_eq(mctx, &inst.ty, &ty) {
                tracing::debug!(instance = %inst.name, %ty, "default instance");
                return Ok(Some(inst.expr.clone()));
            }
        }
        Ok(None)
    }
}
