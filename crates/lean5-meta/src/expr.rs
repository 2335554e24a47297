//! Expression representation
//!
//! The term language seen by the elaborator: de Bruijn indices for bound
//! variables, free variables from the local context, and metavariables
//! standing for terms that are not determined yet.

use crate::level::Level;
use crate::name::Name;
use std::sync::Arc;

/// Binder information (how a variable is bound)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinderInfo {
    /// Regular explicit binding
    Default,
    /// Implicit binding (inferred by unification) `{x : T}`
    Implicit,
    /// Strict implicit (must be inferrable) `{{x : T}}`
    StrictImplicit,
    /// Instance implicit (resolved by type class) `[x : T]`
    InstImplicit,
}

/// Literal values
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Nat(u64),
    String(Arc<str>),
}

/// Unique identifier for free variables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FVarId(pub u64);

/// Unique identifier for metavariables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MVarId(pub u64);

impl std::fmt::Display for MVarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?m.{}", self.0)
    }
}

/// Name of the axiom used as the error sentinel
pub const SORRY_AX: &str = "sorryAx";

/// Core expression type
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Bound variable (de Bruijn index, 0 = innermost)
    BVar(u32),
    /// Free variable
    FVar(FVarId),
    /// Metavariable
    MVar(MVarId),
    /// Sort (Type u or Prop)
    Sort(Level),
    /// Constant
    Const(Name),
    /// Function application
    App(Arc<Expr>, Arc<Expr>),
    /// Lambda abstraction: λ (x : A), body
    Lam(BinderInfo, Arc<Expr>, Arc<Expr>),
    /// Pi/forall type: (x : A) → B
    Pi(BinderInfo, Arc<Expr>, Arc<Expr>),
    /// Literal value
    Lit(Literal),
}

impl Expr {
    pub fn bvar(idx: u32) -> Self {
        Expr::BVar(idx)
    }

    pub fn fvar(id: FVarId) -> Self {
        Expr::FVar(id)
    }

    pub fn mvar(id: MVarId) -> Self {
        Expr::MVar(id)
    }

    pub fn sort(level: Level) -> Self {
        Expr::Sort(level)
    }

    pub fn prop() -> Self {
        Expr::Sort(Level::zero())
    }

    pub fn type_() -> Self {
        Expr::Sort(Level::one())
    }

    pub fn const_(name: impl Into<Name>) -> Self {
        Expr::Const(name.into())
    }

    pub fn app(f: Expr, a: Expr) -> Self {
        Expr::App(Arc::new(f), Arc::new(a))
    }

    /// `f a₁ … aₙ`
    pub fn mk_app(f: Expr, args: impl IntoIterator<Item = Expr>) -> Self {
        args.into_iter().fold(f, Expr::app)
    }

    pub fn lam(bi: BinderInfo, ty: Expr, body: Expr) -> Self {
        Expr::Lam(bi, Arc::new(ty), Arc::new(body))
    }

    pub fn pi(bi: BinderInfo, ty: Expr, body: Expr) -> Self {
        Expr::Pi(bi, Arc::new(ty), Arc::new(body))
    }

    /// Non-dependent function type `a → b`
    pub fn arrow(a: Expr, b: Expr) -> Self {
        Expr::pi(BinderInfo::Default, a, b)
    }

    pub fn nat_lit(n: u64) -> Self {
        Expr::Lit(Literal::Nat(n))
    }

    pub fn str_lit(s: &str) -> Self {
        Expr::Lit(Literal::String(Arc::from(s)))
    }

    /// Error sentinel `sorryAx ty`, assigned to metavariables whose
    /// resolution failed with a reported error.
    pub fn sorry(ty: Expr) -> Self {
        Expr::app(Expr::const_(SORRY_AX), ty)
    }

    pub fn is_sorry(&self) -> bool {
        matches!(self.get_app_fn(), Expr::Const(n) if n.last_str() == Some(SORRY_AX) && n.len() == 1)
    }

    pub fn is_mvar(&self) -> bool {
        matches!(self, Expr::MVar(_))
    }

    pub fn mvar_id(&self) -> Option<MVarId> {
        match self {
            Expr::MVar(id) => Some(*id),
            _ => None,
        }
    }

    pub fn const_name(&self) -> Option<&Name> {
        match self {
            Expr::Const(n) => Some(n),
            _ => None,
        }
    }

    /// Head of an application spine
    pub fn get_app_fn(&self) -> &Expr {
        let mut e = self;
        while let Expr::App(f, _) = e {
            e = f;
        }
        e
    }

    /// Arguments of an application spine, outermost last
    pub fn get_app_args(&self) -> Vec<&Expr> {
        let mut args = Vec::new();
        let mut e = self;
        while let Expr::App(f, a) = e {
            args.push(a.as_ref());
            e = f;
        }
        args.reverse();
        args
    }

    pub fn get_app_num_args(&self) -> usize {
        let mut n = 0;
        let mut e = self;
        while let Expr::App(f, _) = e {
            n += 1;
            e = f;
        }
        n
    }

    /// Whether any metavariable occurs in the expression (assigned or not)
    pub fn has_mvar(&self) -> bool {
        match self {
            Expr::MVar(_) => true,
            Expr::App(f, a) => f.has_mvar() || a.has_mvar(),
            Expr::Lam(_, t, b) | Expr::Pi(_, t, b) => t.has_mvar() || b.has_mvar(),
            Expr::BVar(_) | Expr::FVar(_) | Expr::Sort(_) | Expr::Const(_) | Expr::Lit(_) => false,
        }
    }

    /// Whether `mvar` occurs in the expression
    pub fn occurs(&self, mvar: MVarId) -> bool {
        match self {
            Expr::MVar(id) => *id == mvar,
            Expr::App(f, a) => f.occurs(mvar) || a.occurs(mvar),
            Expr::Lam(_, t, b) | Expr::Pi(_, t, b) => t.occurs(mvar) || b.occurs(mvar),
            _ => false,
        }
    }

    /// Bottom-up replacement. `f` returning `Some` stops the descent.
    #[must_use]
    pub fn replace(&self, f: &mut impl FnMut(&Expr) -> Option<Expr>) -> Expr {
        if let Some(new) = f(self) {
            return new;
        }
        match self {
            Expr::App(g, a) => Expr::app(g.replace(f), a.replace(f)),
            Expr::Lam(bi, t, b) => Expr::lam(*bi, t.replace(f), b.replace(f)),
            Expr::Pi(bi, t, b) => Expr::pi(*bi, t.replace(f), b.replace(f)),
            _ => self.clone(),
        }
    }

    fn needs_parens(&self) -> bool {
        matches!(self, Expr::App(..) | Expr::Lam(..) | Expr::Pi(..))
            && !self.is_sorry()
    }
}

fn fmt_arg(e: &Expr, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if e.needs_parens() {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::BVar(i) => write!(f, "#{i}"),
            Expr::FVar(id) => write!(f, "_fvar.{}", id.0),
            Expr::MVar(id) => write!(f, "{id}"),
            Expr::Sort(l) => match l.to_nat() {
                Some(0) => write!(f, "Prop"),
                Some(1) => write!(f, "Type"),
                _ => write!(f, "Sort {l}"),
            },
            Expr::Const(n) => write!(f, "{n}"),
            Expr::App(..) if self.is_sorry() => write!(f, "sorry"),
            Expr::App(..) => {
                fmt_arg(self.get_app_fn(), f)?;
                for arg in self.get_app_args() {
                    write!(f, " ")?;
                    fmt_arg(arg, f)?;
                }
                Ok(())
            }
            Expr::Lam(_, t, b) => write!(f, "fun _ : {t} => {b}"),
            Expr::Pi(BinderInfo::InstImplicit, t, b) => write!(f, "[{t}] → {b}"),
            Expr::Pi(_, t, b) => {
                fmt_arg(t, f)?;
                write!(f, " → {b}")
            }
            Expr::Lit(Literal::Nat(n)) => write!(f, "{n}"),
            Expr::Lit(Literal::String(s)) => write!(f, "{s:?}"),
        }
    }
}
