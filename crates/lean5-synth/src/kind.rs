//! Pending synthetic metavariables

use lean5_meta::{Expr, MVarId, MacroStack, Name, Syntax};

/// Elaboration context captured when a term is postponed, restored when it
/// is resumed
#[derive(Debug, Clone, Default)]
pub struct SavedContext {
    pub macro_stack: MacroStack,
    pub decl_name: Option<Name>,
}

/// Why a metavariable was left for later and how to solve it
#[derive(Debug, Clone)]
pub enum SyntheticMVarKind {
    /// Type class instance, solved by instance search
    TypeClass,
    /// Coercion of `e : e_type` to `expected_type`. `f` is the function `e`
    /// was passed to, if any, for better error messages.
    Coe {
        header: Option<String>,
        expected_type: Expr,
        e_type: Expr,
        e: Expr,
        f: Option<Expr>,
    },
    /// Assigned the given value if nothing else determines it
    WithDefault(Expr),
    /// Elaboration of the syntax was postponed
    Postponed(SavedContext),
    /// Tactic block proving the metavariable's type
    Tactic {
        decl_name: Option<Name>,
        code: Syntax,
    },
}

impl SyntheticMVarKind {
    pub fn name(&self) -> &'static str {
        match self {
            SyntheticMVarKind::TypeClass => "typeclass",
            SyntheticMVarKind::Coe { .. } => "coe",
            SyntheticMVarKind::WithDefault(_) => "default",
            SyntheticMVarKind::Postponed(_) => "postponed",
            SyntheticMVarKind::Tactic { .. } => "tactic",
        }
    }
}

impl std::fmt::Display for SyntheticMVarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntheticMVarKind::WithDefault(value) => write!(f, "default {value}"),
            SyntheticMVarKind::Coe {
                expected_type,
                e_type,
                ..
            } => write!(f, "coe {e_type} ↦ {expected_type}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// A pending entry: the metavariable, the syntax it came from, and its kind
#[derive(Debug, Clone)]
pub struct SyntheticMVarDecl {
    pub mvar_id: MVarId,
    /// Original syntax; diagnostics are reported at its position
    pub stx: Syntax,
    pub kind: SyntheticMVarKind,
}

impl SyntheticMVarDecl {
    pub fn new(mvar_id: MVarId, stx: Syntax, kind: SyntheticMVarKind) -> Self {
        Self { mvar_id, stx, kind }
    }
}
