//! Error types for synthetic metavariable resolution
//!
//! Three layers, from softest to hardest:
//! - `Exception::Postpone`: not enough information yet, try again later
//! - `ElabError`: a user-facing elaboration error, logged as a diagnostic
//! - `SynthError`: an internal limit or invariant violation that aborts the
//!   whole enclosing elaboration

use lean5_meta::{Expr, MVarId, MetaError};
use thiserror::Error;

/// Result type for the resolution driver and its entry points
pub type SynthResult<T> = Result<T, SynthError>;

/// Result type for collaborators (instance search, elaborator, tactics)
pub type ElabResult<T> = Result<T, Exception>;

/// User-facing elaboration errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ElabError {
    #[error("failed to synthesize instance\n  {ty}")]
    InstanceNotFound { ty: Expr },

    #[error("failed to create type class instance for\n  {ty}")]
    StuckInstance { ty: Expr },

    #[error("{header}\n  {term}\nhas type\n  {actual}\nbut is expected to have type\n  {expected}")]
    TypeMismatch {
        header: String,
        term: Expr,
        actual: Expr,
        expected: Expr,
    },

    #[error("application type mismatch\n  {f} {arg}\nargument\n  {arg}\nhas type\n  {actual}\nbut is expected to have type\n  {expected}")]
    AppTypeMismatch {
        f: Expr,
        arg: Expr,
        actual: Expr,
        expected: Expr,
    },

    #[error("failed to assign default value to metavariable {mvar}\n  {value}\ndefault value was\n  {default}")]
    DefaultValue {
        mvar: MVarId,
        value: Expr,
        default: Expr,
    },

    #[error("unsolved goals\n{}", format_goals(.goals))]
    UnsolvedGoals { goals: Vec<Expr> },

    #[error("elaboration was postponed inside a tactic block")]
    TacticPostponed,

    #[error("{0}")]
    Other(String),
}

fn format_goals(goals: &[Expr]) -> String {
    goals
        .iter()
        .map(|g| format!("⊢ {g}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl ElabError {
    /// Mismatch between the type of `term` and the expected type.
    ///
    /// With no header and a known function this is reported as an
    /// application mismatch on `f term`.
    pub fn type_mismatch(
        header: Option<&str>,
        expected: &Expr,
        actual: &Expr,
        term: &Expr,
        f: Option<&Expr>,
    ) -> Self {
        match (header, f) {
            (None, Some(f)) => ElabError::AppTypeMismatch {
                f: f.clone(),
                arg: term.clone(),
                actual: actual.clone(),
                expected: expected.clone(),
            },
            (header, _) => ElabError::TypeMismatch {
                header: header.unwrap_or("type mismatch").to_string(),
                term: term.clone(),
                actual: actual.clone(),
                expected: expected.clone(),
            },
        }
    }
}

/// Outcome of a collaborator call that did not produce a value
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Exception {
    /// Not resolvable with the information available now
    #[error("elaboration postponed")]
    Postpone,

    #[error(transparent)]
    Error(#[from] ElabError),

    /// A fatal error raised by a nested resolution
    #[error(transparent)]
    Internal(#[from] SynthError),
}

impl Exception {
    pub fn msg(text: impl Into<String>) -> Self {
        Exception::Error(ElabError::Other(text.into()))
    }
}

impl From<MetaError> for Exception {
    fn from(err: MetaError) -> Self {
        Exception::Internal(SynthError::Meta(err))
    }
}

/// Fatal errors; these unwind past the resolution driver
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SynthError {
    #[error("maximum recursion depth has been reached ({max}); use `max_rec_depth` to increase the limit")]
    MaxRecDepth { max: usize },

    #[error("internal error: {kind} metavariable {mvar} survived every resolution phase")]
    StuckUnexpected { mvar: MVarId, kind: &'static str },

    #[error("internal error: metavariable {0} is already pending")]
    DuplicatePending(MVarId),

    #[error(transparent)]
    Meta(#[from] MetaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_rendering() {
        let err = ElabError::type_mismatch(
            None,
            &Expr::const_("Nat"),
            &Expr::const_("Bool"),
            &Expr::const_("true"),
            None,
        );
        assert_eq!(
            err.to_string(),
            "type mismatch\n  true\nhas type\n  Bool\nbut is expected to have type\n  Nat"
        );
    }

    #[test]
    fn test_app_mismatch_when_function_known() {
        let err = ElabError::type_mismatch(
            None,
            &Expr::const_("Nat"),
            &Expr::const_("Bool"),
            &Expr::const_("true"),
            Some(&Expr::const_("Nat.succ")),
        );
        assert!(err.to_string().starts_with("application type mismatch\n  Nat.succ true"));

        let with_header = ElabError::type_mismatch(
            Some("invalid coercion"),
            &Expr::const_("Nat"),
            &Expr::const_("Bool"),
            &Expr::const_("true"),
            Some(&Expr::const_("Nat.succ")),
        );
        assert!(with_header.to_string().starts_with("invalid coercion\n  true"));
    }

    #[test]
    fn test_unsolved_goals_listing() {
        let err = ElabError::UnsolvedGoals {
            goals: vec![Expr::const_("True"), Expr::const_("False")],
        };
        assert_eq!(err.to_string(), "unsolved goals\n⊢ True\n\n⊢ False");
    }

    #[test]
    fn test_fatal_errors_convert_into_exceptions() {
        let ex: Exception = SynthError::MaxRecDepth { max: 8 }.into();
        assert!(matches!(ex, Exception::Internal(SynthError::MaxRecDepth { max: 8 })));
        let ex: Exception = MetaError::UnknownMVar(MVarId(1)).into();
        assert!(matches!(ex, Exception::Internal(SynthError::Meta(_))));
    }
}
