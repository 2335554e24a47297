//! Syntax trees handed back to the elaborator
//!
//! Postponed terms and deferred tactic blocks keep their original syntax so
//! they can be elaborated again later; diagnostics are reported at the
//! position recorded in the syntax.

use crate::name::Name;
use serde::Serialize;
use std::sync::Arc;

/// Source location information for syntax
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SourceInfo {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset
    pub end: usize,
    pub file: Option<Arc<str>>,
}

impl SourceInfo {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            file: None,
        }
    }

    pub fn with_file(start: usize, end: usize, file: impl Into<Arc<str>>) -> Self {
        Self {
            start,
            end,
            file: Some(file.into()),
        }
    }

    /// Synthesized syntax with no position
    pub fn dummy() -> Self {
        Self::default()
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0 && self.file.is_none()
    }
}

impl std::fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{file}:{}-{}", self.start, self.end),
            None => write!(f, "{}-{}", self.start, self.end),
        }
    }
}

/// Kind of a syntax node, e.g. `term.anonymousCtor` or `tactic.exact`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxKind(Name);

impl SyntaxKind {
    pub fn new(kind: &str) -> Self {
        SyntaxKind(Name::from_string(kind))
    }

    pub fn name(&self) -> &Name {
        &self.0
    }

    pub fn is(&self, kind: &str) -> bool {
        self.0 == Name::from_string(kind)
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub info: SourceInfo,
    pub kind: SyntaxKind,
    pub children: Vec<Syntax>,
}

/// General syntax representation
#[derive(Debug, Clone)]
pub enum Syntax {
    Node(Arc<SyntaxNode>),
    /// A lexical atom (keyword, literal, punctuation)
    Atom(SourceInfo, String),
    Ident(SourceInfo, Name),
    /// Placeholder for syntax that failed to parse
    Missing(SourceInfo),
}

impl Syntax {
    pub fn node(info: SourceInfo, kind: &str, children: Vec<Syntax>) -> Self {
        Syntax::Node(Arc::new(SyntaxNode {
            info,
            kind: SyntaxKind::new(kind),
            children,
        }))
    }

    pub fn atom(info: SourceInfo, value: &str) -> Self {
        Syntax::Atom(info, value.to_string())
    }

    pub fn ident(info: SourceInfo, name: &str) -> Self {
        Syntax::Ident(info, Name::from_string(name))
    }

    pub fn missing() -> Self {
        Syntax::Missing(SourceInfo::dummy())
    }

    pub fn info(&self) -> &SourceInfo {
        match self {
            Syntax::Node(node) => &node.info,
            Syntax::Atom(info, _) | Syntax::Ident(info, _) | Syntax::Missing(info) => info,
        }
    }

    /// Position of this syntax, when it has one
    pub fn pos(&self) -> Option<&SourceInfo> {
        let info = self.info();
        (!info.is_dummy()).then_some(info)
    }

    pub fn kind(&self) -> Option<&SyntaxKind> {
        match self {
            Syntax::Node(node) => Some(&node.kind),
            _ => None,
        }
    }

    pub fn is_of_kind(&self, kind: &str) -> bool {
        self.kind().is_some_and(|k| k.is(kind))
    }

    pub fn children(&self) -> &[Syntax] {
        match self {
            Syntax::Node(node) => &node.children,
            _ => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Syntax> {
        self.children().get(index)
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Syntax::Atom(_, v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&Name> {
        match self {
            Syntax::Ident(_, n) => Some(n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Syntax::Missing(_))
    }
}

impl std::fmt::Display for Syntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Syntax::Atom(_, v) => write!(f, "{v}"),
            Syntax::Ident(_, n) => write!(f, "{n}"),
            Syntax::Missing(_) => write!(f, "<missing>"),
            Syntax::Node(node) => {
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{child}")?;
                }
                Ok(())
            }
        }
    }
}

/// One macro expansion step: `before` expanded to `after`
#[derive(Debug, Clone)]
pub struct MacroStackElem {
    pub before: Syntax,
    pub after: Syntax,
}

/// Expansions in effect, innermost first
pub type MacroStack = Vec<MacroStackElem>;
