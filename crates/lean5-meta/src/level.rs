//! Universe levels

use crate::name::Name;
use std::sync::Arc;

/// Universe level of a `Sort`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Zero,
    Succ(Arc<Level>),
    Max(Arc<Level>, Arc<Level>),
    /// Universe parameter `u`
    Param(Name),
}

impl Level {
    pub fn zero() -> Self {
        Level::Zero
    }

    pub fn one() -> Self {
        Level::succ(Level::Zero)
    }

    pub fn succ(l: Level) -> Self {
        Level::Succ(Arc::new(l))
    }

    pub fn max(a: Level, b: Level) -> Self {
        Level::Max(Arc::new(a), Arc::new(b))
    }

    pub fn param(name: impl Into<Name>) -> Self {
        Level::Param(name.into())
    }

    /// The numeric value when the level is closed and has no `max`
    pub fn to_nat(&self) -> Option<u64> {
        match self {
            Level::Zero => Some(0),
            Level::Succ(l) => l.to_nat().map(|n| n + 1),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(n) = self.to_nat() {
            return write!(f, "{n}");
        }
        match self {
            Level::Succ(l) => write!(f, "{l}+1"),
            Level::Max(a, b) => write!(f, "max {a} {b}"),
            Level::Param(name) => write!(f, "{name}"),
            Level::Zero => write!(f, "0"),
        }
    }
}
