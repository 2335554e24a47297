//! Hierarchical names
//!
//! Names like `Monad`, `Prod.mk` or `_inst.3`. Declarations, classes,
//! instances and syntax kinds are all identified by a `Name`.
//!
//! The hash is computed once when a name is built so that the instance
//! and class tables can look names up without walking the component chain.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// One link of the name chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameInner {
    /// The root of every name
    Anon,
    /// String component
    Str(Arc<Name>, Arc<str>),
    /// Numeric component (used for generated names)
    Num(Arc<Name>, u64),
}

/// Hierarchical name with cached hash.
#[derive(Clone, Debug)]
pub struct Name {
    inner: NameInner,
    cached_hash: u64,
}

impl Name {
    fn from_inner(inner: NameInner) -> Self {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        inner.hash(&mut hasher);
        Name {
            inner,
            cached_hash: hasher.finish(),
        }
    }

    /// The anonymous name
    pub fn anon() -> Self {
        Self::from_inner(NameInner::Anon)
    }

    /// Append a string component
    #[must_use]
    pub fn str(self, s: impl AsRef<str>) -> Self {
        Self::from_inner(NameInner::Str(Arc::new(self), Arc::from(s.as_ref())))
    }

    /// Append a numeric component
    #[must_use]
    pub fn num(self, n: u64) -> Self {
        Self::from_inner(NameInner::Num(Arc::new(self), n))
    }

    /// Build a name from a dotted string like `Prod.mk`
    pub fn from_string(s: &str) -> Self {
        s.split('.').fold(Name::anon(), |acc, part| {
            if part.is_empty() {
                acc
            } else if let Ok(n) = part.parse::<u64>() {
                acc.num(n)
            } else {
                acc.str(part)
            }
        })
    }

    pub fn is_anon(&self) -> bool {
        matches!(self.inner, NameInner::Anon)
    }

    #[inline]
    pub fn inner(&self) -> &NameInner {
        &self.inner
    }

    /// Everything but the last component. The anonymous name is its own prefix.
    pub fn prefix(&self) -> Name {
        match &self.inner {
            NameInner::Anon => self.clone(),
            NameInner::Str(p, _) | NameInner::Num(p, _) => (**p).clone(),
        }
    }

    /// Last string component, if the name ends in one
    pub fn last_str(&self) -> Option<&str> {
        match &self.inner {
            NameInner::Str(_, s) => Some(s),
            _ => None,
        }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        match &self.inner {
            NameInner::Anon => 0,
            NameInner::Str(p, _) | NameInner::Num(p, _) => p.len() + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_anon()
    }

    /// Whether `self` is a (non-strict) prefix of `other`
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        let depth = self.len();
        let mut cur = other.clone();
        while cur.len() > depth {
            cur = cur.prefix();
        }
        cur == *self
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.cached_hash == other.cached_hash && self.inner == other.inner
    }
}

impl Eq for Name {}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cached_hash.hash(state);
    }
}

impl FromStr for Name {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Name::from_string(s))
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::from_string(s)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            NameInner::Anon => write!(f, "[anonymous]"),
            NameInner::Str(prefix, s) if prefix.is_anon() => write!(f, "{s}"),
            NameInner::Num(prefix, n) if prefix.is_anon() => write!(f, "{n}"),
            NameInner::Str(prefix, s) => write!(f, "{prefix}.{s}"),
            NameInner::Num(prefix, n) => write!(f, "{prefix}.{n}"),
        }
    }
}

// Names travel as their dotted form
impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Name::from_string(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_str() {
        let name: Name = "Prod.mk".parse().unwrap();
        assert_eq!(name.to_string(), "Prod.mk");
        assert_eq!(name.len(), 2);
        assert_eq!(name.last_str(), Some("mk"));
        assert_eq!(name.prefix(), Name::from_string("Prod"));
    }

    #[test]
    fn test_numeric_components() {
        let name = Name::from_string("_inst.3");
        assert!(matches!(name.inner(), NameInner::Num(_, 3)));
        assert_eq!(name.to_string(), "_inst.3");
    }

    #[test]
    fn test_prefix_relation() {
        let prod = Name::from_string("Prod");
        assert!(prod.is_prefix_of(&Name::from_string("Prod.mk")));
        assert!(prod.is_prefix_of(&prod));
        assert!(!Name::from_string("Prod.mk").is_prefix_of(&prod));
        assert!(Name::anon().is_prefix_of(&prod));
    }

    #[test]
    fn test_name_serde_is_dotted() {
        let name = Name::from_string("Monad.bind");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Monad.bind\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
