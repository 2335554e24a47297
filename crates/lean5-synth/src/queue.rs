//! The pending queue
//!
//! Entries are stored oldest first, the order in which a step attempts
//! them. No metavariable appears twice.

use crate::kind::SyntheticMVarDecl;
use lean5_meta::MVarId;

#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    entries: Vec<SyntheticMVarDecl>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Returns `false`, leaving the queue unchanged, if the
    /// metavariable is already pending.
    #[must_use]
    pub fn push(&mut self, decl: SyntheticMVarDecl) -> bool {
        if self.contains(decl.mvar_id) {
            return false;
        }
        self.entries.push(decl);
        true
    }

    pub fn contains(&self, mvar: MVarId) -> bool {
        self.entries.iter().any(|d| d.mvar_id == mvar)
    }

    pub fn get(&self, mvar: MVarId) -> Option<&SyntheticMVarDecl> {
        self.entries.iter().find(|d| d.mvar_id == mvar)
    }

    /// Remove and return the entry for `mvar`
    pub fn remove(&mut self, mvar: MVarId) -> Option<SyntheticMVarDecl> {
        let idx = self.entries.iter().position(|d| d.mvar_id == mvar)?;
        Some(self.entries.remove(idx))
    }

    /// Take every entry, leaving the queue empty
    pub fn take(&mut self) -> Vec<SyntheticMVarDecl> {
        std::mem::take(&mut self.entries)
    }

    /// Append entries after the current ones, skipping metavariables that
    /// are already pending
    pub fn extend(&mut self, decls: impl IntoIterator<Item = SyntheticMVarDecl>) {
        for decl in decls {
            let _ = self.push(decl);
        }
    }

    /// Keep `older` in front of the entries currently queued
    pub fn prepend(&mut self, older: Vec<SyntheticMVarDecl>) {
        let newer = std::mem::replace(&mut self.entries, older);
        self.extend(newer);
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntheticMVarDecl> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::SyntheticMVarKind;
    use lean5_meta::Syntax;

    fn entry(id: u64) -> SyntheticMVarDecl {
        SyntheticMVarDecl::new(MVarId(id), Syntax::missing(), SyntheticMVarKind::TypeClass)
    }

    fn ids(queue: &PendingQueue) -> Vec<u64> {
        queue.iter().map(|d| d.mvar_id.0).collect()
    }

    #[test]
    fn test_no_duplicates() {
        let mut queue = PendingQueue::new();
        assert!(queue.push(entry(1)));
        assert!(queue.push(entry(2)));
        assert!(!queue.push(entry(1)));
        assert_eq!(ids(&queue), vec![1, 2]);
    }

    #[test]
    fn test_take_leaves_empty_queue() {
        let mut queue = PendingQueue::new();
        queue.extend([entry(1), entry(2)]);
        let batch = queue.take();
        assert_eq!(batch.len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_prepend_keeps_older_first() {
        let mut queue = PendingQueue::new();
        queue.extend([entry(3), entry(4)]);
        queue.prepend(vec![entry(1), entry(2), entry(3)]);
        assert_eq!(ids(&queue), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove() {
        let mut queue = PendingQueue::new();
        queue.extend([entry(1), entry(2), entry(3)]);
        assert_eq!(queue.remove(MVarId(2)).map(|d| d.mvar_id), Some(MVarId(2)));
        assert!(queue.remove(MVarId(2)).is_none());
        assert_eq!(ids(&queue), vec![1, 3]);
    }
}
