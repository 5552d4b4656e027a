//! Released slot stack.
//!
//! Slots come back out in reverse release order, so a node freed by a merge
//! is the first one a following split reuses.

use crate::types::NodeId;

/// Stack of released node slots
#[derive(Debug, Default)]
pub struct FreeList {
    released: Vec<NodeId>,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a released slot
    pub fn push(&mut self, id: NodeId) {
        self.released.push(id);
    }

    /// Take the most recently released slot
    pub fn pop(&mut self) -> Option<NodeId> {
        self.released.pop()
    }

    pub fn len(&self) -> usize {
        self.released.len()
    }

    pub fn is_empty(&self) -> bool {
        self.released.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freelist_reuses_latest_release_first() {
        let mut free = FreeList::new();
        assert_eq!(free.pop(), None);

        for id in [3, 8, 1] {
            free.push(NodeId::new(id));
        }
        assert_eq!(free.len(), 3);

        assert_eq!(free.pop(), Some(NodeId::new(1)));
        free.push(NodeId::new(7));
        assert_eq!(free.pop(), Some(NodeId::new(7)));
        assert_eq!(free.pop(), Some(NodeId::new(8)));
        assert_eq!(free.pop(), Some(NodeId::new(3)));
        assert!(free.is_empty());
    }
}
