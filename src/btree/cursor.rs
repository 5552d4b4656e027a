//! In-order key iteration.
//!
//! The cursor keeps a stack of (node_id, key_index) pairs describing the path
//! from the root to the next key to yield.

use super::BTree;
use crate::storage::NodeArena;
use crate::types::NodeId;
use std::iter::FusedIterator;

/// Iterator over all keys of a tree in ascending order
pub struct Keys<'a, K> {
    arena: &'a NodeArena<K>,
    /// Path to the next key; each entry is a node and its next key index
    stack: Vec<(NodeId, usize)>,
    /// Keys not yet yielded
    remaining: usize,
}

impl<'a, K> Keys<'a, K> {
    fn new(arena: &'a NodeArena<K>, root: NodeId, len: usize) -> Self {
        let mut cursor = Self {
            arena,
            stack: Vec::new(),
            remaining: len,
        };
        cursor.descend_to_leftmost(root);
        cursor
    }

    /// Push the path from `id` down to its leftmost leaf
    fn descend_to_leftmost(&mut self, id: NodeId) {
        let mut current = id;
        loop {
            self.stack.push((current, 0));
            match self.arena[current].children().first() {
                Some(&child) => current = child,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let arena: &'a NodeArena<K> = self.arena;

        while let Some((id, index)) = self.stack.last_mut() {
            let node = &arena[*id];

            if *index < node.len() {
                let key = &node.keys()[*index];
                *index += 1;

                // Keys after this one start in the subtree to its right
                if let Some(&child) = node.children().get(*index) {
                    self.descend_to_leftmost(child);
                }

                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }

            self.stack.pop();
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> FusedIterator for Keys<'_, K> {}

impl<K> BTree<K> {
    /// Iterate over all keys in ascending order
    pub fn keys(&self) -> Keys<'_, K> {
        Keys::new(&self.arena, self.root, self.len)
    }
}
