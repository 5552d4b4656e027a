//! Structural verification.
//!
//! Walks the whole tree and reports the first broken invariant: fill range,
//! child count, key order, separator bounds, leaf depth, and single ownership
//! of every arena slot.

use super::BTree;
use crate::error::{BTreeError, Result};
use crate::types::NodeId;
use std::collections::HashSet;

/// State accumulated over one verification walk
#[derive(Default)]
struct Walk {
    seen: HashSet<NodeId>,
    leaf_depth: Option<usize>,
    keys: usize,
}

impl<K: Ord> BTree<K> {
    /// Check every structural invariant of the tree
    ///
    /// A failure always indicates a bug in the tree itself; public
    /// operations never leave the tree in a state that fails this check.
    pub fn check_invariants(&self) -> Result<()> {
        let mut walk = Walk::default();
        self.check_node(self.root, 0, None, None, &mut walk)?;

        if let Some(leaked) = self.arena.live_ids().find(|id| !walk.seen.contains(id)) {
            return Err(BTreeError::invariant(format!(
                "node {} is live but not reachable from the root",
                leaked
            )));
        }

        if walk.keys != self.len {
            return Err(BTreeError::invariant(format!(
                "tree reports {} keys but holds {}",
                self.len, walk.keys
            )));
        }

        Ok(())
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        walk: &mut Walk,
    ) -> Result<()> {
        if !walk.seen.insert(id) {
            return Err(BTreeError::invariant(format!(
                "node {} is reachable more than once",
                id
            )));
        }

        let node = self.arena.get(id).ok_or_else(|| {
            BTreeError::invariant(format!("node {} is referenced but not allocated", id))
        })?;

        let config = self.config();
        let is_root = id == self.root;

        if node.len() > config.max_keys() {
            return Err(BTreeError::invariant(format!(
                "node {} has {} keys, more than {}",
                id,
                node.len(),
                config.max_keys()
            )));
        }

        if !is_root && node.len() < config.min_keys() {
            return Err(BTreeError::invariant(format!(
                "node {} has {} keys, fewer than {}",
                id,
                node.len(),
                config.min_keys()
            )));
        }

        if node.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(BTreeError::invariant(format!(
                "keys of node {} are not strictly increasing",
                id
            )));
        }

        if let (Some(lower), Some(first)) = (lower, node.keys.first()) {
            if first <= lower {
                return Err(BTreeError::invariant(format!(
                    "node {} holds a key not above its left separator",
                    id
                )));
            }
        }

        if let (Some(upper), Some(last)) = (upper, node.keys.last()) {
            if last >= upper {
                return Err(BTreeError::invariant(format!(
                    "node {} holds a key not below its right separator",
                    id
                )));
            }
        }

        walk.keys += node.len();

        if node.is_leaf() {
            return match walk.leaf_depth {
                None => {
                    walk.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected != depth => Err(BTreeError::invariant(format!(
                    "leaf {} at depth {} but other leaves at depth {}",
                    id, depth, expected
                ))),
                Some(_) => Ok(()),
            };
        }

        if node.is_empty() {
            return Err(BTreeError::invariant(format!(
                "internal node {} has no keys",
                id
            )));
        }

        if node.children.len() != node.len() + 1 {
            return Err(BTreeError::invariant(format!(
                "internal node {} has {} keys but {} children",
                id,
                node.len(),
                node.children.len()
            )));
        }

        for (i, &child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let child_upper = if i == node.len() {
                upper
            } else {
                Some(&node.keys[i])
            };
            self.check_node(child, depth + 1, child_lower, child_upper, walk)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn create_test_btree() -> BTree<i32> {
        BTree::from_keys(2, [10, 20, 5, 6, 12, 30, 7, 17]).unwrap()
    }

    fn expect_violation(tree: &BTree<i32>, fragment: &str) {
        match tree.check_invariants() {
            Err(BTreeError::InvariantViolation(msg)) => {
                assert!(msg.contains(fragment), "unexpected message: {}", msg)
            }
            other => panic!("expected violation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_tree_passes() {
        let tree = create_test_btree();
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_detects_unordered_keys() {
        let mut tree = create_test_btree();
        let leaf = tree.arena[tree.root].child(0);
        tree.arena[leaf].keys.swap(0, 1);
        expect_violation(&tree, "not strictly increasing");
    }

    #[test]
    fn test_detects_key_outside_separators() {
        let mut tree = create_test_btree();
        let leaf = tree.arena[tree.root].child(1);
        tree.arena[leaf].keys[1] = 25;
        expect_violation(&tree, "right separator");
    }

    #[test]
    fn test_detects_underfull_node() {
        let mut tree = create_test_btree();
        let leaf = tree.arena[tree.root].child(2);
        tree.arena[leaf].keys.clear();
        tree.len -= 1;
        expect_violation(&tree, "fewer than");
    }

    #[test]
    fn test_detects_leaked_node() {
        let mut tree = create_test_btree();
        tree.arena.alloc(Node::with_parts(vec![99], Vec::new()));
        expect_violation(&tree, "reachable from the root");
    }

    #[test]
    fn test_detects_shared_child() {
        let mut tree = create_test_btree();
        let root = tree.root;
        let first = tree.arena[root].child(0);
        tree.arena[root].children[1] = first;
        expect_violation(&tree, "more than once");
    }

    #[test]
    fn test_detects_stale_length() {
        let mut tree = create_test_btree();
        tree.len += 1;
        expect_violation(&tree, "reports 9 keys");
    }
}
