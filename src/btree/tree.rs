//! B-tree core implementation.
//!
//! This module provides the main BTree struct with operations for:
//! - insert: single top-down pass, splitting full nodes before entering them
//! - delete: single top-down pass, topping up thin children before entering them
//!
//! Both passes keep the node on the path able to absorb the change, so no
//! operation ever walks back up the tree.

use crate::error::Result;
use crate::node::Node;
use crate::storage::NodeArena;
use crate::types::{BTreeConfig, NodeId};
use std::mem;
use tracing::{debug, trace};

/// An in-memory B-tree of minimum degree `t`
///
/// Every node except the root holds between `t - 1` and `2t - 1` keys and
/// all leaves sit at the same depth. Keys form a set: inserting a key that
/// is already present does nothing.
#[derive(Debug)]
pub struct BTree<K> {
    /// Owner of every node in the tree
    pub(super) arena: NodeArena<K>,
    /// Root node (a leaf while the tree fits in one node)
    pub(super) root: NodeId,
    /// Degree configuration, fixed at construction
    config: BTreeConfig,
    /// Number of keys in the tree
    pub(super) len: usize,
}

impl<K> BTree<K> {
    /// Minimum degree `t`
    pub fn degree(&self) -> usize {
        self.config.degree
    }

    /// Configuration this tree was built with
    pub fn config(&self) -> BTreeConfig {
        self.config
    }

    /// Number of keys in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; a tree whose root is a leaf has height 1
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let Some(&child) = self.arena[current].children.first() {
            height += 1;
            current = child;
        }
        height
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl<K: Ord> BTree<K> {
    /// Create an empty tree of minimum degree `degree`
    ///
    /// Fails with `InvalidDegree` when `degree` is below 2 or above `MAX_DEGREE`.
    pub fn new(degree: usize) -> Result<Self> {
        Self::with_config(BTreeConfig::new(degree))
    }

    /// Create an empty tree from a configuration
    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        config.validate()?;

        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new_leaf());

        Ok(Self {
            arena,
            root,
            config,
            len: 0,
        })
    }

    /// Create a tree and insert `keys` in order
    pub fn from_keys<I>(degree: usize, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::new(degree)?;
        tree.extend(keys);
        Ok(tree)
    }

    /// Insert a key
    ///
    /// Returns `false`, leaving the tree untouched, if the key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains_key(&key) {
            trace!("duplicate key ignored");
            return false;
        }

        if self.arena[self.root].is_full(self.config.max_keys()) {
            let old_root = self.root;
            self.root = self.arena.alloc(Node::new_internal(old_root));
            self.split_child(self.root, 0);
            debug!(root = %self.root, height = self.height(), "root split, tree grew");
        }

        self.insert_non_full(self.root, key);
        self.len += 1;
        self.debug_check();
        true
    }

    /// Delete a key
    ///
    /// Returns `false` if the key is absent; that case is a no-op and leaves
    /// the structure exactly as it was.
    pub fn delete(&mut self, key: &K) -> bool {
        if !self.contains_key(key) {
            trace!("delete of absent key ignored");
            return false;
        }

        let removed = self.remove_from(self.root, key).is_some();
        debug_assert!(removed, "present key was not removed");

        let root = &self.arena[self.root];
        if root.is_empty() && !root.is_leaf() {
            let old_root = self.root;
            self.root = root.child(0);
            self.arena.release(old_root);
            debug!(root = %self.root, height = self.height(), "root emptied, tree shrank");
        }

        if removed {
            self.len -= 1;
        }
        self.debug_check();
        removed
    }

    /// Whether `key` is stored somewhere in the tree
    fn contains_key(&self, key: &K) -> bool {
        let mut current = self.root;
        loop {
            let node = &self.arena[current];
            let idx = node.lower_bound(key);
            if idx < node.len() && node.keys[idx] == *key {
                return true;
            }
            if node.is_leaf() {
                return false;
            }
            current = node.child(idx);
        }
    }

    /// Insert into the subtree rooted at a node that is known not to be full
    fn insert_non_full(&mut self, mut current: NodeId, key: K) {
        let max_keys = self.config.max_keys();
        loop {
            let node = &self.arena[current];
            let mut idx = node.upper_bound(&key);

            if node.is_leaf() {
                self.arena[current].keys.insert(idx, key);
                return;
            }

            if self.arena[node.child(idx)].is_full(max_keys) {
                self.split_child(current, idx);
                if key > self.arena[current].keys[idx] {
                    idx += 1;
                }
            }

            current = self.arena[current].child(idx);
        }
    }

    /// Split the full child at `index` of `parent`
    ///
    /// The child keeps its first `t - 1` keys (and first `t` children), the
    /// median moves up into `parent.keys[index]`, and the rest moves into a
    /// new sibling at `parent.children[index + 1]`. `parent` must not be full.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let degree = self.degree();
        let child = self.arena[parent].child(index);

        let full = &mut self.arena[child];
        debug_assert!(
            full.is_full(self.config.max_keys()),
            "split of non-full node {}",
            child
        );
        let mut upper_keys = full.keys.split_off(degree - 1);
        let median = upper_keys.remove(0);
        let upper_children = if full.is_leaf() {
            Vec::new()
        } else {
            full.children.split_off(degree)
        };

        let sibling = self
            .arena
            .alloc(Node::with_parts(upper_keys, upper_children));

        let parent_node = &mut self.arena[parent];
        parent_node.keys.insert(index, median);
        parent_node.children.insert(index + 1, sibling);

        trace!(node = %child, %sibling, "split full node");
    }

    /// Remove `key` from the subtree rooted at `current`
    ///
    /// `current` is the root or holds at least `t` keys, so it can lose one
    /// key (directly or through a merge below it) and stay valid.
    fn remove_from(&mut self, current: NodeId, key: &K) -> Option<K> {
        let degree = self.degree();
        let node = &self.arena[current];
        let idx = node.lower_bound(key);
        let found = idx < node.len() && node.keys[idx] == *key;

        if node.is_leaf() {
            return found.then(|| self.arena[current].keys.remove(idx));
        }

        if found {
            let left = node.child(idx);
            let right = node.child(idx + 1);

            if self.arena[left].len() >= degree {
                let predecessor = self.remove_max(left)?;
                return Some(mem::replace(
                    &mut self.arena[current].keys[idx],
                    predecessor,
                ));
            }

            if self.arena[right].len() >= degree {
                let successor = self.remove_min(right)?;
                return Some(mem::replace(&mut self.arena[current].keys[idx], successor));
            }

            // Both neighbours are minimal: pull the key down into a merged node
            self.merge_children(current, idx);
            return self.remove_from(left, key);
        }

        let idx = self.fill_child(current, idx);
        let child = self.arena[current].child(idx);
        self.remove_from(child, key)
    }

    /// Remove and return the largest key of a subtree whose root has at least `t` keys
    fn remove_max(&mut self, mut current: NodeId) -> Option<K> {
        loop {
            let node = &self.arena[current];
            if node.is_leaf() {
                return self.arena[current].keys.pop();
            }
            let last = node.len();
            let idx = self.fill_child(current, last);
            current = self.arena[current].child(idx);
        }
    }

    /// Remove and return the smallest key of a subtree whose root has at least `t` keys
    fn remove_min(&mut self, mut current: NodeId) -> Option<K> {
        loop {
            if self.arena[current].is_leaf() {
                let leaf = &mut self.arena[current];
                return (!leaf.is_empty()).then(|| leaf.keys.remove(0));
            }
            let idx = self.fill_child(current, 0);
            current = self.arena[current].child(idx);
        }
    }

    /// Make sure the child at `index` of `parent` holds at least `t` keys
    ///
    /// Borrows a key from a sibling when one can spare it, otherwise merges
    /// with a sibling. Returns the index of the child that now covers the
    /// original child's key range.
    fn fill_child(&mut self, parent: NodeId, index: usize) -> usize {
        let degree = self.degree();
        let node = &self.arena[parent];

        if self.arena[node.child(index)].len() >= degree {
            return index;
        }

        if index > 0 && self.arena[node.child(index - 1)].len() >= degree {
            self.rotate_right(parent, index);
            return index;
        }

        if index < node.len() && self.arena[node.child(index + 1)].len() >= degree {
            self.rotate_left(parent, index);
            return index;
        }

        if index < node.len() {
            self.merge_children(parent, index);
            index
        } else {
            self.merge_children(parent, index - 1);
            index - 1
        }
    }

    /// Move the last key of child `index - 1` up through the separator into child `index`
    fn rotate_right(&mut self, parent: NodeId, index: usize) {
        let donor = self.arena[parent].child(index - 1);
        let receiver = self.arena[parent].child(index);

        let donor_node = &mut self.arena[donor];
        let Some(key) = donor_node.keys.pop() else {
            return;
        };
        let moved_child = donor_node.children.pop();

        let separator = mem::replace(&mut self.arena[parent].keys[index - 1], key);

        let receiver_node = &mut self.arena[receiver];
        receiver_node.keys.insert(0, separator);
        if let Some(child) = moved_child {
            receiver_node.children.insert(0, child);
        }

        trace!(from = %donor, to = %receiver, "borrowed key from left sibling");
    }

    /// Move the first key of child `index + 1` up through the separator into child `index`
    fn rotate_left(&mut self, parent: NodeId, index: usize) {
        let donor = self.arena[parent].child(index + 1);
        let receiver = self.arena[parent].child(index);

        let donor_node = &mut self.arena[donor];
        if donor_node.is_empty() {
            return;
        }
        let key = donor_node.keys.remove(0);
        let moved_child = if donor_node.is_leaf() {
            None
        } else {
            Some(donor_node.children.remove(0))
        };

        let separator = mem::replace(&mut self.arena[parent].keys[index], key);

        let receiver_node = &mut self.arena[receiver];
        receiver_node.keys.push(separator);
        receiver_node.children.extend(moved_child);

        trace!(from = %donor, to = %receiver, "borrowed key from right sibling");
    }

    /// Merge child `index + 1` and the separator `keys[index]` into child `index`
    ///
    /// The right child is released from the arena.
    fn merge_children(&mut self, parent: NodeId, index: usize) {
        let parent_node = &mut self.arena[parent];
        let separator = parent_node.keys.remove(index);
        let right = parent_node.children.remove(index + 1);
        let left = parent_node.child(index);

        let mut absorbed = self.arena.release(right);

        let left_node = &mut self.arena[left];
        left_node.keys.push(separator);
        left_node.keys.append(&mut absorbed.keys);
        left_node.children.append(&mut absorbed.children);

        trace!(node = %left, absorbed = %right, "merged siblings");
    }

    /// Verify every structural invariant after a mutation
    ///
    /// Walks the whole tree, so it only runs in this crate's tests or with
    /// the `debug-invariants` feature.
    fn debug_check(&self) {
        if cfg!(any(test, feature = "debug-invariants")) {
            if let Err(err) = self.check_invariants() {
                panic!("{}", err);
            }
        }
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
