//! Tree node layout.
//!
//! A node is an ordered run of keys plus, for internal nodes, one child
//! handle per gap between keys. A node with no children is a leaf.

use crate::types::NodeId;

/// A B-tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    /// Keys in strictly ascending order
    pub(crate) keys: Vec<K>,
    /// Child handles; empty for leaves, `keys.len() + 1` entries otherwise
    pub(crate) children: Vec<NodeId>,
}

impl<K> Node<K> {
    /// Create an empty leaf
    pub fn new_leaf() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an internal node with no keys and a single child
    pub fn new_internal(child: NodeId) -> Self {
        Self {
            keys: Vec::new(),
            children: vec![child],
        }
    }

    /// Create a node from its parts
    pub fn with_parts(keys: Vec<K>, children: Vec<NodeId>) -> Self {
        Self { keys, children }
    }

    /// Keys stored in this node
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child handles (empty for a leaf)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of keys in this node
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether this node holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether this node holds `max_keys` keys or more
    pub fn is_full(&self, max_keys: usize) -> bool {
        self.keys.len() >= max_keys
    }

    /// Child handle at `index`
    ///
    /// Panics if this is a leaf or the index is out of bounds.
    pub fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }
}

impl<K: Ord> Node<K> {
    /// Index of the first key not less than `key`
    pub fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// Index of the first key greater than `key`, which is also the index
    /// of the child whose range holds `key`
    pub fn upper_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }
}
