//! Structural views of a tree for display.
//!
//! - `Render`: lazy pre-order walk yielding `(depth, keys)` per node
//! - `Display`: one `[ k1 k2 ]` line per node, indented two spaces per level
//! - `TreeNode`: nested snapshot for serialization

use super::BTree;
use crate::error::Result;
use crate::storage::NodeArena;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pre-order walk over the nodes of a tree
///
/// Yields each node's depth (root is 0) and its keys. The walk only reads
/// the tree, so a fresh `render()` call always starts over.
pub struct Render<'a, K> {
    arena: &'a NodeArena<K>,
    /// Nodes still to visit, next one on top
    stack: Vec<(NodeId, usize)>,
}

impl<'a, K> Iterator for Render<'a, K> {
    type Item = (usize, &'a [K]);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let arena: &'a NodeArena<K> = self.arena;
        let node = &arena[id];

        self.stack
            .extend(node.children().iter().rev().map(|&child| (child, depth + 1)));

        Some((depth, node.keys()))
    }
}

/// Node type for visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<K> {
    /// Whether this is a leaf node
    pub is_leaf: bool,
    /// Keys in this node
    pub keys: Vec<K>,
    /// Child nodes (only for interior nodes)
    pub children: Vec<TreeNode<K>>,
}

impl<K: Serialize> TreeNode<K> {
    /// Pretty-printed JSON form of the snapshot
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<K> BTree<K> {
    /// Walk the nodes in pre-order for display
    pub fn render(&self) -> Render<'_, K> {
        Render {
            arena: &self.arena,
            stack: vec![(self.root, 0)],
        }
    }
}

impl<K: Clone> BTree<K> {
    /// Export the tree structure for visualization
    pub fn export(&self) -> TreeNode<K> {
        self.export_node(self.root)
    }

    fn export_node(&self, id: NodeId) -> TreeNode<K> {
        let node = &self.arena[id];
        TreeNode {
            is_leaf: node.is_leaf(),
            keys: node.keys().to_vec(),
            children: node
                .children()
                .iter()
                .map(|&child| self.export_node(child))
                .collect(),
        }
    }
}

impl<K: fmt::Display> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, keys) in self.render() {
            write!(f, "{:indent$}[ ", "", indent = depth * 2)?;
            for key in keys {
                write!(f, "{} ", key)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_btree() -> BTree<i32> {
        BTree::from_keys(2, [10, 20, 5, 6, 12, 30, 7, 17]).unwrap()
    }

    #[test]
    fn test_render_preorder() {
        let tree = create_test_btree();
        let lines: Vec<(usize, Vec<i32>)> = tree
            .render()
            .map(|(depth, keys)| (depth, keys.to_vec()))
            .collect();

        assert_eq!(
            lines,
            vec![
                (0, vec![10, 20]),
                (1, vec![5, 6, 7]),
                (1, vec![12, 17]),
                (1, vec![30]),
            ]
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let tree = BTree::from_keys(3, 0..200).unwrap();
        let first: Vec<_> = tree.render().collect();
        let second: Vec<_> = tree.render().collect();
        assert_eq!(first, second);
        assert_eq!(tree.to_string(), tree.to_string());
    }

    #[test]
    fn test_render_depths_follow_height() {
        let tree = BTree::from_keys(2, 0..100).unwrap();
        let max_depth = tree.render().map(|(depth, _)| depth).max().unwrap();
        assert_eq!(max_depth + 1, tree.height());
        assert_eq!(tree.render().count(), tree.node_count());
    }

    #[test]
    fn test_display_format() {
        let tree = create_test_btree();
        assert_eq!(
            tree.to_string(),
            "[ 10 20 ]\n  [ 5 6 7 ]\n  [ 12 17 ]\n  [ 30 ]\n"
        );

        let empty: BTree<i32> = BTree::new(3).unwrap();
        assert_eq!(empty.to_string(), "[ ]\n");
    }

    #[test]
    fn test_display_nested_indent() {
        let tree = BTree::from_keys(2, 1..=10).unwrap();
        let text = tree.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("[ 4 ]"));
        assert!(text.lines().any(|line| line.starts_with("    [ ")));
    }

    #[test]
    fn test_export_tree() {
        let tree = create_test_btree();
        let root = tree.export();

        assert!(!root.is_leaf);
        assert_eq!(root.keys, vec![10, 20]);
        assert_eq!(root.children.len(), 3);
        assert!(root.children.iter().all(|child| child.is_leaf));
        assert_eq!(root.children[1].keys, vec![12, 17]);
    }

    #[test]
    fn test_export_json() {
        let tree = BTree::from_keys(2, [1, 2, 3, 4]).unwrap();
        let json = tree.export().to_json_pretty().unwrap();
        assert!(json.contains("\"isLeaf\": false"));

        let back: TreeNode<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree.export());
    }
}
