//! B-tree implementation.
//!
//! This module provides an in-memory B-tree of configurable minimum degree that supports:
//! - Insertions with preemptive node splitting
//! - Deletions with sibling borrowing and node merging
//! - Pre-order structural rendering and export
//! - In-order key iteration

mod check;
mod cursor;
mod render;
mod tree;

pub use cursor::Keys;
pub use render::{Render, TreeNode};
pub use tree::BTree;
