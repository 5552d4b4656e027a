//! # Degree B-Tree
//!
//! An in-memory B-tree of configurable minimum degree `t`, with the node
//! splitting and merging that keep it balanced under insertion and deletion.
//!
//! ## Architecture
//!
//! - **Types** (`types`): node handles and the degree configuration
//! - **Node** (`node`): ordered keys plus child handles
//! - **Storage** (`storage`): arena that owns every node, with slot reuse
//! - **B-Tree** (`btree`): insert, delete, rendering and iteration
//!
//! ## Usage
//!
//! ```rust
//! use degree_btree::BTree;
//!
//! let mut tree = BTree::new(2)?;
//! tree.extend([10, 20, 5, 6, 12, 30, 7, 17]);
//!
//! // Structural display
//! print!("{}", tree);
//!
//! // Insert and delete single keys
//! assert!(tree.insert(8));
//! assert!(tree.delete(&10));
//! assert!(!tree.delete(&10));
//!
//! // Pre-order walk for custom display
//! for (depth, keys) in tree.render() {
//!     println!("{}{:?}", "  ".repeat(depth), keys);
//! }
//! # Ok::<(), degree_btree::BTreeError>(())
//! ```

pub mod btree;
pub mod error;
pub mod node;
pub mod storage;
pub mod types;

pub use error::{BTreeError, Result};
pub use types::{BTreeConfig, NodeId, DEFAULT_DEGREE, MAX_DEGREE, MIN_DEGREE};

// Re-export main public API
pub use btree::{BTree, Keys, Render, TreeNode};
