//! B-tree implementation in Rust with an injectable key order.
//!
//! This crate provides an in-memory B-tree of configurable minimum degree
//! storing unique keys. Keys live in internal nodes as well as leaves, nodes
//! are owned by an arena and addressed by handle, and both insertion and
//! deletion run as single top-down passes that restore balance before
//! descending.
//!
//! # Examples
//!
//! ```
//! use btree::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//! assert!(tree.remove(&6));
//! assert!(!tree.contains(&6));
//! assert!(tree.validate().is_valid);
//!
//! let keys: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(keys, [5, 7, 10, 12, 17, 20, 30]);
//! ```
//!
//! A custom order is supplied as a closure:
//!
//! ```
//! use btree::BTree;
//!
//! let mut tree = BTree::with_comparator(2, |a: &i32, b: &i32| b.cmp(a)).unwrap();
//! tree.extend([1, 3, 2]);
//! assert_eq!(tree.first(), Some(&3));
//! ```

mod compact_arena;
mod error;
mod types;
mod construction;
mod node;
mod get_operations;
mod insert_operations;
mod delete_operations;
mod iteration;
mod validation;
mod tree_structure;

pub use compact_arena::{CompactArena, CompactArenaStats};
pub use construction::{validation as degree, DEFAULT_MIN_DEGREE};
pub use error::{
    BTreeError, BTreeResult, BTreeResultExt, InitResult, KeyResult, ModifyResult,
};
pub use iteration::Iter;
pub use tree_structure::TreeStats;
pub use types::{
    BTree, NaturalOrder, Node, NodeId, PathStep, SearchResult, MAX_MIN_DEGREE, MIN_DEGREE,
    NULL_NODE,
};
pub use validation::ValidationReport;
