//! Core types and data structures for BTree.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B-tree implementation.

use std::cmp::Ordering;

use crate::compact_arena::CompactArena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum degree a tree may be built with.
pub const MIN_DEGREE: usize = 2;

/// Largest minimum degree for which the `2t` child bound fits in `usize`.
pub const MAX_MIN_DEGREE: usize = usize::MAX / 2;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub use crate::compact_arena::{NodeId, NULL_NODE};

/// Comparator used by trees built over `T: Ord` without an explicit ordering.
pub type NaturalOrder<T> = fn(&T, &T) -> Ordering;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// B-tree of minimum degree `t` with an injected total order.
///
/// Every key lives in exactly one node; internal nodes hold keys as well as
/// child handles. Non-root nodes carry between `t - 1` and `2t - 1` keys and
/// every leaf sits at the same depth.
///
/// # Type Parameters
///
/// * `T` - Key type
/// * `C` - Comparator, `Fn(&T, &T) -> Ordering`; must be a stable total order
///
/// # Examples
///
/// ```
/// use btree::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// for key in [10, 20, 5, 15, 25] {
///     tree.insert(key);
/// }
///
/// assert!(tree.contains(&15));
/// assert!(!tree.insert(20));
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.inorder_traversal(), [&5, &10, &15, &20, &25]);
/// ```
///
/// # Performance Characteristics
///
/// - **Search**: O(t · log_t n) comparisons
/// - **Insertion**: O(t · log_t n), single pass, splits on the way down
/// - **Deletion**: O(t · log_t n), single pass, fixes children before entering them
/// - **Traversal**: O(n)
pub struct BTree<T, C = NaturalOrder<T>> {
    /// Minimum degree `t`; fixed at construction.
    pub(crate) min_degree: usize,
    /// Root handle, `None` while the tree is empty.
    pub(crate) root: Option<NodeId>,
    /// Number of stored keys.
    pub(crate) len: usize,
    /// Total order over keys.
    pub(crate) compare: C,
    /// Arena owning every node of the tree.
    pub(crate) arena: CompactArena<Node<T>>,
}

/// A single B-tree node.
///
/// Nodes own their keys; children are owned by position through the
/// `children` handle list. `parent` is navigational only.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Sorted keys, at most `2t - 1` of them.
    pub(crate) keys: Vec<T>,
    /// Child handles; `keys.len() + 1` of them for internal nodes, none for leaves.
    pub(crate) children: Vec<NodeId>,
    /// Whether this node is a leaf.
    pub(crate) leaf: bool,
    /// Handle of the owning node, `NULL_NODE` for the root.
    pub(crate) parent: NodeId,
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One step of a root-to-node descent: the node visited and the child index taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub index: usize,
}

/// Outcome of [`BTree::search`].
///
/// When `found` is true, `node`/`index` locate the key. Otherwise they name
/// the leaf and position where the key would be inserted (`node` is `None`
/// for an empty tree). `path` lists the ancestors descended through, root
/// first; it never includes the final node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub found: bool,
    pub node: Option<NodeId>,
    pub index: usize,
    pub path: Vec<PathStep>,
}

impl SearchResult {
    /// Depth of the located node, with the root at depth 0.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}
