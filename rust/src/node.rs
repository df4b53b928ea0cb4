//! Node implementation for BTree.
//!
//! Nodes only know how to rearrange their own keys and child handles. Every
//! capacity decision is taken by the tree, which passes in the minimum degree
//! and rewires `parent` handles of children that change owner.

use std::cmp::Ordering;

use crate::types::{Node, NodeId, NULL_NODE};

/// Upper bound on the slots reserved when a node is created; wider nodes grow on demand.
const PREALLOCATED_SLOTS: usize = 64;

/// Key capacity `2t - 1` of a node in a tree of minimum degree `min_degree`.
#[inline]
fn key_capacity(min_degree: usize) -> usize {
    min_degree.saturating_mul(2).saturating_sub(1)
}

impl<T> Node<T> {
    // ============================================================================
    // CONSTRUCTION
    // ============================================================================

    /// Creates an empty leaf sized for a tree of minimum degree `min_degree`.
    pub fn new_leaf(min_degree: usize) -> Self {
        Self {
            keys: Vec::with_capacity(key_capacity(min_degree).min(PREALLOCATED_SLOTS)),
            children: Vec::new(),
            leaf: true,
            parent: NULL_NODE,
        }
    }

    /// Creates an empty internal node sized for a tree of minimum degree `min_degree`.
    pub fn new_internal(min_degree: usize) -> Self {
        Self {
            keys: Vec::with_capacity(key_capacity(min_degree).min(PREALLOCATED_SLOTS)),
            children: Vec::with_capacity(
                min_degree.saturating_mul(2).min(PREALLOCATED_SLOTS + 1),
            ),
            leaf: false,
            parent: NULL_NODE,
        }
    }

    // ============================================================================
    // ACCESSORS
    // ============================================================================

    /// Keys stored in this node, in ascending order.
    pub fn keys(&self) -> &[T] {
        &self.keys
    }

    /// Child handles, empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Handle of the owning node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        (self.parent != NULL_NODE).then_some(self.parent)
    }

    /// Returns true if the node holds `2t - 1` keys and must split before taking another.
    pub fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() >= key_capacity(min_degree)
    }

    /// Returns true if losing a key would leave the node below `t - 1` keys.
    pub fn is_minimal(&self, min_degree: usize) -> bool {
        self.keys.len() < min_degree
    }

    /// Binary search under `compare`.
    ///
    /// `Ok(i)` when `keys[i]` equals `key`, otherwise `Err(i)` with `i` the
    /// index of the first key greater than `key` (the child to descend into).
    pub fn search_keys<C>(&self, key: &T, compare: &C) -> Result<usize, usize>
    where
        C: Fn(&T, &T) -> Ordering,
    {
        self.keys.binary_search_by(|stored| compare(stored, key))
    }

    // ============================================================================
    // LOCAL MUTATION PRIMITIVES
    // ============================================================================

    pub(crate) fn insert_key(&mut self, index: usize, key: T) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> T {
        self.keys.remove(index)
    }

    pub(crate) fn push_key(&mut self, key: T) {
        self.keys.push(key);
    }

    pub(crate) fn pop_key(&mut self) -> Option<T> {
        self.keys.pop()
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn pop_child(&mut self) -> Option<NodeId> {
        self.children.pop()
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: NodeId) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> NodeId {
        self.children.remove(index)
    }

    /// Replace the key at `index`, returning the previous one.
    pub(crate) fn replace_key(&mut self, index: usize, key: T) -> T {
        std::mem::replace(&mut self.keys[index], key)
    }

    // ============================================================================
    // SPLITTING
    // ============================================================================

    /// Split a full node in place.
    ///
    /// The node keeps keys `0..t-1` and children `0..t`; the returned sibling
    /// receives keys `t..2t-1` and children `t..2t`. The median key at `t - 1`
    /// is returned for promotion into the parent.
    pub(crate) fn split_upper(&mut self, min_degree: usize) -> Option<(T, Node<T>)> {
        if self.keys.len() < min_degree {
            return None;
        }

        let right_keys = self.keys.split_off(min_degree);
        let median = self.pop_key()?;
        let right_children = if self.leaf {
            Vec::new()
        } else {
            self.children.split_off(min_degree)
        };

        let right = Node {
            keys: right_keys,
            children: right_children,
            leaf: self.leaf,
            parent: self.parent,
        };
        Some((median, right))
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Detach the last key and, for internal nodes, the last child (this is the left sibling).
    pub(crate) fn borrow_last(&mut self) -> Option<(T, Option<NodeId>)> {
        let key = self.pop_key()?;
        let child = if self.leaf { None } else { self.pop_child() };
        Some((key, child))
    }

    /// Detach the first key and, for internal nodes, the first child (this is the right sibling).
    pub(crate) fn borrow_first(&mut self) -> Option<(T, Option<NodeId>)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = if self.leaf { None } else { Some(self.children.remove(0)) };
        Some((key, child))
    }

    /// Accept the parent's separator and a sibling's trailing child at the front.
    pub(crate) fn accept_from_left(&mut self, separator: T, moved_child: Option<NodeId>) {
        self.keys.insert(0, separator);
        if let Some(child) = moved_child {
            self.children.insert(0, child);
        }
    }

    /// Accept the parent's separator and a sibling's leading child at the back.
    pub(crate) fn accept_from_right(&mut self, separator: T, moved_child: Option<NodeId>) {
        self.push_key(separator);
        if let Some(child) = moved_child {
            self.push_child(child);
        }
    }

    /// Append the separator from the parent followed by all of `other`.
    pub(crate) fn merge_from(&mut self, separator: T, other: Node<T>) {
        self.push_key(separator);
        self.keys.extend(other.keys);
        self.children.extend(other.children);
    }
}

impl<T> Default for Node<T> {
    /// An empty leaf with no reserved capacity, used to fill vacated arena slots.
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            leaf: true,
            parent: NULL_NODE,
        }
    }
}
