//! Iterator implementations for BTree.
//!
//! Keys are visited in order by an explicit stack of `(node, next key index)`
//! frames, so no recursion and no parent-link chasing is involved.

use std::iter::FusedIterator;

use crate::compact_arena::CompactArena;
use crate::types::{BTree, Node, NodeId};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over the keys of a [`BTree`].
pub struct Iter<'a, T> {
    arena: &'a CompactArena<Node<T>>,
    /// Each frame is a node and the index of the next key to yield from it.
    /// The child left of that key has already been fully visited.
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

// ============================================================================
// BTREE ITERATOR METHODS
// ============================================================================

impl<T, C> BTree<T, C> {
    /// Returns an iterator over all keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let tree: BTree<i32> = [3, 1, 2].into_iter().collect();
    /// let keys: Vec<_> = tree.iter().copied().collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Collect references to every key in ascending order.
    pub fn inorder_traversal(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<'a, T, C> IntoIterator for &'a BTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// ITERATOR IMPLEMENTATIONS
// ============================================================================

impl<'a, T> Iter<'a, T> {
    fn new<C>(tree: &'a BTree<T, C>) -> Self {
        let mut iter = Self {
            arena: &tree.arena,
            stack: Vec::new(),
            remaining: tree.len,
        };
        if let Some(root) = tree.root {
            iter.descend_leftmost(root);
        }
        iter
    }

    /// Push `id` and every leftmost descendant down to a leaf.
    fn descend_leftmost(&mut self, mut id: NodeId) {
        let arena = self.arena;
        loop {
            self.stack.push((id, 0));
            let node = &arena[id];
            match node.children.first() {
                Some(&child) if !node.leaf => id = child,
                _ => return,
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let (id, index) = *self.stack.last()?;
            let node = &arena[id];
            if index < node.keys.len() {
                if let Some(frame) = self.stack.last_mut() {
                    frame.1 = index + 1;
                }
                if !node.leaf {
                    self.descend_leftmost(node.children[index + 1]);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some(&node.keys[index]);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
