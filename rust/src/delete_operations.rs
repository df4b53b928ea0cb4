//! DELETE operations for BTree.
//!
//! Deletion is a single top-down pass. Before the descent enters a child that
//! sits at the minimum of `t - 1` keys, the child is topped up by borrowing
//! from a sibling through the parent or by merging with a sibling. Because of
//! that, the node a key is finally removed from can always spare it.

use std::cmp::Ordering;

use crate::error::{BTreeError, BTreeResultExt, ModifyResult};
use crate::types::{BTree, NodeId, NULL_NODE};

impl<T, C> BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    // ============================================================================
    // PUBLIC DELETE OPERATIONS
    // ============================================================================

    /// Remove a key from the tree.
    ///
    /// # Returns
    ///
    /// `true` if the key was present and has been removed, `false` otherwise
    /// (the tree is left untouched in that case).
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.extend([10, 20, 5]);
    /// assert!(tree.remove(&10));
    /// assert!(!tree.remove(&10));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        self.take(key).is_some()
    }

    /// Remove a key, returning the stored key that compared equal to it.
    pub fn take(&mut self, key: &T) -> Option<T> {
        let root = self.root?;
        if !self.contains(key) {
            return None;
        }

        let removed = self.remove_from(root, key);
        self.collapse_root_if_needed();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Remove with validation before and after.
    ///
    /// Reports an absent key as `BTreeError::KeyNotFound`.
    pub fn try_remove(&mut self, key: &T) -> ModifyResult<T> {
        self.check_integrity("before remove")?;

        let removed = self.take(key).ok_or(BTreeError::KeyNotFound)?;

        self.check_integrity("after remove")
            .with_operation("try_remove")?;

        Ok(removed)
    }

    /// Remove and return the smallest key.
    pub fn pop_first(&mut self) -> Option<T> {
        let root = self.root?;
        let removed = self.remove_min(root);
        self.collapse_root_if_needed();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Remove and return the largest key.
    pub fn pop_last(&mut self) -> Option<T> {
        let root = self.root?;
        let removed = self.remove_max(root);
        self.collapse_root_if_needed();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Remove `key` from the subtree rooted at `node_id`.
    ///
    /// `node_id` is either the root or holds at least `t` keys.
    fn remove_from(&mut self, node_id: NodeId, key: &T) -> Option<T> {
        let is_leaf = self.arena[node_id].leaf;
        match self.arena[node_id].search_keys(key, &self.compare) {
            Ok(index) if is_leaf => Some(self.arena[node_id].remove_key(index)),
            Ok(index) => self.remove_internal_key(node_id, index, key),
            Err(_) if is_leaf => None,
            Err(index) => {
                let child = self.ensure_child_non_minimal(node_id, index);
                self.remove_from(child, key)
            }
        }
    }

    /// Remove the key at `index` of the internal node `node_id`.
    fn remove_internal_key(&mut self, node_id: NodeId, index: usize, key: &T) -> Option<T> {
        let left = self.arena[node_id].children[index];
        let right = self.arena[node_id].children[index + 1];

        if !self.arena[left].is_minimal(self.min_degree) {
            let predecessor = self.remove_max(left)?;
            Some(self.arena[node_id].replace_key(index, predecessor))
        } else if !self.arena[right].is_minimal(self.min_degree) {
            let successor = self.remove_min(right)?;
            Some(self.arena[node_id].replace_key(index, successor))
        } else {
            let merged = self.merge_children(node_id, index);
            self.remove_from(merged, key)
        }
    }

    /// Remove the largest key of the subtree rooted at `node_id`.
    fn remove_max(&mut self, mut node_id: NodeId) -> Option<T> {
        loop {
            if self.arena[node_id].leaf {
                return self.arena[node_id].pop_key();
            }
            let last = self.arena[node_id].children.len() - 1;
            node_id = self.ensure_child_non_minimal(node_id, last);
        }
    }

    /// Remove the smallest key of the subtree rooted at `node_id`.
    fn remove_min(&mut self, mut node_id: NodeId) -> Option<T> {
        loop {
            let node = &mut self.arena[node_id];
            if node.leaf {
                return (!node.keys.is_empty()).then(|| node.remove_key(0));
            }
            node_id = self.ensure_child_non_minimal(node_id, 0);
        }
    }
}

impl<T, C> BTree<T, C> {
    /// Make sure the child at `index` of `parent` can lose a key, returning
    /// the handle of the node that now covers that child's key range.
    ///
    /// Tries, in order: borrow from the left sibling, borrow from the right
    /// sibling, merge with the right sibling, merge with the left sibling.
    fn ensure_child_non_minimal(&mut self, parent: NodeId, index: usize) -> NodeId {
        let t = self.min_degree;
        let parent_node = &self.arena[parent];
        let child = parent_node.children[index];
        if !self.arena[child].is_minimal(t) {
            return child;
        }

        let left = index.checked_sub(1).map(|i| parent_node.children[i]);
        let right = parent_node.children.get(index + 1).copied();

        match (left, right) {
            (Some(left), _) if !self.arena[left].is_minimal(t) => {
                self.borrow_from_left(parent, index);
                child
            }
            (_, Some(right)) if !self.arena[right].is_minimal(t) => {
                self.borrow_from_right(parent, index);
                child
            }
            (_, Some(_)) => self.merge_children(parent, index),
            _ => {
                // An internal node always has at least two children.
                debug_assert!(left.is_some(), "node {parent} has a single child");
                self.merge_children(parent, index - 1)
            }
        }
    }

    /// Rotate the left sibling's last key up through the parent into the child at `index`.
    fn borrow_from_left(&mut self, parent: NodeId, index: usize) {
        let child = self.arena[parent].children[index];
        let left = self.arena[parent].children[index - 1];
        let Some((moved_key, moved_child)) = self.arena[left].borrow_last() else {
            return;
        };

        let separator = self.arena[parent].replace_key(index - 1, moved_key);
        self.arena[child].accept_from_left(separator, moved_child);
        if let Some(grandchild) = moved_child {
            self.set_parent(grandchild, child);
        }
        tracing::debug!(parent, from = left, to = child, "borrowed from left sibling");
    }

    /// Rotate the right sibling's first key up through the parent into the child at `index`.
    fn borrow_from_right(&mut self, parent: NodeId, index: usize) {
        let child = self.arena[parent].children[index];
        let right = self.arena[parent].children[index + 1];
        let Some((moved_key, moved_child)) = self.arena[right].borrow_first() else {
            return;
        };

        let separator = self.arena[parent].replace_key(index, moved_key);
        self.arena[child].accept_from_right(separator, moved_child);
        if let Some(grandchild) = moved_child {
            self.set_parent(grandchild, child);
        }
        tracing::debug!(parent, from = right, to = child, "borrowed from right sibling");
    }

    /// Merge the children at `index` and `index + 1` of `parent` around the
    /// separating key. The right child is released; the left one is returned.
    fn merge_children(&mut self, parent: NodeId, index: usize) -> NodeId {
        let left = self.arena[parent].children[index];
        let separator = self.arena[parent].remove_key(index);
        let right = self.arena[parent].remove_child(index + 1);

        let right_node = self.deallocate_node(right);
        self.arena[left].merge_from(separator, right_node);
        self.adopt_children(left);
        tracing::debug!(parent, left, right, "merged siblings");
        left
    }

    /// Drop a root left without keys: promote its only child, or empty the tree.
    fn collapse_root_if_needed(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let node = &self.arena[root];
        if !node.keys.is_empty() {
            return;
        }

        let promoted = node.children.first().copied();
        self.deallocate_node(root);
        match promoted {
            Some(child) => {
                self.set_parent(child, NULL_NODE);
                self.root = Some(child);
                tracing::debug!(old_root = root, new_root = child, "root collapsed");
            }
            None => {
                self.root = None;
                tracing::debug!(old_root = root, "tree emptied");
            }
        }
    }

    /// Remove every key, releasing all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(min_degree: usize, keys: impl IntoIterator<Item = i32>) -> BTree<i32> {
        let mut tree = BTree::new(min_degree).unwrap();
        tree.extend(keys);
        tree
    }

    fn assert_valid(tree: &BTree<i32>) {
        let report = tree.validate();
        assert!(report.is_valid, "violations: {:?}", report.violations);
    }

    #[test]
    fn test_remove_from_leaf_root() {
        let mut tree = tree_with(3, [3, 1, 2]);
        assert!(tree.remove(&2));
        assert_eq!(tree.inorder_traversal(), [&1, &3]);
        assert_valid(&tree);
    }

    #[test]
    fn test_remove_absent_key_leaves_structure_alone() {
        let mut tree = tree_with(2, 0..30);
        let stats_before = tree.stats();
        assert!(!tree.remove(&100));
        assert_eq!(tree.stats(), stats_before);
        assert_eq!(tree.len(), 30);
    }

    #[test]
    fn test_remove_last_key_empties_tree() {
        let mut tree = tree_with(2, [7]);
        assert!(tree.remove(&7));
        assert!(tree.is_empty());
        assert!(tree.root.is_none());
        assert_eq!(tree.allocated_node_count(), 0);
        assert!(!tree.remove(&7));
    }

    #[test]
    fn test_internal_key_replaced_by_successor() {
        // t = 2: root [2] over [1] and [3, 4]; left child is minimal,
        // right child can spare a key, so the successor 3 replaces 2.
        let mut tree = tree_with(2, [1, 2, 3, 4]);
        assert!(tree.remove(&2));
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert_eq!(root.keys(), &[3]);
        assert_valid(&tree);

        // Now left [1] and right [4] are both minimal: merge and collapse.
        assert!(tree.remove(&3));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.inorder_traversal(), [&1, &4]);
        assert_valid(&tree);
    }

    #[test]
    fn test_predecessor_used_when_left_child_can_spare() {
        let mut tree = tree_with(2, [10, 20, 30, 5, 6]);
        // root [20] over [5, 6, 10] and [30]
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert_eq!(root.keys(), &[20]);
        assert!(tree.remove(&20));
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert_eq!(root.keys(), &[10]);
        assert_valid(&tree);
    }

    #[test]
    fn test_borrow_and_merge_during_descent() {
        let mut tree = tree_with(2, 1..=64);
        for key in (1..=64).step_by(3) {
            assert!(tree.remove(&key), "key {key} should be removable");
            assert_valid(&tree);
        }
        for key in (1..=64).rev() {
            tree.remove(&key);
            assert_valid(&tree);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.allocated_node_count(), 0);
    }

    #[test]
    fn test_pop_first_and_last() {
        let mut tree = tree_with(3, 0..100);
        assert_eq!(tree.pop_first(), Some(0));
        assert_eq!(tree.pop_last(), Some(99));
        assert_eq!(tree.len(), 98);
        assert_valid(&tree);

        let mut drained = Vec::new();
        while let Some(key) = tree.pop_first() {
            drained.push(key);
        }
        assert_eq!(drained, (1..99).collect::<Vec<_>>());
        assert!(tree.is_empty());
        assert_eq!(tree.pop_last(), None);
    }

    #[test]
    fn test_try_remove() {
        let mut tree = tree_with(2, [1, 2, 3]);
        assert_eq!(tree.try_remove(&2), Ok(2));
        assert_eq!(tree.try_remove(&2), Err(BTreeError::KeyNotFound));
    }

    #[test]
    fn test_try_remove_reports_stale_root_as_arena_error() {
        let mut tree = tree_with(2, 0..10);
        let real_root = tree.root;
        tree.root = Some(4242);
        assert!(matches!(tree.try_remove(&3), Err(BTreeError::ArenaError(_))));

        tree.root = real_root;
        assert_eq!(tree.try_remove(&3), Ok(3));
        assert_valid(&tree);
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_with(2, 0..50);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.insert(1));
        assert_valid(&tree);
    }
}
