//! INSERT operations for BTree.
//!
//! Insertion is a single top-down pass: a full root is split before the
//! descent starts and every full child is split before it is entered, so the
//! leaf that finally receives the key always has room.

use std::cmp::Ordering;

use crate::error::{BTreeError, BTreeResultExt, ModifyResult};
use crate::types::{BTree, Node, NodeId, NaturalOrder};

impl<T, C> BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Insert a key.
    ///
    /// # Returns
    ///
    /// `true` if the key was added, `false` if an equal key is already stored
    /// (the tree is left untouched in that case).
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// assert!(tree.insert(5));
    /// assert!(!tree.insert(5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let Some(root) = self.root else {
            self.bootstrap_root(key);
            return true;
        };

        if self.contains(&key) {
            return false;
        }

        let root = if self.arena[root].is_full(self.min_degree) {
            self.grow_root(root)
        } else {
            root
        };

        self.insert_non_full(root, key);
        self.len += 1;
        true
    }

    /// Insert, validating the tree before and after.
    ///
    /// Reports a present key as `BTreeError::DuplicateKey`.
    pub fn try_insert(&mut self, key: T) -> ModifyResult<()> {
        self.check_integrity("before insert")?;

        if !self.insert(key) {
            return Err(BTreeError::DuplicateKey);
        }

        self.check_integrity("after insert")
            .with_operation("try_insert")
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Empty tree: the key becomes a single-leaf root.
    fn bootstrap_root(&mut self, key: T) {
        let mut leaf = Node::new_leaf(self.min_degree);
        leaf.push_key(key);
        let id = self.allocate_node(leaf);
        self.root = Some(id);
        self.len = 1;
        tracing::debug!(root = id, "bootstrapped root leaf");
    }

    /// Hang the full root under a fresh root and split it, returning the new root.
    fn grow_root(&mut self, old_root: NodeId) -> NodeId {
        let mut new_root = Node::new_internal(self.min_degree);
        new_root.push_child(old_root);
        let new_root_id = self.allocate_node(new_root);
        self.set_parent(old_root, new_root_id);
        self.root = Some(new_root_id);

        self.split_child(new_root_id, 0);
        tracing::debug!(old_root, new_root = new_root_id, "tree grew a level");
        new_root_id
    }

    /// Split the full child at `index` of `parent`.
    ///
    /// The median moves up into `parent` at `index`; the upper half becomes a
    /// new sibling at `index + 1`.
    pub(crate) fn split_child(&mut self, parent: NodeId, index: usize) {
        let child = self.arena[parent].children[index];
        let Some((median, mut right)) = self.arena[child].split_upper(self.min_degree) else {
            return;
        };
        right.parent = parent;
        let right_id = self.allocate_node(right);
        self.adopt_children(right_id);

        let parent_node = &mut self.arena[parent];
        parent_node.insert_key(index, median);
        parent_node.insert_child(index + 1, right_id);
        tracing::debug!(parent, left = child, right = right_id, "split child");
    }

    /// Descend from a non-full node, splitting full children ahead of the descent.
    ///
    /// `key` must be absent from the tree.
    fn insert_non_full(&mut self, mut current: NodeId, key: T) {
        loop {
            let search = self.arena[current].search_keys(&key, &self.compare);
            debug_assert!(search.is_err(), "insert_non_full reached a stored key");
            let index = search.unwrap_or_else(|index| index);

            if self.arena[current].leaf {
                self.arena[current].insert_key(index, key);
                return;
            }

            let mut child_index = index;
            let child = self.arena[current].children[index];
            if self.arena[child].is_full(self.min_degree) {
                self.split_child(current, index);
                let side = (self.compare)(&key, &self.arena[current].keys[index]);
                debug_assert_ne!(side, Ordering::Equal, "promoted median equals an absent key");
                if side == Ordering::Greater {
                    child_index += 1;
                }
            }
            current = self.arena[current].children[child_index];
        }
    }
}

impl<T, C> Extend<T> for BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for BTree<T, NaturalOrder<T>> {
    /// Collect into a tree of the default minimum degree, dropping duplicates.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BTree::with_default_degree();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_bootstraps_leaf_root() {
        let mut tree = BTree::new(3).unwrap();
        assert!(tree.insert(10));
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.keys(), &[10]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let mut tree = BTree::new(2).unwrap();
        for key in [1, 2, 3] {
            tree.insert(key);
        }
        let nodes_before = tree.allocated_node_count();
        // Root is full, a duplicate must not split it.
        assert!(!tree.insert(2));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.allocated_node_count(), nodes_before);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_root_split_on_overflow() {
        let mut tree = BTree::new(2).unwrap();
        for key in [1, 2, 3, 4] {
            tree.insert(key);
        }
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert_eq!(root.keys(), &[2]);
        assert_eq!(root.child_count(), 2);
        let left = tree.node(root.children()[0]).unwrap();
        let right = tree.node(root.children()[1]).unwrap();
        assert_eq!(left.keys(), &[1]);
        assert_eq!(right.keys(), &[3, 4]);
        assert_eq!(left.parent(), tree.root);
        assert_eq!(right.parent(), tree.root);
    }

    #[test]
    fn test_descent_picks_side_of_promoted_median() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend([10, 20, 30]);
        // Root is full: 25 forces a split around 20 and lands on the right.
        assert!(tree.insert(25));
        assert!(tree.insert(15));
        let root = tree.node(tree.root.unwrap()).unwrap();
        assert_eq!(root.keys(), &[20]);
        assert_eq!(tree.node(root.children()[0]).unwrap().keys(), &[10, 15]);
        assert_eq!(tree.node(root.children()[1]).unwrap().keys(), &[25, 30]);
        // The promoted median itself is a duplicate, caught before any split.
        assert!(!tree.insert(20));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_split_keeps_parent_links() {
        let mut tree = BTree::new(2).unwrap();
        for key in 0..200 {
            tree.insert(key);
        }
        assert!(tree.validate().is_valid, "{:?}", tree.validate().violations);
    }

    #[test]
    fn test_try_insert_reports_duplicate() {
        let mut tree = BTree::new(3).unwrap();
        assert_eq!(tree.try_insert(1), Ok(()));
        assert_eq!(tree.try_insert(1), Err(BTreeError::DuplicateKey));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_try_insert_reports_stale_root_as_arena_error() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend([1, 2, 3]);
        let real_root = tree.root;
        tree.root = Some(999);

        let err = tree.try_insert(4).unwrap_err();
        assert!(matches!(err, BTreeError::ArenaError(ref msg) if msg.contains("node 999")), "{err}");

        tree.root = real_root;
        assert_eq!(tree.try_insert(4), Ok(()));
    }

    #[test]
    fn test_try_insert_reports_broken_invariant_as_integrity_error() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend([1, 2, 3]);
        tree.len = 7;
        assert!(matches!(tree.try_insert(4), Err(BTreeError::DataIntegrityError(_))));
    }

    #[test]
    fn test_from_iterator_and_extend() {
        let mut tree: BTree<i32> = [5, 3, 5, 1].into_iter().collect();
        assert_eq!(tree.len(), 3);
        tree.extend([2, 4, 3]);
        assert_eq!(tree.inorder_traversal(), [&1, &2, &3, &4, &5]);
    }
}
