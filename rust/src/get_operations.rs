//! GET operations for BTree.
//!
//! This module contains the read operations: point search with descent path,
//! membership, key retrieval and the extreme keys.

use std::cmp::Ordering;

use crate::error::{BTreeError, KeyResult};
use crate::types::{BTree, NodeId, PathStep, SearchResult};

impl<T, C> BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Locate `key`, recording the descent path.
    ///
    /// # Returns
    ///
    /// A [`SearchResult`] whose `found` flag tells whether the key is stored.
    /// On a hit, `node`/`index` address the key; on a miss they address the
    /// leaf slot the key would be inserted at.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// for key in 1..=10 {
    ///     tree.insert(key);
    /// }
    ///
    /// let hit = tree.search(&7);
    /// assert!(hit.found);
    /// let node = tree.node(hit.node.unwrap()).unwrap();
    /// assert_eq!(node.keys()[hit.index], 7);
    ///
    /// let miss = tree.search(&42);
    /// assert!(!miss.found);
    /// assert_eq!(miss.path.len() + 1, tree.height());
    /// ```
    pub fn search(&self, key: &T) -> SearchResult {
        let mut path = Vec::new();
        let Some(mut current) = self.root else {
            return SearchResult {
                found: false,
                node: None,
                index: 0,
                path,
            };
        };

        loop {
            let node = &self.arena[current];
            match node.search_keys(key, &self.compare) {
                Ok(index) => {
                    tracing::trace!(node = current, index, depth = path.len(), "search hit");
                    return SearchResult {
                        found: true,
                        node: Some(current),
                        index,
                        path,
                    };
                }
                Err(index) if node.leaf => {
                    tracing::trace!(node = current, index, depth = path.len(), "search miss");
                    return SearchResult {
                        found: false,
                        node: Some(current),
                        index,
                        path,
                    };
                }
                Err(index) => {
                    path.push(PathStep {
                        node: current,
                        index,
                    });
                    current = node.children[index];
                }
            }
        }
    }

    /// Check if key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.insert(1);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&2));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        self.locate(key).is_some()
    }

    /// Get the stored key that compares equal to `key`.
    ///
    /// Useful when the comparator looks only at part of `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let by_id = |a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0);
    /// let mut tree = BTree::with_comparator(2, by_id).unwrap();
    /// tree.insert((7, 'x'));
    /// assert_eq!(tree.get(&(7, ' ')), Some(&(7, 'x')));
    /// ```
    pub fn get(&self, key: &T) -> Option<&T> {
        self.locate(key)
            .map(|(node, index)| &self.arena[node].keys[index])
    }

    /// Get the stored key, returning an error if it doesn't exist.
    ///
    /// Descends with checked arena lookups, so a dangling handle on the
    /// path is reported as `BTreeError::ArenaError` instead of panicking.
    pub fn try_get(&self, key: &T) -> KeyResult<&T> {
        let mut current = self.root.ok_or(BTreeError::KeyNotFound)?;
        loop {
            let node = self.checked_node(current, "try_get")?;
            match node.search_keys(key, &self.compare) {
                Ok(index) => return Ok(&node.keys[index]),
                Err(_) if node.leaf => return Err(BTreeError::KeyNotFound),
                Err(index) => current = node.children[index],
            }
        }
    }

    // ============================================================================
    // HELPERS FOR GET OPERATIONS
    // ============================================================================

    /// Walk from the root without recording a path.
    fn locate(&self, key: &T) -> Option<(NodeId, usize)> {
        let mut current = self.root?;
        loop {
            let node = &self.arena[current];
            match node.search_keys(key, &self.compare) {
                Ok(index) => return Some((current, index)),
                Err(_) if node.leaf => return None,
                Err(index) => current = node.children[index],
            }
        }
    }
}

impl<T, C> BTree<T, C> {
    /// Returns the smallest key in the tree.
    pub fn first(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            let node = &self.arena[current];
            if node.leaf {
                return node.keys.first();
            }
            current = node.children[0];
        }
    }

    /// Returns the largest key in the tree.
    pub fn last(&self) -> Option<&T> {
        let mut current = self.root?;
        loop {
            let node = &self.arena[current];
            match node.children.last() {
                Some(&child) if !node.leaf => current = child,
                _ => return node.keys.last(),
            }
        }
    }
}
