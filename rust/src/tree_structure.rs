//! Tree structure management operations for BTree.
//!
//! This module contains size and shape queries: length, height, node
//! counts and the statistics pass over every node.

use std::collections::BTreeMap;

use crate::types::{BTree, NodeId};

/// Shape summary produced by [`BTree::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Number of stored keys.
    pub size: usize,
    pub node_count: usize,
    pub leaf_count: usize,
    pub internal_count: usize,
    /// Number of levels; 0 for an empty tree, 1 for a lone leaf root.
    pub height: usize,
    pub min_degree: usize,
    /// Key count per node mapped to how many nodes hold exactly that many keys.
    pub key_distribution: BTreeMap<usize, usize>,
}

impl TreeStats {
    /// Average share of the `2t - 1` key slots in use, over all nodes.
    pub fn fill_factor(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        let slots = self.node_count as f64 * (2.0 * self.min_degree as f64 - 1.0);
        self.size as f64 / slots
    }
}

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<T, C> BTree<T, C> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Handle of the root node, `None` while the tree is empty.
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the number of levels in the tree.
    ///
    /// All leaves share one depth, so following the leftmost path suffices.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            let node = &self.arena[id];
            current = if node.leaf { None } else { node.children.first().copied() };
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the leaf and internal nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.root
            .map_or((0, 0), |root| self.count_nodes_recursive(root))
    }

    fn count_nodes_recursive(&self, id: NodeId) -> (usize, usize) {
        let node = &self.arena[id];
        if node.leaf {
            return (1, 0);
        }
        node.children
            .iter()
            .map(|&child| self.count_nodes_recursive(child))
            .fold((0, 1), |(leaves, internals), (l, i)| (leaves + l, internals + i))
    }

    /// Compute node counts, height and the key-count distribution.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(2).unwrap();
    /// tree.extend([1, 2, 3, 4]);
    /// let stats = tree.stats();
    /// assert_eq!(stats.height, 2);
    /// assert_eq!(stats.node_count, 3);
    /// assert_eq!(stats.leaf_count, 2);
    /// assert_eq!(stats.key_distribution.get(&1), Some(&2));
    /// ```
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            size: self.len,
            height: self.height(),
            min_degree: self.min_degree,
            ..TreeStats::default()
        };

        let mut pending: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = pending.pop() {
            let node = &self.arena[id];
            stats.node_count += 1;
            if node.leaf {
                stats.leaf_count += 1;
            } else {
                stats.internal_count += 1;
                pending.extend(node.children.iter().copied());
            }
            *stats.key_distribution.entry(node.keys.len()).or_insert(0) += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_shape() {
        let tree = BTree::<i32>::new(3).unwrap();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.count_nodes_in_tree(), (0, 0));
        let stats = tree.stats();
        assert_eq!(stats.node_count, 0);
        assert!(stats.key_distribution.is_empty());
        assert_eq!(stats.fill_factor(), 0.0);
    }

    #[test]
    fn test_stats_agree_with_counts() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend(0..500);
        let stats = tree.stats();
        let (leaves, internals) = tree.count_nodes_in_tree();

        assert_eq!(stats.size, 500);
        assert_eq!(stats.leaf_count, leaves);
        assert_eq!(stats.internal_count, internals);
        assert_eq!(stats.node_count, leaves + internals);
        assert_eq!(stats.node_count, tree.allocated_node_count());
        assert_eq!(stats.height, tree.height());
        assert_eq!(tree.leaf_count(), leaves);

        let keys_in_nodes: usize = stats.key_distribution.iter().map(|(k, n)| k * n).sum();
        assert_eq!(keys_in_nodes, 500);
        let nodes_in_distribution: usize = stats.key_distribution.values().sum();
        assert_eq!(nodes_in_distribution, stats.node_count);
        assert!(stats.key_distribution.keys().all(|&k| (1..=5).contains(&k)));
        assert!(stats.fill_factor() > 0.0 && stats.fill_factor() <= 1.0);
    }

    #[test]
    fn test_height_grows_logarithmically() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend(0..1000);
        // Every non-root node has at least 2 children.
        let bound = 1 + (1000f64).log2().ceil() as usize;
        assert!(tree.height() <= bound, "height {} > {}", tree.height(), bound);
    }
}
