//! Construction and initialization logic for BTree.
//!
//! This module contains minimum-degree validation, comparator injection and
//! the default constructors.

use std::cmp::Ordering;
use std::fmt;

use crate::compact_arena::CompactArena;
use crate::error::{BTreeError, InitResult};
use crate::types::{BTree, NaturalOrder, MAX_MIN_DEGREE, MIN_DEGREE};

/// Default minimum degree for trees built without an explicit one.
pub const DEFAULT_MIN_DEGREE: usize = 6;

impl<T: Ord> BTree<T> {
    /// Create a B-tree of minimum degree `min_degree` ordered by `T: Ord`.
    ///
    /// # Arguments
    ///
    /// * `min_degree` - Minimum degree `t`; nodes hold `t - 1 ..= 2t - 1` keys (minimum 2)
    ///
    /// # Returns
    ///
    /// Returns `Ok(BTree)` if the degree is valid, `Err(BTreeError::InvalidMinDegree)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let tree = BTree::<i32>::new(3).unwrap();
    /// assert!(tree.is_empty());
    /// assert!(BTree::<i32>::new(1).is_err());
    /// ```
    pub fn new(min_degree: usize) -> InitResult<Self> {
        Self::with_comparator(min_degree, T::cmp as NaturalOrder<T>)
    }

    /// Create a B-tree with the default minimum degree.
    ///
    /// This is equivalent to calling `new(DEFAULT_MIN_DEGREE)`.
    pub fn with_default_degree() -> Self {
        Self::from_parts(DEFAULT_MIN_DEGREE, T::cmp as NaturalOrder<T>)
    }
}

impl<T, C> BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create a B-tree ordered by an injected comparator.
    ///
    /// The comparator must be a stable total order for the lifetime of the
    /// tree; it decides placement, duplicate detection and traversal order.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::with_comparator(2, |a: &i32, b: &i32| b.cmp(a)).unwrap();
    /// for key in [1, 3, 2] {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.inorder_traversal(), [&3, &2, &1]);
    /// ```
    pub fn with_comparator(min_degree: usize, compare: C) -> InitResult<Self> {
        validation::validate_min_degree(min_degree)?;
        Ok(Self::from_parts(min_degree, compare))
    }
}

impl<T, C> BTree<T, C> {
    fn from_parts(min_degree: usize, compare: C) -> Self {
        tracing::debug!(min_degree, "creating empty B-tree");
        Self {
            min_degree,
            root: None,
            len: 0,
            compare,
            arena: CompactArena::new(),
        }
    }

    /// The minimum degree `t` this tree was built with.
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Largest number of keys a node may hold (`2t - 1`).
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Smallest number of keys a non-root node may hold (`t - 1`).
    pub fn min_keys(&self) -> usize {
        self.min_degree - 1
    }
}

// Default implementations
impl<T: Ord> Default for BTree<T> {
    /// Create a B-tree with the default minimum degree.
    fn default() -> Self {
        Self::with_default_degree()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.min_degree)
            .field("len", &self.len)
            .field("keys", &self.inorder_traversal())
            .finish()
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that a minimum degree is usable: at least `MIN_DEGREE` and
    /// small enough that `2t` fits in `usize`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if valid, `Err(BTreeError)` otherwise.
    pub fn validate_min_degree(min_degree: usize) -> InitResult<()> {
        if min_degree < MIN_DEGREE {
            Err(BTreeError::invalid_min_degree(min_degree, MIN_DEGREE))
        } else if min_degree.checked_mul(2).is_none() {
            Err(BTreeError::min_degree_too_large(min_degree, MAX_MIN_DEGREE))
        } else {
            Ok(())
        }
    }

    /// Get the recommended minimum degree for a given expected number of elements.
    ///
    /// Larger trees favour wider nodes to keep the height down; the result is
    /// always at least `MIN_DEGREE`.
    pub fn recommended_min_degree(expected_elements: usize) -> usize {
        if expected_elements < 100 {
            MIN_DEGREE
        } else if expected_elements < 10_000 {
            DEFAULT_MIN_DEGREE
        } else if expected_elements < 1_000_000 {
            16
        } else {
            32
        }
    }
}
