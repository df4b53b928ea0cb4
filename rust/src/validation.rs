//! Validation and debugging utilities for BTree.
//!
//! `validate` walks the whole tree and collects every broken invariant it
//! finds instead of stopping at the first one. Normal operations never call
//! into this module; it exists for tests and diagnostics.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{self, Write};

use crate::error::{BTreeError, BTreeResult};
use crate::types::{BTree, NodeId, NULL_NODE};

/// Outcome of [`BTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// One description per violation found, in visiting order.
    pub violations: Vec<String>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return write!(f, "valid");
        }
        write!(f, "{} violation(s): {}", self.violations.len(), self.violations.join("; "))
    }
}

/// Accumulated state of one validation walk.
struct Walk {
    violations: Vec<String>,
    visited: HashSet<NodeId>,
    leaf_depth: Option<usize>,
    key_count: usize,
}

impl Walk {
    fn report(&mut self, node: NodeId, message: impl fmt::Display) {
        self.violations.push(format!("node {}: {}", node, message));
    }
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<T, C> BTree<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Check every structural invariant and report all violations.
    ///
    /// Covers key ordering, node occupancy bounds, child counts, per-subtree
    /// key ranges, uniform leaf depth, parent links, and agreement between
    /// the stored length, the reachable keys and the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// tree.extend(0..100);
    /// let report = tree.validate();
    /// assert!(report.is_valid, "{}", report);
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let mut walk = Walk {
            violations: Vec::new(),
            visited: HashSet::new(),
            leaf_depth: None,
            key_count: 0,
        };

        match self.root {
            None => {
                if self.len != 0 {
                    walk.violations
                        .push(format!("tree has no root but records {} keys", self.len));
                }
            }
            Some(root) => {
                self.check_node(root, NULL_NODE, None, None, 0, &mut walk);

                if walk.key_count != self.len {
                    walk.violations.push(format!(
                        "tree records {} keys but {} are reachable",
                        self.len, walk.key_count
                    ));
                }
            }
        }

        if walk.visited.len() != self.arena.len() {
            walk.violations.push(format!(
                "{} nodes reachable from the root but {} allocated in the arena",
                walk.visited.len(),
                self.arena.len()
            ));
        }

        ValidationReport {
            is_valid: walk.violations.is_empty(),
            violations: walk.violations,
        }
    }

    /// Check if the tree maintains B-tree invariants.
    /// Returns true if all invariants are satisfied.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_valid
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        let report = self.validate();
        if report.is_valid {
            Ok(())
        } else {
            Err(report.violations.join("; "))
        }
    }

    /// Gate for the `try_*` entry points.
    ///
    /// A root handle that is not live in the arena is an `ArenaError`; any
    /// other broken invariant is a `DataIntegrityError`.
    pub(crate) fn check_integrity(&self, context: &str) -> BTreeResult<()> {
        let result = match self.root {
            Some(root) => self.checked_node(root, context).map(|_| ()),
            None => Ok(()),
        }
        .and_then(|()| {
            self.check_invariants_detailed()
                .map_err(|e| BTreeError::data_integrity(context, &e))
        });
        if let Err(error) = &result {
            tracing::warn!(context, %error, "integrity check failed");
        }
        result
    }

    /// Recursively check invariants for a node and its subtree.
    ///
    /// Every key in the subtree must lie strictly between `lower` and `upper`.
    fn check_node(
        &self,
        id: NodeId,
        expected_parent: NodeId,
        lower: Option<&T>,
        upper: Option<&T>,
        depth: usize,
        walk: &mut Walk,
    ) {
        let Some(node) = self.arena.get(id) else {
            walk.report(id, "referenced but not allocated");
            return;
        };
        if !walk.visited.insert(id) {
            walk.report(id, "reachable more than once");
            return;
        }
        walk.key_count += node.keys.len();

        let is_root = expected_parent == NULL_NODE;
        if node.parent != expected_parent {
            walk.report(
                id,
                format_args!("parent is {} but owner is {}", node.parent, expected_parent),
            );
        }

        // Key order within the node.
        for (i, pair) in node.keys.windows(2).enumerate() {
            if (self.compare)(&pair[0], &pair[1]) != Ordering::Less {
                walk.report(id, format_args!("keys {} and {} out of order", i, i + 1));
            }
        }

        // Occupancy.
        let count = node.keys.len();
        if count > self.max_keys() {
            walk.report(id, format_args!("{} keys exceeds maximum {}", count, self.max_keys()));
        }
        if is_root && count == 0 {
            walk.report(id, "root of a non-empty tree has no keys");
        }
        if !is_root && count < self.min_keys() {
            walk.report(id, format_args!("{} keys below minimum {}", count, self.min_keys()));
        }

        // Key ranges inherited from ancestors.
        for (i, key) in node.keys.iter().enumerate() {
            if lower.is_some_and(|low| (self.compare)(key, low) != Ordering::Greater) {
                walk.report(id, format_args!("key {} not above its lower separator", i));
            }
            if upper.is_some_and(|high| (self.compare)(key, high) != Ordering::Less) {
                walk.report(id, format_args!("key {} not below its upper separator", i));
            }
        }

        if node.leaf {
            if !node.children.is_empty() {
                walk.report(id, format_args!("leaf has {} children", node.children.len()));
            }
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => walk.report(
                    id,
                    format_args!("leaf at depth {} but other leaves at depth {}", depth, expected),
                ),
                Some(_) => {}
            }
            return;
        }

        if node.children.len() != count + 1 {
            walk.report(
                id,
                format_args!("{} keys but {} children", count, node.children.len()),
            );
        }

        for (i, &child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { node.keys.get(i - 1).or(lower) };
            let child_upper = node.keys.get(i).or(upper);
            self.check_node(child, id, child_lower, child_upper, depth + 1, walk);
        }
    }
}

// ============================================================================
// DEBUGGING AND TESTING UTILITIES
// ============================================================================

impl<T: fmt::Debug, C> BTree<T, C> {
    /// Render the node structure, one node per line, indented by depth.
    pub fn render_structure(&self) -> String {
        let mut out = String::new();
        match self.root {
            Some(root) => self.render_node(root, 0, &mut out),
            None => out.push_str("<empty>\n"),
        }
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let Some(node) = self.arena.get(id) else {
            let _ = writeln!(out, "{}Node[id={}]: <missing>", indent, id);
            return;
        };
        let kind = if node.leaf { "Leaf" } else { "Internal" };
        let _ = writeln!(out, "{}{}[id={}]: {:?}", indent, kind, id, node.keys);
        for &child in &node.children {
            self.render_node(child, depth + 1, out);
        }
    }
}
