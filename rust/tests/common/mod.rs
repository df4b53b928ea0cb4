//! Shared helpers for the integration tests.
//!
//! Set `RUST_LOG=btree=debug` to see splits, borrows and merges while a test runs.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use btree::BTree;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Ensures tracing is only initialized once across all tests.
static INIT: Once = Once::new();

/// Install an fmt subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Safe to call multiple times - only the first call takes effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();
        let _ = Registry::default().with(filter).with(layer).try_init();
    });
}

/// Panic with the rendered structure if the tree breaks an invariant.
pub fn assert_valid(tree: &BTree<i32>, context: &str) {
    let report = tree.validate();
    assert!(
        report.is_valid,
        "{}: {}\n{}",
        context,
        report,
        tree.render_structure()
    );
}

/// Assert the tree holds exactly the oracle's keys, in order.
pub fn assert_matches_oracle(tree: &BTree<i32>, oracle: &BTreeSet<i32>) {
    assert_eq!(tree.len(), oracle.len());
    let ours: Vec<i32> = tree.iter().copied().collect();
    let expected: Vec<i32> = oracle.iter().copied().collect();
    assert_eq!(ours, expected);
}
