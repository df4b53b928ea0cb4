mod common;

use std::collections::BTreeSet;

use btree::BTree;
use common::{assert_matches_oracle, assert_valid, init_tracing};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 4] = [0, 7, 42, 0xB7EE];

#[test]
fn test_random_operations_match_btreeset() {
    init_tracing();
    for &seed in &SEEDS {
        for min_degree in [2, 3, 7] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tree = BTree::new(min_degree).unwrap();
            let mut oracle = BTreeSet::new();

            for step in 0..3_000 {
                let key = rng.gen_range(0..500);
                if rng.gen_bool(0.6) {
                    assert_eq!(tree.insert(key), oracle.insert(key), "insert {} at step {}", key, step);
                } else {
                    assert_eq!(tree.remove(&key), oracle.remove(&key), "remove {} at step {}", key, step);
                }
                assert_eq!(tree.contains(&key), oracle.contains(&key));

                if step % 250 == 0 {
                    assert_valid(&tree, &format!("seed {} t {} step {}", seed, min_degree, step));
                }
            }

            assert_valid(&tree, "end of run");
            assert_matches_oracle(&tree, &oracle);
            assert_eq!(tree.first(), oracle.first());
            assert_eq!(tree.last(), oracle.last());
        }
    }
}

#[test]
fn test_shuffled_fill_and_drain() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(1234);
    let mut keys: Vec<i32> = (0..2_000).collect();
    keys.shuffle(&mut rng);

    let mut tree = BTree::new(4).unwrap();
    let mut oracle = BTreeSet::new();
    for &key in &keys {
        tree.insert(key);
        oracle.insert(key);
    }
    assert_matches_oracle(&tree, &oracle);

    keys.shuffle(&mut rng);
    for (i, key) in keys.iter().enumerate() {
        assert!(tree.remove(key));
        oracle.remove(key);
        if i % 100 == 0 {
            assert_valid(&tree, "while draining");
            assert_matches_oracle(&tree, &oracle);
        }
    }
    assert!(tree.is_empty());
    assert_eq!(tree.allocated_node_count(), 0);
}

#[test]
fn test_pop_order_matches_btreeset() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut tree = BTree::new(3).unwrap();
    let mut oracle = BTreeSet::new();
    for _ in 0..1_000 {
        let key = rng.gen_range(-10_000..10_000);
        tree.insert(key);
        oracle.insert(key);
    }

    while !oracle.is_empty() {
        if rng.gen_bool(0.5) {
            assert_eq!(tree.pop_first(), oracle.pop_first());
        } else {
            assert_eq!(tree.pop_last(), oracle.pop_last());
        }
    }
    assert_eq!(tree.pop_first(), None);
    assert_valid(&tree, "after popping everything");
}

#[test]
fn test_search_agrees_after_churn() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree = BTree::new(2).unwrap();
    let mut oracle = BTreeSet::new();
    for _ in 0..5_000 {
        let key = rng.gen_range(0..1_000);
        if rng.gen_bool(0.5) {
            tree.insert(key);
            oracle.insert(key);
        } else {
            tree.remove(&key);
            oracle.remove(&key);
        }
    }

    for key in 0..1_000 {
        let result = tree.search(&key);
        assert_eq!(result.found, oracle.contains(&key), "key {}", key);
        if result.found {
            let node = tree.node(result.node.unwrap()).unwrap();
            assert_eq!(node.keys()[result.index], key);
        }
    }
}
