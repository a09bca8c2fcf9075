use std::collections::HashSet;

use rand::prelude::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};

use crate::dense::DenseTree;
use crate::sparse::SparseTree;

#[test]
fn small_insert() {
    let key_cnt = 10_000usize;
    let mut tree = DenseTree::new(16);

    for k in 0..key_cnt {
        tree.insert_unchecked(k);
        assert!(tree.contains(k));
    }
    assert_eq!(tree.min, Some(0));
    assert_eq!(tree.max, Some(key_cnt - 1));
}

#[test]
fn sparse_random_keys() {
    let key_cnt = 10_000;
    let mut tree = SparseTree::new(60);
    let mut keys = HashSet::with_capacity(key_cnt);

    while keys.len() < key_cnt {
        let k = thread_rng().gen::<usize>() & ((1 << 60) - 1);
        if keys.insert(k) {
            tree.insert_unchecked(k);
        }
    }

    let keys: Vec<usize> = keys.into_iter().collect();
    let delete_cnt = key_cnt / 2;

    for k in keys.iter().take(delete_cnt) {
        tree.remove_unchecked(*k);
    }
    for k in keys.iter().take(delete_cnt) {
        assert!(!tree.contains(*k));
    }
    for k in keys.iter().skip(delete_cnt) {
        assert!(tree.contains(*k));
    }
}

#[test]
fn shuffled_insert_then_drain() {
    let key_cnt = 30_000;
    let bits = 16;
    let mut key_space: Vec<usize> = (0..key_cnt).collect();

    let mut r = StdRng::seed_from_u64(42);
    key_space.shuffle(&mut r);

    let mut tree = DenseTree::new(bits);
    for k in key_space.iter() {
        tree.insert_unchecked(*k);
    }
    assert_eq!(tree.min, Some(0));
    assert_eq!(tree.max, Some(key_cnt - 1));

    // erasing in ascending order walks the min forward one key at a time
    for k in 0..key_cnt {
        assert_eq!(tree.min, Some(k));
        tree.remove_unchecked(k);
    }
    assert_eq!(tree.min, None);
    assert_eq!(tree.max, None);
}

#[test]
fn dense_sparse_agree() {
    let bits = 14;
    let universe = 1usize << bits;
    let mut dense = DenseTree::new(bits);
    let mut sparse = SparseTree::new(bits);
    let mut present = HashSet::new();

    let mut r = StdRng::seed_from_u64(7);
    for _ in 0..50_000 {
        let key = r.gen_range(0..universe);
        match r.gen_range(0..3) {
            0 => {
                if present.insert(key) {
                    dense.insert_unchecked(key);
                    sparse.insert_unchecked(key);
                }
            }
            1 => {
                if present.remove(&key) {
                    dense.remove_unchecked(key);
                    sparse.remove_unchecked(key);
                }
            }
            _ => {
                assert_eq!(dense.contains(key), present.contains(&key));
                assert_eq!(dense.contains(key), sparse.contains(key));
                assert_eq!(dense.successor(key), sparse.successor(key));
            }
        }
        assert_eq!(dense.min, sparse.min);
        assert_eq!(dense.max, sparse.max);
    }

    check_dense(&dense);
    check_sparse(&sparse);
}

/// Walks the whole dense structure verifying the cross-level invariants.
fn check_dense(node: &DenseTree) {
    match (node.min, node.max) {
        (None, None) => {}
        (Some(lo), Some(hi)) => assert!(lo <= hi),
        _ => panic!("min and max must be present together"),
    }
    if node.bits <= 1 {
        assert!(node.summary.is_none());
        assert!(node.clusters.is_empty());
        return;
    }

    let summary = node.summary.as_deref().expect("internal node lacks summary");
    // a cluster is listed in the summary exactly when it holds an element
    for (index, child) in node.clusters.iter().enumerate() {
        assert_eq!(summary.contains(index), child.min.is_some());
        check_dense(child);
    }
    check_dense(summary);

    // min lives at this node only, never inside a cluster
    if let Some(min) = node.min {
        let shift = node.bits - node.bits / 2;
        let (cluster, offset) = (min >> shift, min & ((1 << shift) - 1));
        assert!(!node.clusters[cluster].contains(offset));
    }
}

/// Walks the materialized part of a sparse structure verifying the same
/// invariants; absent entries count as empty clusters.
fn check_sparse(node: &SparseTree) {
    match (node.min, node.max) {
        (None, None) => {}
        (Some(lo), Some(hi)) => assert!(lo <= hi),
        _ => panic!("min and max must be present together"),
    }
    if node.bits <= 1 {
        assert!(node.summary.is_none());
        assert!(node.clusters.is_empty());
        return;
    }

    match node.summary.as_deref() {
        None => {
            for child in node.clusters.values() {
                assert!(child.min.is_none());
                check_sparse(child);
            }
        }
        Some(summary) => {
            for (&index, child) in node.clusters.iter() {
                assert_eq!(summary.contains(index), child.min.is_some());
                check_sparse(child);
            }
            check_sparse(summary);
        }
    }

    if let Some(min) = node.min {
        let shift = node.bits - node.bits / 2;
        let (cluster, offset) = (min >> shift, min & ((1 << shift) - 1));
        if let Some(child) = node.clusters.get(&cluster) {
            assert!(!child.contains(offset));
        }
    }
}

#[test]
fn invariants_hold_through_churn() {
    let bits = 10;
    let universe = 1usize << bits;
    let mut dense = DenseTree::new(bits);
    let mut sparse = SparseTree::new(bits);
    let mut present = HashSet::new();

    let mut r = StdRng::seed_from_u64(99);
    for round in 0..2_000 {
        let key = r.gen_range(0..universe);
        if present.insert(key) {
            dense.insert_unchecked(key);
            sparse.insert_unchecked(key);
        } else {
            present.remove(&key);
            dense.remove_unchecked(key);
            sparse.remove_unchecked(key);
        }

        if round % 97 == 0 {
            check_dense(&dense);
            check_sparse(&sparse);
        }
    }
}
