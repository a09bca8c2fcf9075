#![no_main]
use std::collections::BTreeSet;
use std::ops::Bound;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vebset::SparseVebSet;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { key: usize },
    Remove { key: usize },
    Successor { key: usize },
}

// full-width universe: every usize is a valid key
fuzz_target!(|ops: Vec<Op>| {
    let mut set = SparseVebSet::default();
    let mut oracle = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert { key } => {
                assert_eq!(set.insert(key), oracle.insert(key));
            }
            Op::Remove { key } => {
                assert_eq!(set.remove(key), oracle.remove(&key));
            }
            Op::Successor { key } => {
                let expected = oracle
                    .range((Bound::Excluded(key), Bound::Unbounded))
                    .next()
                    .copied();
                assert_eq!(set.successor(key), expected);
            }
        }
        assert_eq!(set.min(), oracle.first().copied());
        assert_eq!(set.max(), oracle.last().copied());
    }

    assert!(set.iter().eq(oracle.iter().copied()));
});
