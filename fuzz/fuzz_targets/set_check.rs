#![no_main]
use std::collections::BTreeSet;
use std::ops::Bound;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vebset::{SparseVebSet, VebSet};

const BITS: u32 = 16;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { key: u16 },
    Remove { key: u16 },
    Contains { key: u16 },
    Successor { key: u16 },
}

fuzz_target!(|ops: Vec<Op>| {
    let mut dense = VebSet::new(BITS);
    let mut sparse = SparseVebSet::new(BITS);
    let mut oracle = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert { key } => {
                let key = key as usize;
                let newly = oracle.insert(key);
                assert_eq!(dense.insert(key), newly);
                assert_eq!(sparse.insert(key), newly);
            }
            Op::Remove { key } => {
                let key = key as usize;
                let was_present = oracle.remove(&key);
                assert_eq!(dense.remove(key), was_present);
                assert_eq!(sparse.remove(key), was_present);
            }
            Op::Contains { key } => {
                let key = key as usize;
                let expected = oracle.contains(&key);
                assert_eq!(dense.contains(key), expected);
                assert_eq!(sparse.contains(key), expected);
            }
            Op::Successor { key } => {
                let key = key as usize;
                let expected = oracle
                    .range((Bound::Excluded(key), Bound::Unbounded))
                    .next()
                    .copied();
                assert_eq!(dense.successor(key), expected);
                assert_eq!(sparse.successor(key), expected);
            }
        }
        assert_eq!(dense.min(), oracle.first().copied());
        assert_eq!(dense.max(), oracle.last().copied());
        assert_eq!(sparse.min(), oracle.first().copied());
        assert_eq!(sparse.max(), oracle.last().copied());
    }

    assert_eq!(dense.len(), oracle.len());
    assert_eq!(sparse.len(), oracle.len());
    assert!(dense.iter().eq(oracle.iter().copied()));
    assert!(sparse.iter().eq(oracle.iter().copied()));
});
