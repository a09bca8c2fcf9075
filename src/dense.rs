//! Eagerly allocated recursive universe tree.
//!
//! The whole recursive structure, summary and all clusters down to the
//! two-element base case, is built at construction and never changes shape;
//! mutation only touches the `min`/`max` fields along one root-to-leaf path.
//! An empty cluster is simply a child whose `min` is absent, so no existence
//! check precedes a recursion step. Space is proportional to the universe
//! size, which keeps this variant to exponents of roughly 24 and below.

use crate::utils::{low_mask, pow2};

/// One node of the dense tree, covering the key domain `[0, 2^bits)`.
///
/// Keys split into a cluster index (high bits) and an offset (low bits);
/// `summary` tracks which clusters are non-empty, over the universe of
/// cluster indices. The node's own `min` is never stored in a cluster.
pub(crate) struct DenseTree {
    pub(crate) bits: u32,
    cluster_shift: u32,
    offset_mask: usize,
    pub(crate) min: Option<usize>,
    pub(crate) max: Option<usize>,
    pub(crate) summary: Option<Box<DenseTree>>,
    pub(crate) clusters: Box<[DenseTree]>,
}

impl DenseTree {
    /// Builds the full structure for the key domain `[0, 2^bits)`.
    pub(crate) fn new(bits: u32) -> Self {
        debug_assert!(bits < usize::BITS);

        let summary_bits = bits / 2;
        let cluster_bits = bits - summary_bits;

        let (summary, clusters) = if bits > 1 {
            let summary = Box::new(DenseTree::new(summary_bits));
            let clusters = (0..pow2(summary_bits))
                .map(|_| DenseTree::new(cluster_bits))
                .collect();
            (Some(summary), clusters)
        } else {
            (None, Box::default())
        };

        DenseTree {
            bits,
            cluster_shift: cluster_bits,
            offset_mask: low_mask(cluster_bits),
            min: None,
            max: None,
            summary,
            clusters,
        }
    }

    #[inline]
    fn split(&self, key: usize) -> (usize, usize) {
        (key >> self.cluster_shift, key & self.offset_mask)
    }

    #[inline]
    fn compose(&self, cluster: usize, offset: usize) -> usize {
        (cluster << self.cluster_shift) | offset
    }

    // summary is built for every node with bits > 1; callers check bits first
    #[inline]
    fn summary(&self) -> &DenseTree {
        self.summary.as_deref().unwrap()
    }

    #[inline]
    fn summary_mut(&mut self) -> &mut DenseTree {
        self.summary.as_deref_mut().unwrap()
    }

    pub(crate) fn contains(&self, key: usize) -> bool {
        if self.min == Some(key) || self.max == Some(key) {
            return true;
        }
        if self.bits <= 1 {
            return false;
        }
        let (cluster, offset) = self.split(key);
        self.clusters[cluster].contains(offset)
    }

    /// Inserts `key`, which must not be present.
    pub(crate) fn insert_unchecked(&mut self, mut key: usize) {
        debug_assert!(!self.contains(key));

        let (Some(min), Some(max)) = (self.min, self.max) else {
            self.min = Some(key);
            self.max = Some(key);
            return;
        };

        if key < min {
            // the displaced minimum is what actually descends into a cluster
            self.min = Some(key);
            key = min;
        }

        if self.bits > 1 {
            let (cluster, offset) = self.split(key);
            if self.clusters[cluster].min.is_none() {
                self.summary_mut().insert_unchecked(cluster);
            }
            self.clusters[cluster].insert_unchecked(offset);
        }

        if key > max {
            self.max = Some(key);
        }
    }

    /// Removes `key`, which must be present.
    pub(crate) fn remove_unchecked(&mut self, key: usize) {
        debug_assert!(self.contains(key));

        if self.min == self.max {
            self.min = None;
            self.max = None;
            return;
        }
        if self.bits <= 1 {
            // two-element base case: the bit that stays becomes both bounds
            let kept = Some(key ^ 1);
            self.min = kept;
            self.max = kept;
            return;
        }

        let mut victim = key;
        if self.min == Some(victim) {
            // promote the second-smallest element to min; that element is
            // the one physically removed from the cluster structure
            let first = self.summary().min.unwrap();
            victim = self.compose(first, self.clusters[first].min.unwrap());
            self.min = Some(victim);
        }

        let (cluster, offset) = self.split(victim);
        self.clusters[cluster].remove_unchecked(offset);

        if self.clusters[cluster].min.is_none() {
            self.summary_mut().remove_unchecked(cluster);
            if self.max == Some(victim) {
                match self.summary().max {
                    // every cluster is empty, only min remains
                    None => self.max = self.min,
                    Some(last) => {
                        let offset = self.clusters[last].max.unwrap();
                        self.max = Some(self.compose(last, offset));
                    }
                }
            }
        } else if self.max == Some(victim) {
            let offset = self.clusters[cluster].max.unwrap();
            self.max = Some(self.compose(cluster, offset));
        }
    }

    /// Smallest element strictly greater than `key`, if any.
    pub(crate) fn successor(&self, key: usize) -> Option<usize> {
        if self.bits <= 1 {
            return if key == 0 && self.max == Some(1) {
                Some(1)
            } else {
                None
            };
        }
        if let Some(min) = self.min {
            if key < min {
                return Some(min);
            }
        }

        let (cluster, offset) = self.split(key);
        // within the same cluster, if anything beyond the offset remains
        if self.clusters[cluster].max.is_some_and(|m| offset < m) {
            let next = self.clusters[cluster].successor(offset)?;
            return Some(self.compose(cluster, next));
        }
        // otherwise hop to the next occupied cluster via the summary
        let next_cluster = self.summary().successor(cluster)?;
        let next_min = self.clusters[next_cluster].min?;
        Some(self.compose(next_cluster, next_min))
    }
}
