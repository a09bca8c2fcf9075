//! Lazily allocated recursive universe tree.
//!
//! Identical recursion to [`crate::dense`], but nothing is preallocated:
//! the summary and each cluster come into existence on the first insertion
//! that needs them, and an absent map entry reads as an empty cluster.
//! Once created, a cluster (or the summary) persists even after it empties;
//! only its `min`/`max` revert to absent. Space therefore tracks the number
//! of keys ever inserted rather than the universe size, which is what makes
//! exponents like 60 usable.

use std::collections::HashMap;

use crate::utils::low_mask;

/// Cluster index -> child tree. Absence means the cluster is empty and has
/// never been touched.
type ClusterMap = HashMap<usize, SparseTree, ahash::RandomState>;

pub(crate) struct SparseTree {
    pub(crate) bits: u32,
    cluster_shift: u32,
    offset_mask: usize,
    pub(crate) min: Option<usize>,
    pub(crate) max: Option<usize>,
    pub(crate) summary: Option<Box<SparseTree>>,
    pub(crate) clusters: ClusterMap,
}

impl SparseTree {
    /// An empty set over the key domain `[0, 2^bits)`. Allocates nothing
    /// beyond the node itself.
    pub(crate) fn new(bits: u32) -> Self {
        debug_assert!(bits <= usize::BITS);

        let cluster_bits = bits - bits / 2;
        SparseTree {
            bits,
            cluster_shift: cluster_bits,
            offset_mask: low_mask(cluster_bits),
            min: None,
            max: None,
            summary: None,
            clusters: ClusterMap::default(),
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

    // the summary exists whenever any cluster is occupied; remove callers
    // reach it only from states where that is guaranteed
    #[inline]
    fn summary(&self) -> &SparseTree {
        self.summary.as_deref().unwrap()
    }

    #[inline]
    fn summary_mut(&mut self) -> &mut SparseTree {
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
        match self.clusters.get(&cluster) {
            Some(child) => child.contains(offset),
            None => false,
        }
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
            let child_bits = self.cluster_shift;
            let summary_bits = self.bits - self.cluster_shift;

            let child = self
                .clusters
                .entry(cluster)
                .or_insert_with(|| SparseTree::new(child_bits));
            if child.min.is_none() {
                self.summary
                    .get_or_insert_with(|| Box::new(SparseTree::new(summary_bits)))
                    .insert_unchecked(cluster);
            }
            child.insert_unchecked(offset);
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
            victim = self.compose(first, self.clusters[&first].min.unwrap());
            self.min = Some(victim);
        }

        let (cluster, offset) = self.split(victim);
        let child = self.clusters.get_mut(&cluster).unwrap();
        child.remove_unchecked(offset);
        let emptied = child.min.is_none();

        if emptied {
            self.summary_mut().remove_unchecked(cluster);
            if self.max == Some(victim) {
                match self.summary().max {
                    // every cluster is empty, only min remains
                    None => self.max = self.min,
                    Some(last) => {
                        let offset = self.clusters[&last].max.unwrap();
                        self.max = Some(self.compose(last, offset));
                    }
                }
            }
        } else if self.max == Some(victim) {
            let offset = self.clusters[&cluster].max.unwrap();
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
        if let Some(child) = self.clusters.get(&cluster) {
            if child.max.is_some_and(|m| offset < m) {
                let next = child.successor(offset)?;
                return Some(self.compose(cluster, next));
            }
        }
        // otherwise hop to the next occupied cluster via the summary
        let next_cluster = self.summary.as_ref()?.successor(cluster)?;
        let next_min = self.clusters[&next_cluster].min?;
        Some(self.compose(next_cluster, next_min))
    }
}
