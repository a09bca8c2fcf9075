use std::fmt::Display;

use crate::dense::DenseTree;
use crate::sparse::SparseTree;

/// Per-level structure statistics for a universe tree.
///
/// Level 0 is the root; each deeper level halves the exponent. For the
/// dense variant this counts the whole preallocated structure (cost is
/// proportional to the universe size); for the sparse variant it counts
/// only the nodes that were ever materialized.
#[derive(Default, Debug, serde::Serialize)]
pub struct TreeStats(Vec<LevelStats>);

impl TreeStats {
    /// Total number of allocated nodes across all levels.
    pub fn total_nodes(&self) -> usize {
        self.0.iter().map(|l| l.nodes).sum()
    }

    /// Total number of nodes currently holding at least one element.
    pub fn occupied_nodes(&self) -> usize {
        self.0.iter().map(|l| l.occupied).sum()
    }

    /// The per-level breakdown, root first.
    pub fn levels(&self) -> &[LevelStats] {
        &self.0
    }
}

impl Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for l in self.0.iter() {
            let occupancy = if l.nodes == 0 {
                0.0
            } else {
                l.occupied as f64 / l.nodes as f64
            };
            writeln!(
                f,
                "Level: {} --- || nodes: {:10} || occupied: {:10} || occupancy: {:6.2} ||",
                l.level, l.nodes, l.occupied, occupancy,
            )?;
        }
        writeln!(
            f,
            "Total: {} nodes, {} occupied",
            self.total_nodes(),
            self.occupied_nodes()
        )?;
        Ok(())
    }
}

/// Node counts for one level of the recursion.
#[derive(Debug, serde::Serialize, Clone)]
pub struct LevelStats {
    level: usize,
    nodes: usize,
    occupied: usize,
}

impl LevelStats {
    fn new_level(level: usize) -> Self {
        Self {
            level,
            nodes: 0,
            occupied: 0,
        }
    }

    /// Allocated nodes at this level.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Nodes at this level holding at least one element.
    pub fn occupied(&self) -> usize {
        self.occupied
    }
}

impl DenseTree {
    pub(crate) fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();

        let mut pending: Vec<(usize, &DenseTree)> = vec![(0, self)];
        while let Some((level, node)) = pending.pop() {
            if stats.0.len() <= level {
                stats.0.push(LevelStats::new_level(level));
            }
            stats.0[level].nodes += 1;
            if node.min.is_some() {
                stats.0[level].occupied += 1;
            }

            if let Some(summary) = node.summary.as_deref() {
                pending.push((level + 1, summary));
            }
            for child in node.clusters.iter() {
                pending.push((level + 1, child));
            }
        }
        stats
    }
}

impl SparseTree {
    pub(crate) fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();

        let mut pending: Vec<(usize, &SparseTree)> = vec![(0, self)];
        while let Some((level, node)) = pending.pop() {
            if stats.0.len() <= level {
                stats.0.push(LevelStats::new_level(level));
            }
            stats.0[level].nodes += 1;
            if node.min.is_some() {
                stats.0[level].occupied += 1;
            }

            if let Some(summary) = node.summary.as_deref() {
                pending.push((level + 1, summary));
            }
            for child in node.clusters.values() {
                pending.push((level + 1, child));
            }
        }
        stats
    }
}
