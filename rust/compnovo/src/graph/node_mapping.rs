use crate::scoring::{
    IonScore,
    IonType,
};
use serde::Serialize;
use std::ops::Range;

/// A cleavage position in the cumulative residue mass graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MassNode {
    /// Prefix residue mass of the cleavage site.
    pub mass: f64,
    pub score: IonScore,
    pub ion_type: IonType,
    /// Number of peak readings merged into this node.
    pub support: u16,
}

impl MassNode {
    fn absorb(&mut self, other: &MassNode) {
        if other.score.score > self.score.score {
            self.score.score = other.score.score;
            self.ion_type = other.ion_type;
        }
        self.score.evidence = self.score.evidence.union(other.score.evidence);
        self.support = self.support.saturating_add(other.support);
    }
}

/// Ordered mass -> node mapping.
///
/// Backed by a sorted vector searched with a tolerance, never by the raw
/// float as a key. Consecutive nodes are at least `merge_tolerance` apart.
#[derive(Debug, Clone, Serialize)]
pub struct NodeMapping {
    nodes: Vec<MassNode>,
    merge_tolerance: f64,
}

impl NodeMapping {
    /// Merges `candidates` (any order) into a mapping.
    ///
    /// Sorted by mass (ties: higher score first, then prefix before suffix), a
    /// candidate closer than `merge_tolerance` to the last retained node is
    /// folded into it.
    pub fn from_candidates(mut candidates: Vec<MassNode>, merge_tolerance: f64) -> Self {
        candidates.sort_by(|a, b| {
            a.mass
                .total_cmp(&b.mass)
                .then_with(|| b.score.score.total_cmp(&a.score.score))
                .then_with(|| a.ion_type.cmp(&b.ion_type))
        });

        let mut nodes: Vec<MassNode> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match nodes.last_mut() {
                Some(last) if candidate.mass - last.mass < merge_tolerance => {
                    last.absorb(&candidate);
                }
                _ => nodes.push(candidate),
            }
        }

        Self {
            nodes,
            merge_tolerance,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[MassNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> &MassNode {
        &self.nodes[index]
    }

    pub fn mass(&self, index: usize) -> f64 {
        self.nodes[index].mass
    }

    pub fn merge_tolerance(&self) -> f64 {
        self.merge_tolerance
    }

    /// Indices of nodes with `low <= mass <= high`.
    pub fn range(&self, low: f64, high: f64) -> Range<usize> {
        let start = self.nodes.partition_point(|n| n.mass < low);
        let end = start + self.nodes[start..].partition_point(|n| n.mass <= high);
        start..end
    }
}
