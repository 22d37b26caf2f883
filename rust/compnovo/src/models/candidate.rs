use crate::chemistry::ResidueId;
use serde::{
    Deserialize,
    Serialize,
};

/// A residue sequence covering one mass interval of the node graph.
///
/// `path_score` is the summed score of the graph nodes the sequence was
/// split on, it is only used to pick survivors when a pool overflows.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub residues: Box<[ResidueId]>,
    pub mass: f64,
    pub path_score: f64,
}

impl Decomposition {
    pub fn new(residues: Box<[ResidueId]>, mass: f64, path_score: f64) -> Self {
        Self {
            residues,
            mass,
            path_score,
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Concatenates `self` (N-terminal side) with `other`.
    pub fn join(&self, other: &Decomposition, pivot_score: f64) -> Decomposition {
        let mut residues = Vec::with_capacity(self.len() + other.len());
        residues.extend_from_slice(&self.residues);
        residues.extend_from_slice(&other.residues);
        Decomposition {
            residues: residues.into_boxed_slice(),
            mass: self.mass + other.mass,
            path_score: self.path_score + other.path_score + pivot_score,
        }
    }
}

/// A full length candidate spanning the whole precursor, with its spectrum score.
#[derive(Debug, Clone, PartialEq)]
pub struct Permut {
    pub residues: Box<[ResidueId]>,
    pub sequence: String,
    pub score: f64,
}

/// A ranked identification, as handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideCandidate {
    pub sequence: String,
    pub score: f64,
    pub rank: u32,
    pub charge: u8,
}
