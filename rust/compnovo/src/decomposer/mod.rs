//! Divide and conquer decomposition of the precursor mass range.
//!
//! An interval between two graph nodes is explained either directly (residue
//! compositions of its width) or by splitting it on a pivot node and joining
//! the solutions of both halves. Sub-interval solutions are memoised, the
//! top-level pivot branches run in parallel and all feed one shared pool.

mod compositions;
mod pool;

pub use compositions::{
    distinct_orderings,
    for_each_composition,
};
pub use pool::{
    BoundedPool,
    SharedPool,
};

use pool::CandidateSink;

use crate::chemistry::constants::H2O;
use crate::chemistry::{
    ResidueAlphabet,
    ResidueId,
};
use crate::graph::NodeMapping;
use crate::models::{
    Decomposition,
    MassTolerance,
};
use crate::scoring::{
    IonScorer,
    PeakIndex,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{
    debug,
    warn,
};

/// Why a search stopped before exhausting its space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub candidate_cap: bool,
    pub time_budget: bool,
}

impl Truncation {
    pub fn is_truncated(&self) -> bool {
        self.candidate_cap || self.time_budget
    }

    fn merge(&mut self, other: Truncation) {
        self.candidate_cap |= other.candidate_cap;
        self.time_budget |= other.time_budget;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecomposerSettings {
    pub max_branching_factor: usize,
    pub max_candidate_count: usize,
    /// Per sub-interval retention, the top level uses `max_candidate_count`.
    pub max_subscore_number: usize,
    pub max_decomp_weight: f64,
    pub max_residues_per_decomp: usize,
    pub fragment_tolerance: f64,
    pub precursor_tolerance: MassTolerance,
    pub deadline: Option<Instant>,
}

#[derive(Debug)]
pub struct DecompositionOutcome {
    /// Best path score first.
    pub candidates: Vec<Decomposition>,
    pub truncation: Truncation,
    /// Most full length candidates alive at once, never above the cap.
    pub peak_pool_size: usize,
}

/// Enumerates full length candidates over one spectrum's node graph.
pub struct Decomposer<'a> {
    mapping: &'a NodeMapping,
    alphabet: &'a ResidueAlphabet,
    scorer: IonScorer,
    peaks: &'a PeakIndex,
    settings: DecomposerSettings,
    residue_span: f64,
}

impl<'a> Decomposer<'a> {
    pub fn new(
        mapping: &'a NodeMapping,
        alphabet: &'a ResidueAlphabet,
        scorer: IonScorer,
        peaks: &'a PeakIndex,
        settings: DecomposerSettings,
    ) -> Self {
        let residue_span = mapping
            .nodes()
            .last()
            .map(|n| n.mass)
            .unwrap_or(0.0);
        Self {
            mapping,
            alphabet,
            scorer,
            peaks,
            settings,
            residue_span,
        }
    }

    /// Decomposes `[0, residue_span]`.
    ///
    /// Every returned candidate reconstructs the precursor within the
    /// precursor tolerance.
    pub fn run(&self) -> DecompositionOutcome {
        let mut truncation = Truncation::default();
        let too_light = self.residue_span < self.alphabet.min_mass() - self.boundary_error();
        if self.mapping.len() < 2 || too_light {
            return DecompositionOutcome {
                candidates: Vec::new(),
                truncation,
                peak_pool_size: 0,
            };
        }

        let left = 0;
        let right = self.mapping.len() - 1;
        let pool = SharedPool::new(self.settings.max_candidate_count);

        let mut top = Branch::new(self);
        top.direct(left, right, &mut &pool);
        truncation.merge(top.truncation);

        let pivots = self.pivots(left, right);
        debug!(
            "Decomposing {:.4} Da over {} nodes with {} top-level pivots",
            self.residue_span,
            self.mapping.len(),
            pivots.len()
        );

        // Branches keep their own memo caches but share the full length pool
        let branch_truncations: Vec<Truncation> = pivots
            .par_iter()
            .map(|&pivot| {
                let mut branch = Branch::new(self);
                branch.split_on(left, pivot, right, &mut &pool);
                branch.truncation
            })
            .collect();
        for branch_truncation in branch_truncations {
            truncation.merge(branch_truncation);
        }

        let pool = pool.into_inner();
        if pool.overflowed() {
            truncation.candidate_cap = true;
        }
        let peak_pool_size = pool.high_water();

        let precursor_mass = self.residue_span + H2O;
        let tolerance = self.settings.precursor_tolerance;
        let candidates: Vec<Decomposition> = pool
            .into_sorted_vec()
            .into_iter()
            .filter(|c| tolerance.contains(precursor_mass, c.mass + H2O))
            .collect();

        if truncation.is_truncated() {
            warn!(
                "Decomposition truncated (candidate cap: {}, time budget: {}), keeping {} candidates",
                truncation.candidate_cap,
                truncation.time_budget,
                candidates.len()
            );
        }

        DecompositionOutcome {
            candidates,
            truncation,
            peak_pool_size,
        }
    }

    /// Uncertainty of a boundary node, driven by the precursor tolerance.
    fn boundary_error(&self) -> f64 {
        // The span is precursor - H2O, the tolerance applies to the precursor
        let precursor = self.residue_span + H2O;
        self.settings.precursor_tolerance.window(precursor)
    }

    fn node_error(&self, index: usize) -> f64 {
        if index == 0 {
            0.0
        } else if index == self.mapping.len() - 1 {
            self.boundary_error()
        } else {
            self.settings.fragment_tolerance
        }
    }

    /// Allowed deviation between a residue sum and the `[left, right]` width.
    fn interval_tolerance(&self, left: usize, right: usize) -> f64 {
        self.node_error(left) + self.node_error(right)
    }

    /// Nodes strictly inside `(left, right)` leaving room for a residue on
    /// both sides. Best score first, lowest mass on ties, at most
    /// `max_branching_factor` of them.
    fn pivots(&self, left: usize, right: usize) -> Vec<usize> {
        if right <= left + 1 {
            return Vec::new();
        }
        let min_mass = self.alphabet.min_mass();
        let pivot_error = self.settings.fragment_tolerance;
        // Inner nodes all carry the fragment tolerance
        let low = self.mapping.mass(left) + min_mass - self.node_error(left) - pivot_error;
        let high = self.mapping.mass(right) - min_mass + pivot_error + self.node_error(right);
        let inner = self.mapping.range(low, high);

        let mut pivots: Vec<usize> = (inner.start.max(left + 1)..inner.end.min(right)).collect();

        pivots.sort_by(|&a, &b| {
            let na = self.mapping.get(a);
            let nb = self.mapping.get(b);
            nb.score
                .score
                .total_cmp(&na.score.score)
                .then_with(|| na.mass.total_cmp(&nb.mass))
        });
        pivots.truncate(self.settings.max_branching_factor);
        pivots
    }

    /// Summed ion score of the cleavage sites inside a directly decomposed run.
    fn internal_site_score(&self, start_mass: f64, residues: &[ResidueId]) -> f64 {
        let mut position = start_mass;
        let mut total = 0.0;
        for &r in residues.iter().take(residues.len().saturating_sub(1)) {
            position += self.alphabet.mass(r);
            total += self
                .scorer
                .score(position, self.residue_span, self.peaks)
                .score;
        }
        total
    }
}

/// Recursion state of one (sequential) branch of the search.
struct Branch<'d, 'a> {
    decomposer: &'d Decomposer<'a>,
    cache: HashMap<(usize, usize), Arc<[Decomposition]>>,
    truncation: Truncation,
}

impl<'d, 'a> Branch<'d, 'a> {
    fn new(decomposer: &'d Decomposer<'a>) -> Self {
        Self {
            decomposer,
            cache: HashMap::new(),
            truncation: Truncation::default(),
        }
    }

    fn out_of_time(&mut self) -> bool {
        match self.decomposer.settings.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.truncation.time_budget = true;
                true
            }
            _ => false,
        }
    }

    /// Memoised solutions of a sub-interval.
    fn decompose(&mut self, left: usize, right: usize) -> Arc<[Decomposition]> {
        if let Some(hit) = self.cache.get(&(left, right)) {
            return hit.clone();
        }

        let settings = self.decomposer.settings;
        let mut pool = BoundedPool::new(
            settings
                .max_subscore_number
                .min(settings.max_candidate_count),
        );

        if !self.out_of_time() {
            self.direct(left, right, &mut pool);
            for pivot in self.decomposer.pivots(left, right) {
                if self.out_of_time() {
                    break;
                }
                self.split_on(left, pivot, right, &mut pool);
            }
        }
        if pool.overflowed() && pool.capacity() == settings.max_candidate_count {
            self.truncation.candidate_cap = true;
        }

        let out: Arc<[Decomposition]> = pool.into_sorted_vec().into();
        self.cache.insert((left, right), out.clone());
        out
    }

    /// Base case and gap decomposition of `[left, right]`.
    fn direct<S: CandidateSink>(&mut self, left: usize, right: usize, pool: &mut S) {
        let d = self.decomposer;
        let left_mass = d.mapping.mass(left);
        let width = d.mapping.mass(right) - left_mass;
        let tolerance = d.interval_tolerance(left, right);
        if width < d.alphabet.min_mass() - tolerance {
            return;
        }

        for id in d.alphabet.matching(width, tolerance) {
            pool.insert(Decomposition::new(
                vec![id].into_boxed_slice(),
                d.alphabet.mass(id),
                0.0,
            ));
        }

        if width > d.settings.max_decomp_weight || d.settings.max_residues_per_decomp < 2 {
            return;
        }
        for_each_composition(
            d.alphabet,
            width,
            tolerance,
            d.settings.max_residues_per_decomp,
            |composition| {
                if composition.len() < 2 {
                    return;
                }
                let mass = d.alphabet.sequence_mass(composition);
                for residues in distinct_orderings(composition) {
                    let path_score = d.internal_site_score(left_mass, &residues);
                    pool.insert(Decomposition::new(residues, mass, path_score));
                }
            },
        );
    }

    /// Joins the solutions of `[left, pivot]` and `[pivot, right]`.
    ///
    /// Both lists are best first, so once a pair cannot beat the worst entry
    /// of a full pool no later pair can either.
    fn split_on<S: CandidateSink>(
        &mut self,
        left: usize,
        pivot: usize,
        right: usize,
        pool: &mut S,
    ) {
        let left_solutions = self.decompose(left, pivot);
        if left_solutions.is_empty() {
            return;
        }
        let right_solutions = self.decompose(pivot, right);
        if right_solutions.is_empty() {
            return;
        }

        let d = self.decomposer;
        let width = d.mapping.mass(right) - d.mapping.mass(left);
        let tolerance = d.interval_tolerance(left, right);
        let pivot_score = d.mapping.get(pivot).score.score;

        for l in left_solutions.iter() {
            let best_possible = l.path_score + right_solutions[0].path_score + pivot_score;
            if pool.worst_score().is_some_and(|worst| best_possible < worst) {
                pool.reject();
                break;
            }
            for r in right_solutions.iter() {
                // Mismatched halves are expected, drop them silently
                if (l.mass + r.mass - width).abs() > tolerance {
                    continue;
                }
                let path_score = l.path_score + r.path_score + pivot_score;
                if pool.worst_score().is_some_and(|worst| path_score < worst) {
                    pool.reject();
                    break;
                }
                pool.insert(l.join(r, pivot_score));
            }
        }
    }
}
