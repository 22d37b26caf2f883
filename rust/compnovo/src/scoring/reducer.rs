use super::hyperscore::single_hyperscore;
use super::ion_scorer::FragmentationStrategy;
use super::ion_series::theoretical_ions;
use super::peak_index::PeakIndex;
use crate::chemistry::{
    ResidueAlphabet,
    ResidueId,
};
use crate::models::{
    Decomposition,
    Permut,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

const TRYPTIC_TERMINI: [char; 2] = ['K', 'R'];

/// Rescores full length candidates against the whole spectrum and keeps the
/// best `top_k`.
#[derive(Debug, Clone, Copy)]
pub struct PermutationReducer<'a> {
    alphabet: &'a ResidueAlphabet,
    strategy: FragmentationStrategy,
    top_k: usize,
    tryptic_only: bool,
}

impl<'a> PermutationReducer<'a> {
    pub fn new(
        alphabet: &'a ResidueAlphabet,
        strategy: FragmentationStrategy,
        top_k: usize,
        tryptic_only: bool,
    ) -> Self {
        Self {
            alphabet,
            strategy,
            top_k,
            tryptic_only,
        }
    }

    /// Hyperscore of `residues`, plus its score against the paired spectrum
    /// (read with the other chemistry) when there is one.
    pub fn score_candidate(
        &self,
        residues: &[ResidueId],
        peaks: &PeakIndex,
        complementary: Option<&PeakIndex>,
    ) -> f64 {
        let ions = theoretical_ions(residues, self.alphabet, self.strategy);
        let mut score = single_hyperscore(&ions, peaks);
        if let Some(other) = complementary {
            let other_ions = theoretical_ions(residues, self.alphabet, self.strategy.complementary());
            score += single_hyperscore(&other_ions, other);
        }
        score
    }

    fn is_tryptic(&self, residues: &[ResidueId]) -> bool {
        residues
            .last()
            .is_some_and(|&r| TRYPTIC_TERMINI.contains(&self.alphabet.get(r).symbol))
    }

    /// Scores every candidate of `pool` and returns the `top_k` best.
    ///
    /// Ordering: higher score, then shorter, then lexicographically smaller
    /// sequence. The result does not depend on the order of `pool`.
    pub fn reduce(
        &self,
        pool: &[Decomposition],
        peaks: &PeakIndex,
        complementary: Option<&PeakIndex>,
    ) -> Vec<Permut> {
        if pool.is_empty() {
            debug!("Nothing to reduce, empty candidate pool");
            return Vec::new();
        }

        let mut scored: Vec<Permut> = pool
            .par_iter()
            .filter(|c| !self.tryptic_only || self.is_tryptic(&c.residues))
            .map(|c| Permut {
                residues: c.residues.clone(),
                sequence: self.alphabet.render(&c.residues),
                score: self.score_candidate(&c.residues, peaks, complementary),
            })
            .collect();

        let num_scored = scored.len();
        scored.par_sort_unstable_by(rank_order);
        scored.dedup_by(|a, b| a.residues == b.residues);
        scored.truncate(self.top_k);
        debug!(
            "Reduced {} candidates ({} after filtering) to {}",
            pool.len(),
            num_scored,
            scored.len()
        );
        scored
    }
}

fn rank_order(a: &Permut, b: &Permut) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.residues.len().cmp(&b.residues.len()))
        .then_with(|| a.sequence.cmp(&b.sequence))
        .then_with(|| a.residues.cmp(&b.residues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::constants::{
        H2O,
        PROTON,
    };
    use crate::chemistry::{
        MassTable,
        ModificationSet,
    };
    use crate::models::{
        Peak,
        Spectrum,
    };

    const A: f64 = 71.037114;
    const G: f64 = 57.021464;

    fn alphabet() -> ResidueAlphabet {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        ResidueAlphabet::new(&table, "ACDEFGHKLMNPQRSTVWY", &ModificationSet::default()).unwrap()
    }

    fn decomposition(alpha: &ResidueAlphabet, seq: &str) -> Decomposition {
        let residues: Vec<ResidueId> = seq
            .chars()
            .map(|c| {
                alpha
                    .iter()
                    .find(|(_, r)| r.symbol == c && r.modification.is_none())
                    .unwrap()
                    .0
            })
            .collect();
        let mass = alpha.sequence_mass(&residues);
        Decomposition::new(residues.into_boxed_slice(), mass, 0.0)
    }

    fn ag_peaks() -> PeakIndex {
        let spec = Spectrum::new(
            vec![Peak::new(A + PROTON, 100.0), Peak::new(G + H2O + PROTON, 80.0)],
            A + G + H2O,
            1,
        );
        PeakIndex::new(&spec, 0.02)
    }

    #[test]
    fn test_supported_order_wins() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 20, false);
        let pool = vec![
            decomposition(&alpha, "GA"),
            decomposition(&alpha, "Q"),
            decomposition(&alpha, "AG"),
        ];
        let out = reducer.reduce(&pool, &ag_peaks(), None);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].sequence, "AG");
        assert!(out[0].score > out[1].score);
        // y1 - H2O of GA lands on the b1 peak of AG, Q has no backbone ions
        assert_eq!(out[1].sequence, "GA");
        assert_eq!(out[2].sequence, "Q");
        assert_eq!(out[2].score, 0.0);
    }

    #[test]
    fn test_top_k_and_empty_pool() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 1, false);
        let pool = vec![decomposition(&alpha, "GA"), decomposition(&alpha, "AG")];
        let out = reducer.reduce(&pool, &ag_peaks(), None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sequence, "AG");

        assert!(reducer.reduce(&[], &ag_peaks(), None).is_empty());
    }

    #[test]
    fn test_order_of_pool_does_not_matter() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 20, false);
        let mut pool = vec![
            decomposition(&alpha, "AG"),
            decomposition(&alpha, "GA"),
            decomposition(&alpha, "Q"),
        ];
        let forward = reducer.reduce(&pool, &ag_peaks(), None);
        pool.reverse();
        let backward = reducer.reduce(&pool, &ag_peaks(), None);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_ties_prefer_shorter_then_lexicographic() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 20, false);
        let far_away = PeakIndex::new(
            &Spectrum::new(vec![Peak::new(900.0, 1.0), Peak::new(950.0, 1.0)], 1000.0, 1),
            0.02,
        );
        let pool = vec![
            decomposition(&alpha, "VS"),
            decomposition(&alpha, "SV"),
            decomposition(&alpha, "W"),
        ];
        let out = reducer.reduce(&pool, &far_away, None);
        let seqs: Vec<&str> = out.iter().map(|p| p.sequence.as_str()).collect();
        assert_eq!(seqs, vec!["W", "SV", "VS"]);
    }

    #[test]
    fn test_tryptic_filter() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 20, true);
        let pool = vec![
            decomposition(&alpha, "GAK"),
            decomposition(&alpha, "GKA"),
            decomposition(&alpha, "AGR"),
        ];
        let out = reducer.reduce(&pool, &ag_peaks(), None);
        let seqs: Vec<&str> = out.iter().map(|p| p.sequence.as_str()).collect();
        assert_eq!(seqs.len(), 2);
        assert!(seqs.contains(&"GAK"));
        assert!(seqs.contains(&"AGR"));
    }

    #[test]
    fn test_complementary_spectrum_adds_evidence() {
        let alpha = alphabet();
        let reducer = PermutationReducer::new(&alpha, FragmentationStrategy::Cid, 20, false);
        let candidate = decomposition(&alpha, "AG");
        // c1 of AG in the paired ETD acquisition
        let etd = Spectrum::new(
            vec![
                Peak::new(A + FragmentationStrategy::Etd.prefix_offset(), 100.0),
                Peak::new(500.0, 10.0),
            ],
            A + G + H2O,
            1,
        );
        let etd_peaks = PeakIndex::new(&etd, 0.02);

        let alone = reducer.score_candidate(&candidate.residues, &ag_peaks(), None);
        let paired = reducer.score_candidate(&candidate.residues, &ag_peaks(), Some(&etd_peaks));
        assert!(paired > alone);
    }
}
