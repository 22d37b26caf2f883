use crate::chemistry::{
    MassTable,
    ModificationSet,
    ResidueAlphabet,
};
use crate::config::SearchConfig;
use crate::decomposer::{
    Decomposer,
    DecomposerSettings,
    Truncation,
};
use crate::errors::Result;
use crate::graph::GraphBuilder;
use crate::models::{
    PeptideCandidate,
    Spectrum,
};
use crate::scoring::{
    IonScorer,
    PeakIndex,
    PermutationReducer,
    SearchTimings,
    assemble,
};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::{
    debug,
    info,
};

/// Bookkeeping of one spectrum's search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    pub num_nodes: usize,
    /// Full length candidates handed to the reducer.
    pub raw_pool_size: usize,
    /// Most full length candidates held at once during decomposition.
    pub peak_pool_size: usize,
    pub truncation: Truncation,
    pub timings: SearchTimings,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identification {
    /// Best first, ranks start at 1.
    pub candidates: Vec<PeptideCandidate>,
    pub stats: SearchStats,
}

impl Identification {
    fn empty(stats: SearchStats) -> Self {
        Self {
            candidates: Vec::new(),
            stats,
        }
    }
}

/// De novo sequencing engine.
///
/// Built once from a [`SearchConfig`], then shared (it is `Send + Sync`) by
/// every spectrum of a run.
///
/// ```
/// use compnovo::{CompNovo, SearchConfig};
/// use compnovo::models::{MassTolerance, Peak, Spectrum};
///
/// let config = SearchConfig {
///     precursor_mass_tolerance: MassTolerance::Absolute(0.02),
///     fragment_mass_tolerance: 0.02,
///     ..Default::default()
/// };
/// let engine = CompNovo::new(config).unwrap();
/// // b1 and y1 of AG
/// let spectrum = Spectrum::new(
///     vec![Peak::new(72.044390, 100.0), Peak::new(76.039305, 80.0)],
///     146.069142,
///     1,
/// );
/// let result = engine.identify(&spectrum).unwrap();
/// assert_eq!(result.candidates[0].sequence, "AG");
/// assert_eq!(result.candidates[0].rank, 1);
/// ```
#[derive(Debug, Clone)]
pub struct CompNovo {
    config: SearchConfig,
    alphabet: ResidueAlphabet,
    scorer: IonScorer,
}

impl CompNovo {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let fixed = ModificationSet::parse(&config.fixed_modifications)?;
        let variable = ModificationSet::parse(&config.variable_modifications)?;
        let table = MassTable::new(&fixed)?;
        let alphabet = ResidueAlphabet::new(&table, &config.residue_set, &variable)?;
        let scorer = IonScorer::new(config.ion_scoring_strategy);
        debug!(
            "Search alphabet has {} residues, lightest {:.4} Da",
            alphabet.len(),
            alphabet.min_mass()
        );

        Ok(Self {
            config,
            alphabet,
            scorer,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn alphabet(&self) -> &ResidueAlphabet {
        &self.alphabet
    }

    pub fn identify(&self, spectrum: &Spectrum) -> Result<Identification> {
        self.identify_with_complement(spectrum, None)
    }

    /// Sequences `spectrum`. A `complementary` spectrum of the same precursor,
    /// acquired with the other fragmentation chemistry, only takes part in
    /// the final rescoring.
    #[cfg_attr(
        feature = "instrumentation",
        tracing::instrument(skip_all, level = "trace")
    )]
    pub fn identify_with_complement(
        &self,
        spectrum: &Spectrum,
        complementary: Option<&Spectrum>,
    ) -> Result<Identification> {
        spectrum.validate()?;
        if let Some(other) = complementary {
            other.validate()?;
        }

        let start = Instant::now();
        let deadline = self.config.max_search_time().map(|budget| start + budget);
        let mut stats = SearchStats::default();

        let precursor_window = self
            .config
            .precursor_mass_tolerance
            .window(spectrum.precursor_mass);
        if spectrum.residue_span() < self.alphabet.min_mass() - precursor_window {
            debug!(
                "Precursor mass {:.4} is below the lightest residue, nothing to sequence",
                spectrum.precursor_mass
            );
            return Ok(Identification::empty(stats));
        }

        let tolerance = self.config.fragment_mass_tolerance;
        let builder = GraphBuilder::new(self.scorer, tolerance, self.alphabet.min_mass());
        let peaks = builder.index(spectrum)?;
        let mapping = builder.build_from_index(spectrum, &peaks);
        stats.num_nodes = mapping.len();
        stats.timings.graph = start.elapsed();

        let decomposition_start = Instant::now();
        let settings = DecomposerSettings {
            max_branching_factor: self.config.max_branching_factor,
            max_candidate_count: self.config.max_candidate_count,
            max_subscore_number: self.config.max_subscore_number,
            max_decomp_weight: self.config.max_decomp_weight,
            max_residues_per_decomp: self.config.max_residues_per_decomp,
            fragment_tolerance: tolerance,
            precursor_tolerance: self.config.precursor_mass_tolerance,
            deadline,
        };
        let outcome = Decomposer::new(&mapping, &self.alphabet, self.scorer, &peaks, settings).run();
        stats.raw_pool_size = outcome.candidates.len();
        stats.peak_pool_size = outcome.peak_pool_size;
        stats.truncation = outcome.truncation;
        stats.timings.decomposition = decomposition_start.elapsed();

        let reduction_start = Instant::now();
        let complementary_peaks = complementary.map(|other| PeakIndex::new(other, tolerance));
        let reducer = PermutationReducer::new(
            &self.alphabet,
            self.scorer.strategy(),
            self.config.top_k_permutations,
            self.config.tryptic_only,
        );
        let ranked = reducer.reduce(&outcome.candidates, &peaks, complementary_peaks.as_ref());
        let candidates = assemble(ranked, spectrum);
        stats.timings.reduction = reduction_start.elapsed();

        debug!(
            "Spectrum at {:.4} Da: {} nodes, {} raw candidates, {} reported in {:?}",
            spectrum.precursor_mass,
            stats.num_nodes,
            stats.raw_pool_size,
            candidates.len(),
            start.elapsed()
        );

        Ok(Identification { candidates, stats })
    }

    /// Groups spectra into search units.
    ///
    /// With `complementary_spectrum_enabled` consecutive spectra are read as
    /// (primary, complementary) pairs, an odd trailing spectrum is searched
    /// on its own.
    pub fn search_units<'s>(
        &self,
        spectra: &'s [Spectrum],
    ) -> Vec<(&'s Spectrum, Option<&'s Spectrum>)> {
        if self.config.complementary_spectrum_enabled {
            spectra
                .chunks(2)
                .map(|pair| (&pair[0], pair.get(1)))
                .collect()
        } else {
            spectra.iter().map(|s| (s, None)).collect()
        }
    }

    /// Searches every unit of `spectra` in parallel, one result per unit in
    /// input order.
    pub fn identify_all(&self, spectra: &[Spectrum]) -> Vec<Result<Identification>> {
        let start = Instant::now();
        let units = self.search_units(spectra);
        let results: Vec<Result<Identification>> = units
            .par_iter()
            .map(|&(spectrum, complementary)| self.identify_with_complement(spectrum, complementary))
            .collect();

        self.log_summary(&results, start);
        results
    }

    pub fn log_summary(&self, results: &[Result<Identification>], start: Instant) {
        let mut timings = SearchTimings::default();
        let mut num_failed = 0;
        let mut num_truncated = 0;
        let mut num_empty = 0;
        for result in results {
            match result {
                Ok(ident) => {
                    timings += ident.stats.timings;
                    if ident.stats.truncation.is_truncated() {
                        num_truncated += 1;
                    }
                    if ident.candidates.is_empty() {
                        num_empty += 1;
                    }
                }
                Err(_) => num_failed += 1,
            }
        }

        let elapsed = start.elapsed();
        let throughput = results.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        info!(
            "Searched {} spectra in {:?} ({:#.1}/s): {} failed, {} without candidates, {} truncated",
            results.len(),
            elapsed,
            throughput,
            num_failed,
            num_empty,
            num_truncated
        );
        info!("{:?}", timings);
    }
}
