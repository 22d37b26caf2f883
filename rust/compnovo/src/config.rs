use crate::errors::{
    CompNovoError,
    Result,
};
use crate::models::MassTolerance;
use crate::scoring::FragmentationStrategy;
use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;

pub const DEFAULT_RESIDUE_SET: &str = "ACDEFGHKLMNPQRSTVWY";

/// Search parameters, read-only once a search starts.
///
/// Every field has a default, so `{}` is a valid configuration.
///
/// ```
/// use compnovo::config::SearchConfig;
/// use compnovo::models::MassTolerance;
///
/// let config: SearchConfig =
///     serde_json::from_str(r#"{"precursor_mass_tolerance": {"da": 0.05}, "top_k_permutations": 5}"#)
///         .unwrap();
/// assert_eq!(config.precursor_mass_tolerance, MassTolerance::Absolute(0.05));
/// assert_eq!(config.top_k_permutations, 5);
/// assert_eq!(config.max_branching_factor, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub precursor_mass_tolerance: MassTolerance,
    /// Absolute, in Da.
    pub fragment_mass_tolerance: f64,
    pub ion_scoring_strategy: FragmentationStrategy,
    pub max_branching_factor: usize,
    pub max_candidate_count: usize,
    /// Candidates kept per sub-interval of the decomposition.
    pub max_subscore_number: usize,
    pub top_k_permutations: usize,
    /// `"<Name> (<Residue>)"`, e.g. `"Carbamidomethyl (C)"`.
    pub fixed_modifications: Vec<String>,
    pub variable_modifications: Vec<String>,
    pub complementary_spectrum_enabled: bool,
    pub residue_set: String,
    /// Widest gap (Da) decomposed directly into residue compositions.
    pub max_decomp_weight: f64,
    pub max_residues_per_decomp: usize,
    pub max_search_time_ms: Option<u64>,
    pub tryptic_only: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            precursor_mass_tolerance: MassTolerance::default(),
            fragment_mass_tolerance: 0.3,
            ion_scoring_strategy: FragmentationStrategy::Cid,
            max_branching_factor: 7,
            max_candidate_count: 10_000,
            max_subscore_number: 100,
            top_k_permutations: 20,
            fixed_modifications: Vec::new(),
            variable_modifications: Vec::new(),
            complementary_spectrum_enabled: false,
            residue_set: DEFAULT_RESIDUE_SET.to_string(),
            max_decomp_weight: 450.0,
            max_residues_per_decomp: 4,
            max_search_time_ms: None,
            tryptic_only: false,
        }
    }
}

impl SearchConfig {
    pub fn max_search_time(&self) -> Option<Duration> {
        self.max_search_time_ms.map(Duration::from_millis)
    }

    /// Checks ranges. Residues and modifications are checked when the engine
    /// resolves them.
    pub fn validate(&self) -> Result<()> {
        if !self.precursor_mass_tolerance.is_valid() {
            return Err(CompNovoError::config(
                "precursor_mass_tolerance",
                format!("must be finite and positive, got {:?}", self.precursor_mass_tolerance),
            ));
        }
        if !(self.fragment_mass_tolerance.is_finite() && self.fragment_mass_tolerance > 0.0) {
            return Err(CompNovoError::config(
                "fragment_mass_tolerance",
                format!("must be finite and positive, got {}", self.fragment_mass_tolerance),
            ));
        }
        let counts = [
            ("max_branching_factor", self.max_branching_factor),
            ("max_candidate_count", self.max_candidate_count),
            ("max_subscore_number", self.max_subscore_number),
            ("top_k_permutations", self.top_k_permutations),
            ("max_residues_per_decomp", self.max_residues_per_decomp),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(CompNovoError::config(field, "must be at least 1"));
            }
        }
        if !(self.max_decomp_weight.is_finite() && self.max_decomp_weight >= 0.0) {
            return Err(CompNovoError::config(
                "max_decomp_weight",
                format!("must be finite and non-negative, got {}", self.max_decomp_weight),
            ));
        }
        Ok(())
    }
}
