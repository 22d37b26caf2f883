use super::peak_index::PeakIndex;
use crate::chemistry::constants::{
    C13_DELTA,
    CO,
    H2O,
    HYDROGEN,
    NH3,
    PROTON,
};
use serde::{
    Deserialize,
    Serialize,
};

const PRIMARY_WEIGHT: f64 = 1.0;
const COMPLEMENT_BONUS: f64 = 1.0;
const ISOTOPE_WEIGHT: f64 = 0.25;
const NEUTRAL_LOSS_WEIGHT: f64 = 0.2;
const RADICAL_WEIGHT: f64 = 0.3;

/// Fragmentation chemistry, decides which ion pair the graph is read with.
///
/// CID reads b/y ions, ETD reads c/z. ions. Picked once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FragmentationStrategy {
    #[default]
    #[serde(rename = "cid", alias = "CID")]
    Cid,
    #[serde(rename = "etd", alias = "ETD")]
    Etd,
}

impl FragmentationStrategy {
    /// The chemistry of the paired acquisition (CID <-> ETD).
    pub fn complementary(&self) -> Self {
        match self {
            Self::Cid => Self::Etd,
            Self::Etd => Self::Cid,
        }
    }

    /// m/z of the N-terminal ion minus its prefix residue mass.
    pub fn prefix_offset(&self) -> f64 {
        match self {
            Self::Cid => PROTON,
            Self::Etd => NH3 + PROTON,
        }
    }

    /// m/z of the C-terminal ion minus its suffix residue mass.
    pub fn suffix_offset(&self) -> f64 {
        match self {
            Self::Cid => H2O + PROTON,
            Self::Etd => H2O - NH3 + HYDROGEN + PROTON,
        }
    }

    /// `prefix_ion + suffix_ion = precursor_mass + complement_offset()`
    pub fn complement_offset(&self) -> f64 {
        self.prefix_offset() + self.suffix_offset() - H2O
    }
}

/// Which terminus a graph node was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IonType {
    Prefix,
    Suffix,
}

/// Flags recording what supported a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Evidence(u8);

impl Evidence {
    pub const PREFIX_ION: Evidence = Evidence(1);
    pub const SUFFIX_ION: Evidence = Evidence(1 << 1);
    pub const COMPLEMENT: Evidence = Evidence(1 << 2);
    pub const NEUTRAL_LOSS: Evidence = Evidence(1 << 3);
    pub const ISOTOPE: Evidence = Evidence(1 << 4);
    pub const RADICAL: Evidence = Evidence(1 << 5);
    pub const BOUNDARY: Evidence = Evidence(1 << 6);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, other: Evidence) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Evidence) {
        self.0 |= other.0;
    }

    pub fn union(self, other: Evidence) -> Evidence {
        Evidence(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IonScore {
    pub score: f64,
    pub evidence: Evidence,
}

impl IonScore {
    pub fn boundary() -> Self {
        Self {
            score: 1.0,
            evidence: Evidence::BOUNDARY,
        }
    }
}

/// Scores hypothesised cleavage positions against a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IonScorer {
    strategy: FragmentationStrategy,
}

impl IonScorer {
    pub fn new(strategy: FragmentationStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> FragmentationStrategy {
        self.strategy
    }

    /// Cleavage position implied by reading `mz` as an ion of `ion_type`.
    pub fn position_of(&self, mz: f64, ion_type: IonType, residue_span: f64) -> f64 {
        match ion_type {
            IonType::Prefix => mz - self.strategy.prefix_offset(),
            IonType::Suffix => residue_span - (mz - self.strategy.suffix_offset()),
        }
    }

    /// Scores a cleavage `position` (prefix residue mass) of a peptide whose
    /// residues sum to `residue_span`.
    ///
    /// The result is in `[0, 1)` and grows with every extra piece of evidence;
    /// a position seen from both termini always beats a one-sided one of the
    /// same intensity.
    pub fn score(&self, position: f64, residue_span: f64, peaks: &PeakIndex) -> IonScore {
        let prefix_mz = position + self.strategy.prefix_offset();
        let suffix_mz = (residue_span - position) + self.strategy.suffix_offset();

        let mut flags = Evidence::empty();
        let mut evidence = 0.0;
        let mut support = |mz: f64, weight: f64, flag: Evidence| -> bool {
            match peaks.relative_intensity(mz) {
                Some(rel) => {
                    evidence += weight * (0.5 + 0.5 * rel);
                    flags.insert(flag);
                    true
                }
                None => false,
            }
        };

        let has_prefix = support(prefix_mz, PRIMARY_WEIGHT, Evidence::PREFIX_ION);
        let has_suffix = support(suffix_mz, PRIMARY_WEIGHT, Evidence::SUFFIX_ION);
        if has_prefix {
            support(prefix_mz + C13_DELTA, ISOTOPE_WEIGHT, Evidence::ISOTOPE);
        }
        if has_suffix {
            support(suffix_mz + C13_DELTA, ISOTOPE_WEIGHT, Evidence::ISOTOPE);
        }

        match self.strategy {
            FragmentationStrategy::Cid => {
                support(prefix_mz - H2O, NEUTRAL_LOSS_WEIGHT, Evidence::NEUTRAL_LOSS);
                support(prefix_mz - NH3, NEUTRAL_LOSS_WEIGHT, Evidence::NEUTRAL_LOSS);
                support(prefix_mz - CO, NEUTRAL_LOSS_WEIGHT, Evidence::NEUTRAL_LOSS);
                support(suffix_mz - H2O, NEUTRAL_LOSS_WEIGHT, Evidence::NEUTRAL_LOSS);
                support(suffix_mz - NH3, NEUTRAL_LOSS_WEIGHT, Evidence::NEUTRAL_LOSS);
            }
            FragmentationStrategy::Etd => {
                // z' (hydrogen transfer) and c. (hydrogen loss) odd-electron partners
                support(suffix_mz + HYDROGEN, RADICAL_WEIGHT, Evidence::RADICAL);
                support(prefix_mz - HYDROGEN, RADICAL_WEIGHT, Evidence::RADICAL);
            }
        }

        if has_prefix && has_suffix {
            evidence += COMPLEMENT_BONUS;
            flags.insert(Evidence::COMPLEMENT);
        }

        IonScore {
            score: 1.0 - (-evidence).exp(),
            evidence: flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Peak,
        Spectrum,
    };

    const SPAN: f64 = 500.0;

    fn index(peaks: Vec<Peak>) -> PeakIndex {
        PeakIndex::new(&Spectrum::new(peaks, SPAN + H2O, 1), 0.02)
    }

    #[test]
    fn test_complement_offsets() {
        let cid = FragmentationStrategy::Cid;
        assert!((cid.complement_offset() - 2.0 * PROTON).abs() < 1e-12);
        let etd = FragmentationStrategy::Etd;
        assert!((etd.complement_offset() - (2.0 * PROTON + HYDROGEN)).abs() < 1e-12);
        assert_eq!(cid.complementary(), etd);
    }

    #[test]
    fn test_position_round_trip() {
        let scorer = IonScorer::new(FragmentationStrategy::Cid);
        let pos = 200.0;
        let b = pos + PROTON;
        let y = (SPAN - pos) + H2O + PROTON;
        assert!((scorer.position_of(b, IonType::Prefix, SPAN) - pos).abs() < 1e-9);
        assert!((scorer.position_of(y, IonType::Suffix, SPAN) - pos).abs() < 1e-9);
    }

    #[test]
    fn test_complement_beats_single_peak() {
        let scorer = IonScorer::new(FragmentationStrategy::Cid);
        let pos = 200.0;
        let b = pos + PROTON;
        let y = (SPAN - pos) + H2O + PROTON;

        let single = scorer.score(pos, SPAN, &index(vec![Peak::new(b, 100.0)]));
        let paired = scorer.score(
            pos,
            SPAN,
            &index(vec![Peak::new(b, 100.0), Peak::new(y, 100.0)]),
        );
        let nothing = scorer.score(pos, SPAN, &index(vec![Peak::new(50.0, 100.0)]));

        assert!(paired.score > single.score);
        assert!(single.score > nothing.score);
        assert_eq!(nothing.score, 0.0);
        assert!(paired.evidence.contains(Evidence::COMPLEMENT));
        assert!(!single.evidence.contains(Evidence::COMPLEMENT));
        assert!(paired.score < 1.0);
    }

    #[test]
    fn test_strategies_read_different_ions() {
        let pos = 200.0;
        let c = pos + NH3 + PROTON;
        let z = (SPAN - pos) + H2O - NH3 + HYDROGEN + PROTON;
        let peaks = index(vec![Peak::new(c, 100.0), Peak::new(z, 100.0)]);

        let etd = IonScorer::new(FragmentationStrategy::Etd).score(pos, SPAN, &peaks);
        let cid = IonScorer::new(FragmentationStrategy::Cid).score(pos, SPAN, &peaks);
        assert!(etd.evidence.contains(Evidence::COMPLEMENT));
        assert!(etd.score > cid.score);
    }

    #[test]
    fn test_neutral_loss_corroborates_cid() {
        let scorer = IonScorer::new(FragmentationStrategy::Cid);
        let pos = 200.0;
        let b = pos + PROTON;
        let plain = scorer.score(pos, SPAN, &index(vec![Peak::new(b, 100.0)]));
        let with_loss = scorer.score(
            pos,
            SPAN,
            &index(vec![Peak::new(b - H2O, 30.0), Peak::new(b, 100.0)]),
        );
        assert!(with_loss.score > plain.score);
        assert!(with_loss.evidence.contains(Evidence::NEUTRAL_LOSS));
    }
}
