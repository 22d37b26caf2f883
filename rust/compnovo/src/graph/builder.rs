use super::node_mapping::{
    MassNode,
    NodeMapping,
};
use crate::errors::{
    InvalidInputError,
    Result,
};
use crate::models::Spectrum;
use crate::scoring::{
    IonScore,
    IonScorer,
    IonType,
    PeakIndex,
};
use tracing::debug;

pub const MIN_USABLE_PEAKS: usize = 2;

/// Turns a spectrum into a scored [`NodeMapping`].
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    scorer: IonScorer,
    tolerance: f64,
    min_residue_mass: f64,
}

impl GraphBuilder {
    pub fn new(scorer: IonScorer, tolerance: f64, min_residue_mass: f64) -> Self {
        Self {
            scorer,
            tolerance,
            min_residue_mass,
        }
    }

    /// Reads every usable peak as both a prefix and a suffix ion, scores the
    /// implied cleavage positions and merges them. Boundary nodes sit at 0
    /// and at the full residue span.
    pub fn build(&self, spectrum: &Spectrum) -> Result<NodeMapping> {
        let peaks = self.index(spectrum)?;
        Ok(self.build_from_index(spectrum, &peaks))
    }

    /// Validates `spectrum` and indexes its usable peaks, of which there
    /// must be at least [`MIN_USABLE_PEAKS`].
    pub fn index(&self, spectrum: &Spectrum) -> Result<PeakIndex> {
        spectrum.validate()?;
        let peaks = PeakIndex::new(spectrum, self.tolerance);
        if peaks.len() < MIN_USABLE_PEAKS {
            return Err(InvalidInputError::InsufficientPeaks {
                usable: peaks.len(),
                required: MIN_USABLE_PEAKS,
            }
            .into());
        }
        Ok(peaks)
    }

    pub fn build_from_index(&self, spectrum: &Spectrum, peaks: &PeakIndex) -> NodeMapping {
        let span = spectrum.residue_span();
        // A cleavage site has at least one residue on both sides
        let low = (self.min_residue_mass - self.tolerance).max(self.tolerance);
        let high = span - low;

        let mut candidates = Vec::with_capacity(peaks.len() * 2 + 2);
        candidates.push(boundary(0.0, IonType::Prefix));
        if span > self.tolerance {
            candidates.push(boundary(span, IonType::Suffix));
        }

        for peak in peaks.peaks() {
            for ion_type in [IonType::Prefix, IonType::Suffix] {
                let position = self.scorer.position_of(peak.mz, ion_type, span);
                if position < low || position > high {
                    continue;
                }
                let score = self.scorer.score(position, span, peaks);
                candidates.push(MassNode {
                    mass: position,
                    score,
                    ion_type,
                    support: 1,
                });
            }
        }

        let num_candidates = candidates.len();
        let mapping = NodeMapping::from_candidates(candidates, self.tolerance);
        debug!(
            "Built mass graph with {} nodes from {} peaks ({} readings)",
            mapping.len(),
            peaks.len(),
            num_candidates,
        );
        mapping
    }
}

fn boundary(mass: f64, ion_type: IonType) -> MassNode {
    MassNode {
        mass,
        score: IonScore::boundary(),
        ion_type,
        support: 1,
    }
}
