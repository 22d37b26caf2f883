use super::ion_scorer::FragmentationStrategy;
use crate::chemistry::constants::{
    CO,
    H2O,
    HYDROGEN,
    PROTON,
};
use crate::chemistry::{
    ResidueAlphabet,
    ResidueId,
};

/// Refers to what terminus of the peptide retains the charge after a
/// fragmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IonSeriesTerminality {
    NTerm,
    CTerm,
    /// Immonium and other internal ions
    None,
}

/// Theoretical singly charged fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheoreticalIon {
    pub mz: f64,
    pub terminality: IonSeriesTerminality,
    /// 1.0 for the backbone series the chemistry produces, lower for satellites.
    pub weight: f64,
}

impl TheoreticalIon {
    pub fn is_primary(&self) -> bool {
        self.weight >= 1.0
    }
}

const SATELLITE_WEIGHT: f64 = 0.2;
const IMMONIUM_WEIGHT: f64 = 0.1;
const Z_PRIME_WEIGHT: f64 = 0.3;

/// Generates the theoretical fragments of a candidate for one chemistry.
///
/// CID: b, y, b-H2O, y-H2O, a and immonium ions.
/// ETD: c, z. and z' ions; no N-Calpha cleavage N-terminal to proline.
pub fn theoretical_ions(
    residues: &[ResidueId],
    alphabet: &ResidueAlphabet,
    strategy: FragmentationStrategy,
) -> Vec<TheoreticalIon> {
    let span = alphabet.sequence_mass(residues);
    let prefix_offset = strategy.prefix_offset();
    let suffix_offset = strategy.suffix_offset();
    let mut out = Vec::with_capacity(residues.len() * 6);

    let mut prefix = 0.0;
    for (i, &r) in residues.iter().enumerate().take(residues.len().saturating_sub(1)) {
        prefix += alphabet.mass(r);
        let suffix = span - prefix;
        let nterm = prefix + prefix_offset;
        let cterm = suffix + suffix_offset;

        match strategy {
            FragmentationStrategy::Cid => {
                out.push(ion(nterm, IonSeriesTerminality::NTerm, 1.0));
                out.push(ion(cterm, IonSeriesTerminality::CTerm, 1.0));
                out.push(ion(nterm - H2O, IonSeriesTerminality::NTerm, SATELLITE_WEIGHT));
                out.push(ion(cterm - H2O, IonSeriesTerminality::CTerm, SATELLITE_WEIGHT));
                out.push(ion(nterm - CO, IonSeriesTerminality::NTerm, SATELLITE_WEIGHT));
            }
            FragmentationStrategy::Etd => {
                let next = alphabet.get(residues[i + 1]);
                if next.symbol == 'P' {
                    continue;
                }
                out.push(ion(nterm, IonSeriesTerminality::NTerm, 1.0));
                out.push(ion(cterm, IonSeriesTerminality::CTerm, 1.0));
                out.push(ion(cterm + HYDROGEN, IonSeriesTerminality::CTerm, Z_PRIME_WEIGHT));
            }
        }
    }

    if strategy == FragmentationStrategy::Cid {
        let mut seen: Vec<ResidueId> = Vec::new();
        for &r in residues {
            if seen.contains(&r) {
                continue;
            }
            seen.push(r);
            out.push(ion(
                alphabet.mass(r) - CO + PROTON,
                IonSeriesTerminality::None,
                IMMONIUM_WEIGHT,
            ));
        }
    }

    out
}

fn ion(mz: f64, terminality: IonSeriesTerminality, weight: f64) -> TheoreticalIon {
    TheoreticalIon {
        mz,
        terminality,
        weight,
    }
}
