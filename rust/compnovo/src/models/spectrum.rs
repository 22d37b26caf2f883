use crate::chemistry::constants::{
    H2O,
    PROTON,
};
use crate::errors::{
    InvalidInputError,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A single observed, singly charged fragment peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }

    fn is_finite_positive(&self) -> bool {
        self.mz.is_finite() && self.intensity.is_finite() && self.mz > 0.0 && self.intensity > 0.0
    }
}

/// A deisotoped, charge reduced fragment spectrum.
///
/// `precursor_mass` is the neutral monoisotopic mass of the intact peptide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    peaks: Vec<Peak>,
    pub precursor_mass: f64,
    pub precursor_charge: u8,
}

impl Spectrum {
    /// Peaks are sorted by m/z on construction.
    pub fn new(mut peaks: Vec<Peak>, precursor_mass: f64, precursor_charge: u8) -> Self {
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self {
            peaks,
            precursor_mass,
            precursor_charge,
        }
    }

    /// Builds a spectrum from a precursor m/z as reported by the instrument.
    pub fn from_precursor_mz(peaks: Vec<Peak>, precursor_mz: f64, precursor_charge: u8) -> Self {
        let mass = (precursor_mz - PROTON) * precursor_charge as f64;
        Self::new(peaks, mass, precursor_charge)
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Summed residue mass of the peptide (precursor minus the termini water).
    pub fn residue_span(&self) -> f64 {
        self.precursor_mass - H2O
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.precursor_mass.is_finite() && self.precursor_mass > 0.0) {
            return Err(InvalidInputError::NonPositivePrecursorMass {
                mass: self.precursor_mass,
            }
            .into());
        }
        if self.precursor_charge == 0 {
            return Err(InvalidInputError::InvalidPrecursorCharge {
                charge: self.precursor_charge,
            }
            .into());
        }
        Ok(())
    }

    /// Peaks that can carry sequence information: finite, positive and not
    /// heavier than the singly protonated precursor.
    pub fn usable_peaks(&self, tolerance: f64) -> Vec<Peak> {
        let upper = self.precursor_mass + 2.0 * PROTON + tolerance;
        self.peaks
            .iter()
            .filter(|p| p.is_finite_positive() && p.mz <= upper)
            .copied()
            .collect()
    }
}
