use crate::models::{
    Peak,
    Spectrum,
};

/// Sorted, filtered peaks of one spectrum with tolerance-aware lookup.
#[derive(Debug, Clone)]
pub struct PeakIndex {
    peaks: Vec<Peak>,
    max_intensity: f64,
    tolerance: f64,
}

impl PeakIndex {
    pub fn new(spectrum: &Spectrum, tolerance: f64) -> Self {
        Self::from_peaks(spectrum.usable_peaks(tolerance), tolerance)
    }

    /// `peaks` must be sorted by m/z.
    pub fn from_peaks(peaks: Vec<Peak>, tolerance: f64) -> Self {
        let max_intensity = peaks.iter().map(|p| p.intensity).fold(0.0, f64::max);
        Self {
            peaks,
            max_intensity,
            tolerance,
        }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Peaks within the fragment tolerance of `mz`.
    pub fn within(&self, mz: f64) -> &[Peak] {
        let start = self.peaks.partition_point(|p| p.mz < mz - self.tolerance);
        let end = start + self.peaks[start..].partition_point(|p| p.mz <= mz + self.tolerance);
        &self.peaks[start..end]
    }

    /// Relative intensity (0, 1] of the strongest peak near `mz`, if any.
    pub fn relative_intensity(&self, mz: f64) -> Option<f64> {
        if self.max_intensity <= 0.0 {
            return None;
        }
        self.within(mz)
            .iter()
            .map(|p| p.intensity)
            .reduce(f64::max)
            .map(|x| x / self.max_intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PeakIndex {
        let spec = Spectrum::new(
            vec![
                Peak::new(100.0, 10.0),
                Peak::new(100.1, 40.0),
                Peak::new(200.0, 20.0),
            ],
            1000.0,
            1,
        );
        PeakIndex::new(&spec, 0.15)
    }

    #[test]
    fn test_within_window() {
        let idx = index();
        assert_eq!(idx.within(100.05).len(), 2);
        assert_eq!(idx.within(200.1).len(), 1);
        assert!(idx.within(150.0).is_empty());
    }

    #[test]
    fn test_relative_intensity_uses_strongest() {
        let idx = index();
        assert_eq!(idx.relative_intensity(100.0), Some(1.0));
        assert_eq!(idx.relative_intensity(200.0), Some(0.5));
        assert_eq!(idx.relative_intensity(300.0), None);
    }
}
