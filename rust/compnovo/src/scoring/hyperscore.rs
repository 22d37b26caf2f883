use super::ion_series::{
    IonSeriesTerminality,
    TheoreticalIon,
};
use super::peak_index::PeakIndex;
use crate::utils::math::lnfact;

/// Scaling applied to relative intensities so the log term is not swamped by
/// the factorial terms.
const INTENSITY_SCALE: f64 = 100.0;

/// Hyperscore of a theoretical fragment list against observed peaks.
///
/// `ln(1 + scale * (Sum Intensity N + Sum Intensity C)) + ln(Nn!) + ln(Nc!)`
///
/// Only primary ions add to the counts, satellites (neutral losses, immonium,
/// z') add their weighted intensity.
///
/// Example:
/// ```
/// use compnovo::models::{Peak, Spectrum};
/// use compnovo::scoring::{PeakIndex, TheoreticalIon, IonSeriesTerminality, hyperscore::single_hyperscore};
///
/// let spec = Spectrum::new(vec![Peak::new(100.0, 50.0), Peak::new(200.0, 100.0)], 500.0, 1);
/// let peaks = PeakIndex::new(&spec, 0.02);
/// let ions = vec![
///     TheoreticalIon { mz: 100.0, terminality: IonSeriesTerminality::NTerm, weight: 1.0 },
///     TheoreticalIon { mz: 200.0, terminality: IonSeriesTerminality::CTerm, weight: 1.0 },
/// ];
/// let score = single_hyperscore(&ions, &peaks);
/// assert!((score - 151f64.ln()).abs() < 1e-9);
/// ```
pub fn single_hyperscore(ions: &[TheoreticalIon], peaks: &PeakIndex) -> f64 {
    let mut nt_count: u16 = 0;
    let mut ct_count: u16 = 0;
    let mut summed = 0.0;

    for ion in ions {
        let Some(rel) = peaks.relative_intensity(ion.mz) else {
            continue;
        };
        summed += rel * ion.weight;
        if !ion.is_primary() {
            continue;
        }
        match ion.terminality {
            IonSeriesTerminality::NTerm => nt_count = nt_count.saturating_add(1),
            IonSeriesTerminality::CTerm => ct_count = ct_count.saturating_add(1),
            IonSeriesTerminality::None => {}
        }
    }

    let score = (INTENSITY_SCALE * summed).ln_1p() + lnfact(nt_count) + lnfact(ct_count);
    if score.is_finite() { score } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Peak,
        Spectrum,
    };

    fn peaks() -> PeakIndex {
        let spec = Spectrum::new(
            vec![
                Peak::new(100.0, 100.0),
                Peak::new(150.0, 100.0),
                Peak::new(300.0, 100.0),
            ],
            1000.0,
            1,
        );
        PeakIndex::new(&spec, 0.02)
    }

    fn nterm(mz: f64) -> TheoreticalIon {
        TheoreticalIon {
            mz,
            terminality: IonSeriesTerminality::NTerm,
            weight: 1.0,
        }
    }

    #[test]
    fn test_no_matches_is_zero() {
        assert_eq!(single_hyperscore(&[nterm(500.0)], &peaks()), 0.0);
        assert_eq!(single_hyperscore(&[], &peaks()), 0.0);
    }

    #[test]
    fn test_more_matches_score_higher() {
        let one = single_hyperscore(&[nterm(100.0)], &peaks());
        let two = single_hyperscore(&[nterm(100.0), nterm(150.0)], &peaks());
        let three = single_hyperscore(&[nterm(100.0), nterm(150.0), nterm(300.0)], &peaks());
        assert!(one < two);
        assert!(two < three);
    }

    #[test]
    fn test_satellites_do_not_count() {
        let satellite = TheoreticalIon {
            mz: 150.0,
            terminality: IonSeriesTerminality::NTerm,
            weight: 0.2,
        };
        let with_sat = single_hyperscore(&[nterm(100.0), satellite], &peaks());
        let expected = (100.0f64 * 1.2).ln_1p();
        assert!((with_sat - expected).abs() < 1e-9);
    }
}
