const LNFACT_TABLE_SIZE: usize = 64;

/// Natural log of `n!`.
///
/// Exact summation below 64, Stirling's series above that.
///
/// Example:
/// ```
/// use compnovo::utils::math::lnfact;
/// assert!((lnfact(5) - 120f64.ln()).abs() < 1e-12);
/// assert_eq!(lnfact(0), 0.0);
/// ```
pub fn lnfact(n: u16) -> f64 {
    if (n as usize) < LNFACT_TABLE_SIZE {
        (2..=n).map(|i| (i as f64).ln()).sum()
    } else {
        let n = n as f64;
        n * n.ln() - n + 0.5 * (2.0 * std::f64::consts::PI * n).ln() + 1.0 / (12.0 * n)
    }
}
