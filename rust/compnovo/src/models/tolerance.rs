use serde::{
    Deserialize,
    Serialize,
};

/// Mass tolerance, either a fixed window in Daltons or relative in ppm.
///
/// Convention: the value is the half-width of a symmetric window, so a
/// tolerance of `Absolute(0.5)` on a mass of 100 means the range (99.5, 100.5).
///
/// Example:
/// ```
/// use compnovo::models::MassTolerance;
///
/// let tol: MassTolerance = serde_json::from_str(r#"{"ppm": 10.0}"#).unwrap();
/// assert_eq!(tol, MassTolerance::Ppm(10.0));
/// assert!((tol.window(1000.0) - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MassTolerance {
    #[serde(rename = "da")]
    Absolute(f64),
    #[serde(rename = "ppm")]
    Ppm(f64),
}

impl Default for MassTolerance {
    fn default() -> Self {
        MassTolerance::Ppm(10.0)
    }
}

impl MassTolerance {
    /// Half-width of the window around `mass`, in Daltons.
    pub fn window(&self, mass: f64) -> f64 {
        match self {
            MassTolerance::Absolute(da) => *da,
            MassTolerance::Ppm(ppm) => mass.abs() * ppm / 1e6,
        }
    }

    pub fn contains(&self, expected: f64, observed: f64) -> bool {
        (expected - observed).abs() <= self.window(expected)
    }

    pub fn is_valid(&self) -> bool {
        let value = match self {
            MassTolerance::Absolute(x) => *x,
            MassTolerance::Ppm(x) => *x,
        };
        value.is_finite() && value > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_window() {
        let tol = MassTolerance::Absolute(0.02);
        assert_eq!(tol.window(10.0), 0.02);
        assert_eq!(tol.window(5000.0), 0.02);
        assert!(tol.contains(100.0, 100.019));
        assert!(!tol.contains(100.0, 100.021));
    }

    #[test]
    fn test_ppm_window_scales() {
        let tol = MassTolerance::Ppm(20.0);
        assert!((tol.window(500.0) - 0.01).abs() < 1e-12);
        assert!((tol.window(2000.0) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_validity() {
        assert!(MassTolerance::Absolute(0.1).is_valid());
        assert!(!MassTolerance::Absolute(0.0).is_valid());
        assert!(!MassTolerance::Ppm(f64::NAN).is_valid());
    }

    #[test]
    fn test_serde_names() {
        let da = serde_json::to_string(&MassTolerance::Absolute(0.3)).unwrap();
        assert_eq!(da, r#"{"da":0.3}"#);
    }
}
