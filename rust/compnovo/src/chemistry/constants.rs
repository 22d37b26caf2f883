// Monoisotopic masses in Daltons.
pub const PROTON: f64 = 1.007276466621;
pub const HYDROGEN: f64 = 1.00782503207;
pub const H2O: f64 = 18.0105646863;
pub const NH3: f64 = 17.0265491015;
pub const CO: f64 = 27.9949146221;
/// Mass shift between the monoisotopic peak and the first isotope peak.
pub const C13_DELTA: f64 = 1.0033548378;

/// One-letter codes and monoisotopic residue masses of the standard amino acids.
pub const STANDARD_RESIDUES: [(char, f64); 20] = [
    ('A', 71.037114),
    ('R', 156.101111),
    ('N', 114.042927),
    ('D', 115.026943),
    ('C', 103.009185),
    ('E', 129.042593),
    ('Q', 128.058578),
    ('G', 57.021464),
    ('H', 137.058912),
    ('I', 113.084064),
    ('L', 113.084064),
    ('K', 128.094963),
    ('M', 131.040485),
    ('F', 147.068414),
    ('P', 97.052764),
    ('S', 87.032028),
    ('T', 101.047679),
    ('W', 186.079313),
    ('Y', 163.06332),
    ('V', 99.068414),
];

/// Modifications that can be named in a configuration, with their mass delta.
pub const KNOWN_MODIFICATIONS: [(&str, f64); 6] = [
    ("Carbamidomethyl", 57.021464),
    ("Oxidation", 15.994915),
    ("Phospho", 79.966331),
    ("Deamidated", 0.984016),
    ("Acetyl", 42.010565),
    ("Methyl", 14.015650),
];
