mod candidate;
mod spectrum;
mod tolerance;

pub use candidate::{
    Decomposition,
    PeptideCandidate,
    Permut,
};
pub use spectrum::{
    Peak,
    Spectrum,
};
pub use tolerance::MassTolerance;
