pub mod chemistry;
pub mod config;
pub mod decomposer;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod models;
pub mod scoring;
pub mod utils;

pub use config::SearchConfig;
pub use engine::{
    CompNovo,
    Identification,
    SearchStats,
};
pub use errors::{
    CompNovoError,
    InvalidInputError,
};
pub use models::{
    MassTolerance,
    Peak,
    PeptideCandidate,
    Spectrum,
};
pub use scoring::FragmentationStrategy;
