pub mod assembler;
pub mod hyperscore;
mod ion_scorer;
mod ion_series;
mod peak_index;
pub mod reducer;
pub mod timings;

pub use assembler::assemble;
pub use ion_scorer::{
    Evidence,
    FragmentationStrategy,
    IonScore,
    IonScorer,
    IonType,
};
pub use ion_series::{
    IonSeriesTerminality,
    TheoreticalIon,
    theoretical_ions,
};
pub use peak_index::PeakIndex;
pub use reducer::PermutationReducer;
pub use timings::SearchTimings;
