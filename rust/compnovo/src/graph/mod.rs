//! Mass graph: scored cleavage positions of one spectrum.

mod builder;
mod node_mapping;

pub use builder::{
    GraphBuilder,
    MIN_USABLE_PEAKS,
};
pub use node_mapping::{
    MassNode,
    NodeMapping,
};
