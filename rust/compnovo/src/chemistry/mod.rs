mod alphabet;
pub mod constants;
mod mass_table;
mod modifications;

pub use alphabet::{
    Residue,
    ResidueAlphabet,
    ResidueId,
};
pub use mass_table::MassTable;
pub use modifications::{
    Modification,
    ModificationSet,
};
