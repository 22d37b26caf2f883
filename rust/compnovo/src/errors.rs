use thiserror::Error;

/// Input or configuration contract violations.
///
/// These stop the processing of the spectrum (or the construction of the
/// engine) they were raised for, the caller decides whether to skip or abort.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("Precursor mass must be positive, got {mass}")]
    NonPositivePrecursorMass { mass: f64 },
    #[error("Precursor charge must be at least 1, got {charge}")]
    InvalidPrecursorCharge { charge: u8 },
    #[error("Expected at least {required} usable peaks, found {usable}")]
    InsufficientPeaks { usable: usize, required: usize },
    #[error("Unknown residue symbol '{symbol}'")]
    UnknownResidue { symbol: char },
    #[error("Unknown modification '{name}'")]
    UnknownModification { name: String },
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompNovoError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl CompNovoError {
    pub fn config(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidInput(InvalidInputError::InvalidConfiguration {
            field,
            reason: reason.to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, CompNovoError>;
