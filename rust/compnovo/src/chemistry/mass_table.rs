use super::constants::STANDARD_RESIDUES;
use super::modifications::ModificationSet;
use crate::errors::{
    InvalidInputError,
    Result,
};
use std::collections::HashMap;

/// Residue mass lookup with fixed modifications already folded in.
///
/// Read only once built, so it can be shared freely across threads.
///
/// Example:
/// ```
/// use compnovo::chemistry::{MassTable, ModificationSet};
///
/// let table = MassTable::new(&ModificationSet::default()).unwrap();
/// assert_eq!(table.mass_of('G').unwrap(), 57.021464);
/// assert!(table.mass_of('B').is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MassTable {
    masses: HashMap<char, f64>,
}

impl MassTable {
    pub fn new(fixed_modifications: &ModificationSet) -> Result<Self> {
        let mut masses: HashMap<char, f64> = STANDARD_RESIDUES.iter().copied().collect();
        for modification in fixed_modifications.iter() {
            let mass = masses
                .get_mut(&modification.residue)
                .ok_or(InvalidInputError::UnknownResidue {
                    symbol: modification.residue,
                })?;
            *mass += modification.delta;
        }

        Ok(Self { masses })
    }

    /// Residue mass including any fixed modification on that residue.
    pub fn mass_of(&self, symbol: char) -> Result<f64> {
        self.masses
            .get(&symbol)
            .copied()
            .ok_or(InvalidInputError::UnknownResidue { symbol }.into())
    }

    pub fn apply_modifications(&self, base_mass: f64, modifications: &ModificationSet) -> f64 {
        base_mass + modifications.total_delta()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.masses.contains_key(&symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompNovoError;

    #[test]
    fn test_fixed_modification_shifts_residue() {
        let fixed = ModificationSet::parse(&["Carbamidomethyl (C)"]).unwrap();
        let table = MassTable::new(&fixed).unwrap();
        let cys = table.mass_of('C').unwrap();
        assert!((cys - (103.009185 + 57.021464)).abs() < 1e-9);
        // Other residues are untouched
        assert_eq!(table.mass_of('A').unwrap(), 71.037114);
    }

    #[test]
    fn test_unknown_residue() {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        let err = table.mass_of('Z').unwrap_err();
        assert_eq!(
            err,
            CompNovoError::InvalidInput(InvalidInputError::UnknownResidue { symbol: 'Z' })
        );
    }

    #[test]
    fn test_apply_modifications() {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        let mods = ModificationSet::parse(&["Oxidation (M)"]).unwrap();
        let met = table.mass_of('M').unwrap();
        let oxidized = table.apply_modifications(met, &mods);
        assert!((oxidized - 147.0354).abs() < 1e-3);
        assert_eq!(table.apply_modifications(met, &ModificationSet::default()), met);
    }
}
