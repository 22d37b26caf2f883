use super::mass_table::MassTable;
use super::modifications::{
    Modification,
    ModificationSet,
};
use crate::errors::{
    InvalidInputError,
    Result,
};

/// Index of a residue inside a [`ResidueAlphabet`].
pub type ResidueId = u8;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub symbol: char,
    pub modification: Option<Modification>,
    pub mass: f64,
}

impl Residue {
    fn push_to(&self, out: &mut String) {
        out.push(self.symbol);
        if let Some(m) = &self.modification {
            out.push('(');
            out.push_str(&m.name);
            out.push(')');
        }
    }
}

/// The residues the search is allowed to place, sorted by mass.
///
/// Variably modified residues are extra entries, so a sequence is just a
/// slice of [`ResidueId`]s.
#[derive(Debug, Clone)]
pub struct ResidueAlphabet {
    residues: Vec<Residue>,
}

impl ResidueAlphabet {
    pub fn new(
        table: &MassTable,
        residue_set: &str,
        variable_modifications: &ModificationSet,
    ) -> Result<Self> {
        let mut residues: Vec<Residue> = Vec::new();
        for symbol in residue_set.chars().filter(|c| !c.is_whitespace()) {
            if residues.iter().any(|r| r.symbol == symbol) {
                continue;
            }
            residues.push(Residue {
                symbol,
                modification: None,
                mass: table.mass_of(symbol)?,
            });
        }

        for modification in variable_modifications.iter() {
            if !table.contains(modification.residue) {
                return Err(InvalidInputError::UnknownResidue {
                    symbol: modification.residue,
                }
                .into());
            }
            let base = table.mass_of(modification.residue)?;
            residues.push(Residue {
                symbol: modification.residue,
                modification: Some(modification.clone()),
                mass: table.apply_modifications(
                    base,
                    &ModificationSet::new(vec![modification.clone()]),
                ),
            });
        }

        if residues.is_empty() {
            return Err(InvalidInputError::InvalidConfiguration {
                field: "residue_set",
                reason: "no residues to search with".to_string(),
            }
            .into());
        }
        if residues.len() > ResidueId::MAX as usize {
            return Err(InvalidInputError::InvalidConfiguration {
                field: "residue_set",
                reason: format!("too many residues ({})", residues.len()),
            }
            .into());
        }

        residues.sort_by(|a, b| {
            a.mass
                .total_cmp(&b.mass)
                .then_with(|| a.symbol.cmp(&b.symbol))
                .then_with(|| a.modification.is_some().cmp(&b.modification.is_some()))
        });

        Ok(Self { residues })
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn get(&self, id: ResidueId) -> &Residue {
        &self.residues[id as usize]
    }

    pub fn mass(&self, id: ResidueId) -> f64 {
        self.residues[id as usize].mass
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues
            .iter()
            .enumerate()
            .map(|(i, r)| (i as ResidueId, r))
    }

    pub fn min_mass(&self) -> f64 {
        self.residues[0].mass
    }

    pub fn sequence_mass(&self, residues: &[ResidueId]) -> f64 {
        residues.iter().map(|&r| self.mass(r)).sum()
    }

    /// Renders a sequence, modified residues as `M(Oxidation)`.
    pub fn render(&self, residues: &[ResidueId]) -> String {
        let mut out = String::with_capacity(residues.len());
        for &r in residues {
            self.get(r).push_to(&mut out);
        }
        out
    }

    /// Residues whose mass matches `mass` within `tolerance`, lightest first.
    pub fn matching(&self, mass: f64, tolerance: f64) -> impl Iterator<Item = ResidueId> + '_ {
        let start = self
            .residues
            .partition_point(|r| r.mass < mass - tolerance);
        self.residues[start..]
            .iter()
            .take_while(move |r| r.mass <= mass + tolerance)
            .enumerate()
            .map(move |(i, _)| (start + i) as ResidueId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet(residues: &str, variable: &[&str]) -> ResidueAlphabet {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        let var = ModificationSet::parse(variable).unwrap();
        ResidueAlphabet::new(&table, residues, &var).unwrap()
    }

    #[test]
    fn test_sorted_by_mass() {
        let alpha = alphabet("WAG", &[]);
        let symbols: String = alpha.iter().map(|(_, r)| r.symbol).collect();
        assert_eq!(symbols, "GAW");
        assert_eq!(alpha.min_mass(), 57.021464);
    }

    #[test]
    fn test_variable_modification_adds_entry() {
        let alpha = alphabet("AM", &["Oxidation (M)"]);
        assert_eq!(alpha.len(), 3);
        let last = alpha.len() as ResidueId - 1;
        assert_eq!(alpha.render(&[0, last]), "AM(Oxidation)");
    }

    #[test]
    fn test_matching_within_tolerance() {
        let alpha = alphabet("ACDEFGHKLMNPQRSTVWY", &[]);
        let found: Vec<char> = alpha
            .matching(128.07, 0.05)
            .map(|id| alpha.get(id).symbol)
            .collect();
        assert_eq!(found, vec!['Q', 'K']);
        assert_eq!(alpha.matching(50.0, 0.5).count(), 0);
    }

    #[test]
    fn test_unknown_residue_in_set() {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        let out = ResidueAlphabet::new(&table, "AGX", &ModificationSet::default());
        assert!(out.is_err());
    }
}
