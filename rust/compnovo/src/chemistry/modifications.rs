use super::constants::KNOWN_MODIFICATIONS;
use crate::errors::{
    InvalidInputError,
    Result,
};
use regex::Regex;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

static MODIFICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<name>[A-Za-z][A-Za-z0-9_\-]*)\s*\(\s*(?P<residue>[A-Z])\s*\)\s*$")
        .expect("modification regex is valid")
});

/// A residue-specific mass modification, written as `"Oxidation (M)"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modification {
    pub name: String,
    pub residue: char,
    pub delta: f64,
}

impl FromStr for Modification {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let unknown = || InvalidInputError::UnknownModification {
            name: s.to_string(),
        };
        let caps = MODIFICATION_RE.captures(s).ok_or_else(unknown)?;
        let name = &caps["name"];
        let residue = caps["residue"].chars().next().ok_or_else(unknown)?;
        let delta = KNOWN_MODIFICATIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, delta)| *delta)
            .ok_or_else(unknown)?;

        Ok(Self {
            name: name.to_string(),
            residue,
            delta,
        })
    }
}

impl Display for Modification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.residue)
    }
}

/// Set of modifications whose deltas add up on a single residue or peptide.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModificationSet {
    modifications: Vec<Modification>,
}

impl ModificationSet {
    pub fn new(modifications: Vec<Modification>) -> Self {
        Self { modifications }
    }

    /// Parses every entry, failing on the first unknown modification.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let modifications = names
            .iter()
            .map(|x| x.as_ref().parse::<Modification>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { modifications })
    }

    pub fn total_delta(&self) -> f64 {
        self.modifications.iter().map(|x| x.delta).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modification> {
        self.modifications.iter()
    }

    pub fn len(&self) -> usize {
        self.modifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}
