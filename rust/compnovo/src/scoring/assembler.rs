use crate::models::{
    PeptideCandidate,
    Permut,
    Spectrum,
};

/// Turns ranked permutations into the public candidate list.
///
/// Ranks are 1-based and follow the input order, the charge is the precursor
/// charge of `spectrum`. Nothing is filtered here.
pub fn assemble(ranked: Vec<Permut>, spectrum: &Spectrum) -> Vec<PeptideCandidate> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, permut)| PeptideCandidate {
            sequence: permut.sequence,
            score: permut.score,
            rank: (i + 1) as u32,
            charge: spectrum.precursor_charge,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permut(sequence: &str, score: f64) -> Permut {
        Permut {
            residues: Box::new([]),
            sequence: sequence.to_string(),
            score,
        }
    }

    #[test]
    fn test_ranks_are_one_based_and_ordered() {
        let spec = Spectrum::new(vec![], 500.0, 3);
        let out = assemble(vec![permut("AG", 5.0), permut("GA", 3.0)], &spec);
        assert_eq!(
            out,
            vec![
                PeptideCandidate {
                    sequence: "AG".to_string(),
                    score: 5.0,
                    rank: 1,
                    charge: 3,
                },
                PeptideCandidate {
                    sequence: "GA".to_string(),
                    score: 3.0,
                    rank: 2,
                    charge: 3,
                },
            ]
        );
    }

    #[test]
    fn test_empty_in_empty_out() {
        let spec = Spectrum::new(vec![], 500.0, 1);
        assert!(assemble(Vec::new(), &spec).is_empty());
    }
}
