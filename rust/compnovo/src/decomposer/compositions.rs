use crate::chemistry::{
    ResidueAlphabet,
    ResidueId,
};

/// Calls `emit` with every residue multiset (ids ascending) of at most
/// `max_residues` residues whose mass is within `tolerance` of `target`.
pub fn for_each_composition<F>(
    alphabet: &ResidueAlphabet,
    target: f64,
    tolerance: f64,
    max_residues: usize,
    mut emit: F,
) where
    F: FnMut(&[ResidueId]),
{
    let mut current = Vec::with_capacity(max_residues);
    walk(alphabet, 0, target, tolerance, max_residues, &mut current, &mut emit);
}

fn walk<F>(
    alphabet: &ResidueAlphabet,
    start: usize,
    remaining: f64,
    tolerance: f64,
    depth_left: usize,
    current: &mut Vec<ResidueId>,
    emit: &mut F,
) where
    F: FnMut(&[ResidueId]),
{
    if !current.is_empty() && remaining.abs() <= tolerance {
        emit(current);
    }
    if depth_left == 0 {
        return;
    }
    for id in start..alphabet.len() {
        let mass = alphabet.mass(id as ResidueId);
        // Sorted alphabet, nothing heavier can fit either
        if mass > remaining + tolerance {
            break;
        }
        current.push(id as ResidueId);
        walk(
            alphabet,
            id,
            remaining - mass,
            tolerance,
            depth_left - 1,
            current,
            emit,
        );
        current.pop();
    }
}

/// Rearranges `xs` into the next lexicographic permutation, returns false
/// (leaving `xs` sorted ascending) once the last one was reached.
pub fn next_permutation(xs: &mut [ResidueId]) -> bool {
    if xs.len() < 2 {
        return false;
    }
    let mut i = xs.len() - 1;
    while i > 0 && xs[i - 1] >= xs[i] {
        i -= 1;
    }
    if i == 0 {
        xs.reverse();
        return false;
    }
    let mut j = xs.len() - 1;
    while xs[j] <= xs[i - 1] {
        j -= 1;
    }
    xs.swap(i - 1, j);
    xs[i..].reverse();
    true
}

/// Every distinct ordering of a sorted multiset, in lexicographic order.
pub fn distinct_orderings(composition: &[ResidueId]) -> Vec<Box<[ResidueId]>> {
    let mut current = composition.to_vec();
    current.sort_unstable();
    let mut out = vec![current.clone().into_boxed_slice()];
    while next_permutation(&mut current) {
        out.push(current.clone().into_boxed_slice());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::{
        MassTable,
        ModificationSet,
    };

    fn alphabet() -> ResidueAlphabet {
        let table = MassTable::new(&ModificationSet::default()).unwrap();
        ResidueAlphabet::new(&table, "ACDEFGHKLMNPQRSTVWY", &ModificationSet::default()).unwrap()
    }

    fn render_all(alpha: &ResidueAlphabet, target: f64, tol: f64, max: usize) -> Vec<String> {
        let mut out = Vec::new();
        for_each_composition(alpha, target, tol, max, |c| out.push(alpha.render(c)));
        out
    }

    #[test]
    fn test_compositions_of_ag_mass() {
        let alpha = alphabet();
        // G + A = 128.058578, same nominal mass as Q and close to K
        let found = render_all(&alpha, 128.058578, 0.02, 3);
        assert!(found.contains(&"GA".to_string()));
        assert!(found.contains(&"Q".to_string()));
        assert!(!found.contains(&"K".to_string()));
        // Each multiset once
        assert!(!found.contains(&"AG".to_string()));
    }

    #[test]
    fn test_max_residues_limits_depth() {
        let alpha = alphabet();
        // GGG = 171.064392
        assert!(render_all(&alpha, 171.064392, 0.01, 2)
            .iter()
            .all(|s| s.len() <= 2));
        assert!(render_all(&alpha, 171.064392, 0.01, 3).contains(&"GGG".to_string()));
    }

    #[test]
    fn test_nothing_below_lightest_residue() {
        let alpha = alphabet();
        assert!(render_all(&alpha, 40.0, 0.02, 4).is_empty());
    }

    #[test]
    fn test_distinct_orderings() {
        assert_eq!(distinct_orderings(&[1, 2, 3]).len(), 6);
        assert_eq!(distinct_orderings(&[2, 1, 1]).len(), 3);
        let all = distinct_orderings(&[2, 1]);
        assert_eq!(&*all[0], &[1, 2]);
        assert_eq!(&*all[1], &[2, 1]);
        assert_eq!(distinct_orderings(&[7]).len(), 1);
    }
}
