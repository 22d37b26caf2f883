use crate::chemistry::ResidueId;
use crate::models::Decomposition;
use std::cmp::Ordering;
use std::collections::{
    BTreeSet,
    HashMap,
};
use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

/// Total order on pool entries, greater is better: higher path score, then
/// shorter, then lexicographically smaller residues.
#[derive(Debug, Clone, PartialEq)]
struct Ranked {
    path_score: f64,
    residues: Box<[ResidueId]>,
}

impl Eq for Ranked {}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path_score
            .total_cmp(&other.path_score)
            .then_with(|| other.residues.len().cmp(&self.residues.len()))
            .then_with(|| other.residues.cmp(&self.residues))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Deduplicating candidate set that never holds more than `capacity` entries.
///
/// When full, a new candidate only gets in by evicting the current worst one.
#[derive(Debug)]
pub struct BoundedPool {
    capacity: usize,
    masses: HashMap<Box<[ResidueId]>, (f64, f64)>,
    ranked: BTreeSet<Ranked>,
    overflowed: bool,
    high_water: usize,
}

impl BoundedPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            masses: HashMap::new(),
            ranked: BTreeSet::new(),
            overflowed: false,
            high_water: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.ranked.len() >= self.capacity
    }

    /// True once any candidate was turned away or evicted for lack of room.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Largest number of entries held at any point.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Score a newcomer has to beat to get into a full pool.
    pub fn worst_score(&self) -> Option<f64> {
        if self.is_full() {
            self.ranked.first().map(|x| x.path_score)
        } else {
            None
        }
    }

    pub fn insert(&mut self, candidate: Decomposition) {
        if self.capacity == 0 {
            self.overflowed = true;
            return;
        }

        if let Some(&(_, old_score)) = self.masses.get(&candidate.residues) {
            if candidate.path_score > old_score {
                self.ranked.remove(&Ranked {
                    path_score: old_score,
                    residues: candidate.residues.clone(),
                });
                self.push(candidate);
            }
            return;
        }

        if self.is_full() {
            self.overflowed = true;
            let newcomer = Ranked {
                path_score: candidate.path_score,
                residues: candidate.residues.clone(),
            };
            match self.ranked.first() {
                Some(worst) if newcomer > *worst => {
                    if let Some(evicted) = self.ranked.pop_first() {
                        self.masses.remove(&evicted.residues);
                    }
                }
                _ => return,
            }
        }
        self.push(candidate);
    }

    fn push(&mut self, candidate: Decomposition) {
        self.ranked.insert(Ranked {
            path_score: candidate.path_score,
            residues: candidate.residues.clone(),
        });
        self.masses
            .insert(candidate.residues, (candidate.mass, candidate.path_score));
        self.high_water = self.high_water.max(self.ranked.len());
    }

    /// Best first.
    pub fn into_sorted_vec(mut self) -> Vec<Decomposition> {
        let mut out = Vec::with_capacity(self.ranked.len());
        while let Some(entry) = self.ranked.pop_last() {
            let (mass, path_score) = self.masses[&entry.residues];
            out.push(Decomposition::new(entry.residues, mass, path_score));
        }
        out
    }
}

/// Where joined candidates go, either a branch-local pool or the shared
/// top-level one.
pub(crate) trait CandidateSink {
    fn worst_score(&self) -> Option<f64>;
    fn insert(&mut self, candidate: Decomposition);
    /// Records a candidate skipped because it cannot beat a full pool.
    fn reject(&mut self);
}

impl CandidateSink for BoundedPool {
    fn worst_score(&self) -> Option<f64> {
        BoundedPool::worst_score(self)
    }

    fn insert(&mut self, candidate: Decomposition) {
        BoundedPool::insert(self, candidate)
    }

    fn reject(&mut self) {
        self.overflowed = true;
    }
}

/// A [`BoundedPool`] filled concurrently by the top-level branches.
///
/// Every full length candidate goes through this one pool, so the capacity
/// bounds the live candidates of the whole search and not of each branch.
#[derive(Debug)]
pub struct SharedPool {
    inner: Mutex<BoundedPool>,
}

impl SharedPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(BoundedPool::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoundedPool> {
        // Inserts keep the pool consistent even if a holder panicked
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn into_inner(self) -> BoundedPool {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CandidateSink for &SharedPool {
    fn worst_score(&self) -> Option<f64> {
        self.lock().worst_score()
    }

    fn insert(&mut self, candidate: Decomposition) {
        self.lock().insert(candidate)
    }

    fn reject(&mut self) {
        self.lock().overflowed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn dec(residues: &[ResidueId], score: f64) -> Decomposition {
        Decomposition::new(residues.into(), residues.len() as f64 * 10.0, score)
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut pool = BoundedPool::new(3);
        for i in 0..20u8 {
            pool.insert(dec(&[i], i as f64));
            assert!(pool.len() <= 3);
        }
        assert!(pool.overflowed());
        let kept: Vec<Box<[ResidueId]>> =
            pool.into_sorted_vec().into_iter().map(|d| d.residues).collect();
        let expected: Vec<Box<[ResidueId]>> = vec![[19u8].into(), [18u8].into(), [17u8].into()];
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_duplicates_keep_best_score() {
        let mut pool = BoundedPool::new(10);
        pool.insert(dec(&[1, 2], 0.5));
        pool.insert(dec(&[1, 2], 0.9));
        pool.insert(dec(&[1, 2], 0.1));
        assert_eq!(pool.len(), 1);
        assert!(!pool.overflowed());
        let out = pool.into_sorted_vec();
        assert_eq!(out[0].path_score, 0.9);
    }

    #[test]
    fn test_ties_prefer_shorter_then_lexicographic() {
        let mut pool = BoundedPool::new(10);
        pool.insert(dec(&[3, 1], 1.0));
        pool.insert(dec(&[2], 1.0));
        pool.insert(dec(&[1, 3], 1.0));
        let out: Vec<Box<[ResidueId]>> =
            pool.into_sorted_vec().into_iter().map(|d| d.residues).collect();
        let expected: Vec<Box<[ResidueId]>> = vec![[2u8].into(), [1u8, 3].into(), [3u8, 1].into()];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let items: Vec<Decomposition> = (0..10u8).map(|i| dec(&[i, i], (i % 4) as f64)).collect();
        let mut forward = BoundedPool::new(4);
        let mut backward = BoundedPool::new(4);
        for x in items.iter() {
            forward.insert(x.clone());
        }
        for x in items.iter().rev() {
            backward.insert(x.clone());
        }
        assert_eq!(forward.into_sorted_vec(), backward.into_sorted_vec());
    }

    #[test]
    fn test_high_water_tracks_peak_size() {
        let mut pool = BoundedPool::new(2);
        assert_eq!(pool.high_water(), 0);
        pool.insert(dec(&[1], 1.0));
        pool.insert(dec(&[2], 2.0));
        pool.insert(dec(&[3], 3.0));
        assert_eq!(pool.high_water(), 2);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_shared_pool_matches_sequential_fill() {
        let items: Vec<Decomposition> = (0..200u8)
            .map(|i| dec(&[i % 50, i / 50], ((i as usize * 37) % 11) as f64))
            .collect();

        let shared = SharedPool::new(8);
        items.par_iter().for_each(|x| {
            let mut sink = &shared;
            sink.insert(x.clone());
        });
        assert_eq!(shared.len(), 8);
        let shared = shared.into_inner();
        assert!(shared.high_water() <= 8);
        assert!(shared.overflowed());

        let mut sequential = BoundedPool::new(8);
        for x in items.iter() {
            sequential.insert(x.clone());
        }
        assert_eq!(shared.into_sorted_vec(), sequential.into_sorted_vec());
    }

    #[test]
    fn test_reject_marks_overflow() {
        let shared = SharedPool::new(4);
        assert!(shared.is_empty());
        let mut sink = &shared;
        sink.reject();
        assert!(shared.into_inner().overflowed());
    }
}
