//! Chore ranking - turns pairwise preferences into a share of the budget.
//!
//! Preferences are averaged into a pairwise matrix, the matrix becomes a
//! Markov chain in which every chore passes weight to the chores preferred
//! over it, and the chain's stationary distribution is the ranking. Cycles
//! with no net preference settle on uniform weights instead of an
//! inconsistent order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::ChorePreference;
use crate::domain::foundation::{ChoreId, ResidentId};

/// Power iteration stops once successive vectors differ by less than this (L1).
pub const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Upper bound on power iterations.
pub const MAX_ITERATIONS: usize = 10_000;

/// A chore's share of the point budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreRanking {
    pub chore_id: ChoreId,
    pub name: String,
    pub ranking: f64,
}

/// Averaged pairwise preferences between `n` chores.
///
/// `weight(i, j)` is how strongly the house prefers chore `i` over chore `j`;
/// `weight(i, j) + weight(j, i) == 1` for `i != j`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    weights: Vec<Vec<f64>>,
}

impl PairwiseMatrix {
    /// A matrix in which every pair is perfectly indifferent.
    pub fn indifferent(n: usize) -> Self {
        let weights = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 0.5 }).collect())
            .collect();
        Self { weights }
    }

    /// Wraps raw weights. The diagonal is ignored.
    pub fn from_weights(weights: Vec<Vec<f64>>) -> Self {
        Self { weights }
    }

    /// Averages every resident's stated preference per pair over `chores`.
    ///
    /// Residents that stated nothing for a pair count as indifferent (0.5),
    /// so the average is taken over `resident_count` residents (or the number
    /// of distinct residents in `preferences`, if larger). A resident stating
    /// the same pair twice counts once, with the later entry winning.
    /// Preferences that mention a chore outside `chores` are ignored.
    pub fn from_preferences(
        chores: &[ChoreId],
        preferences: &[ChorePreference],
        resident_count: usize,
    ) -> Self {
        let n = chores.len();
        let index: HashMap<ChoreId, usize> =
            chores.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        // One preference per resident and unordered pair; later entries win.
        let mut stated: BTreeMap<(&ResidentId, usize, usize), f64> = BTreeMap::new();
        for pref in preferences {
            let (Some(&a), Some(&b)) = (
                index.get(&pref.alpha_chore_id),
                index.get(&pref.beta_chore_id),
            ) else {
                continue;
            };
            if a == b {
                continue;
            }
            let (low, high, value) = if a < b {
                (a, b, pref.preference)
            } else {
                (b, a, 1.0 - pref.preference)
            };
            stated.insert((&pref.resident_id, low, high), value);
        }

        let mut sums = vec![vec![0.0; n]; n];
        let mut counts = vec![vec![0usize; n]; n];
        let mut residents = HashSet::new();
        for (&(resident, low, high), &value) in &stated {
            residents.insert(resident);
            sums[low][high] += value;
            sums[high][low] += 1.0 - value;
            counts[low][high] += 1;
            counts[high][low] += 1;
        }

        let denominator = resident_count.max(residents.len());
        let mut weights = Self::indifferent(n).weights;
        if denominator > 0 {
            let total = denominator as f64;
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        let unstated = denominator.saturating_sub(counts[i][j]) as f64;
                        weights[i][j] = (sums[i][j] + 0.5 * unstated) / total;
                    }
                }
            }
        }

        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i][j]
    }
}

/// Computes the stationary distribution of a pairwise matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoreRanker {
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl ChoreRanker {
    /// Creates a ranker; `damping` in (0, 1] is the share of each step that
    /// follows preferences rather than spreading evenly over all chores.
    pub fn new(damping: f64) -> Self {
        Self {
            damping: damping.clamp(f64::EPSILON, 1.0),
            tolerance: CONVERGENCE_TOLERANCE,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Returns one weight per matrix row, summing to 1.
    ///
    /// An empty matrix yields an empty ranking and a single chore gets 1.0.
    pub fn rank(&self, matrix: &PairwiseMatrix) -> Vec<f64> {
        let n = matrix.len();
        match n {
            0 => return Vec::new(),
            1 => return vec![1.0],
            _ => {}
        }

        let transitions = self.transition_matrix(matrix);
        let mut current = vec![1.0 / n as f64; n];

        for _ in 0..self.max_iterations {
            let next: Vec<f64> = (0..n)
                .map(|to| (0..n).map(|from| current[from] * transitions[from][to]).sum())
                .collect();
            let change: f64 = next.iter().zip(&current).map(|(a, b)| (a - b).abs()).sum();
            current = next;
            if change < self.tolerance {
                break;
            }
        }

        let total: f64 = current.iter().sum();
        if total > 0.0 {
            current.iter_mut().for_each(|w| *w /= total);
        }
        current
    }

    /// Ranks `chores` in order, pairing each id with its weight.
    pub fn rank_chores(
        &self,
        chores: &[ChoreId],
        preferences: &[ChorePreference],
        resident_count: usize,
    ) -> Vec<(ChoreId, f64)> {
        let matrix = PairwiseMatrix::from_preferences(chores, preferences, resident_count);
        chores.iter().copied().zip(self.rank(&matrix)).collect()
    }

    /// Row-stochastic matrix where row `from` sends weight to chores preferred over it.
    fn transition_matrix(&self, matrix: &PairwiseMatrix) -> Vec<Vec<f64>> {
        let n = matrix.len();
        let spread = (n - 1) as f64;
        let teleport = (1.0 - self.damping) / n as f64;

        (0..n)
            .map(|from| {
                let mut row: Vec<f64> = (0..n)
                    .map(|to| {
                        if to == from {
                            0.0
                        } else {
                            matrix.weight(to, from) / spread
                        }
                    })
                    .collect();
                let outflow: f64 = row.iter().sum();
                row[from] = (1.0 - outflow).max(0.0);
                row.iter_mut()
                    .for_each(|p| *p = self.damping * *p + teleport);
                row
            })
            .collect()
    }
}
