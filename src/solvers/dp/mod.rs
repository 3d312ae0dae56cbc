//! Discretized DP Solver
//!
//! A pseudo-polynomial dynamic program over the multiple-choice knapsack:
//! the budget range `[0, budget]` is partitioned into a fixed number of
//! cost levels, and each table cell holds the best tier combination whose
//! rounded cost fits at or below that level. Fixing the level count trades
//! exactness for a table size that is independent of the magnitude of the
//! actual costs.

use crate::{
    categories::Category,
    solvers::{Solution, Solver, SolverError, TierChoiceList},
};

pub mod observer;

pub use observer::{NoopObserver, SolveObserver, TracingObserver};

/// Number of discretized cost levels spanning `[0, budget]`.
///
/// Level `b` represents the rounded cost `b * (budget / (COST_LEVELS - 1))`;
/// the last level is the full budget.
pub const COST_LEVELS: u16 = 1001;

/// Best known assignment for one (category, cost level) pair.
///
/// `Unreachable` means no tier combination for categories `0..=i` has a
/// rounded cost at or below this level. It is a distinct state, not a
/// zero-preference solution, so a table that never reaches the final cell
/// surfaces as [`SolverError::NoFeasibleCombination`] instead of a
/// silently empty answer.
#[derive(Debug, Clone, Default)]
enum DpCell {
    /// No feasible assignment at this cost level yet.
    #[default]
    Unreachable,

    /// Best combination found for the categories filled in so far.
    Reachable {
        /// Cumulative preference of the combination
        preference: f64,

        /// One tier index per category filled in so far
        choices: TierChoiceList,
    },
}

/// Solver using a discretized dynamic program
#[derive(Debug)]
pub struct DpSolver;

impl DpSolver {
    /// Solve with an observer for watching the DP as it runs.
    ///
    /// The observer receives callbacks for the feasibility pre-check, each
    /// completed table row, and the final solution. The solver remains the
    /// single implementation of the DP; observers passively record what
    /// happens, which keeps diagnostics out of the primary result channel
    /// and makes the solver testable without capturing output streams.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] as for [`Solver::solve`].
    pub fn solve_with_observer(
        categories: &[Category],
        budget: f64,
        observer: &mut dyn SolveObserver,
    ) -> Result<Solution, SolverError> {
        Self::solve_internal(categories, budget, observer)
    }

    fn solve_internal(
        categories: &[Category],
        budget: f64,
        observer: &mut dyn SolveObserver,
    ) -> Result<Solution, SolverError> {
        let (min_cost, max_cost) = feasible_range(categories)?;

        observer.on_feasible_range(min_cost, max_cost, budget);

        // Fail fast before any table work: below the minimum there is no
        // feasible assignment at all, and at or beyond the maximum the top
        // tier everywhere is trivially affordable, which the contract
        // reports as an error rather than short-circuiting.
        if budget < min_cost {
            return Err(SolverError::BudgetBelowMinimum { budget, min_cost });
        }

        if budget >= max_cost {
            return Err(SolverError::BudgetOutOfRange { budget, max_cost });
        }

        let bucket_size = budget / f64::from(COST_LEVELS - 1);

        let first = categories.first().ok_or(SolverError::NoCategories)?;
        let mut row = base_row(first, bucket_size);

        observer.on_row(0, reachable_cells(&row));

        for (index, category) in categories.iter().enumerate().skip(1) {
            row = next_row(category, &row, bucket_size);

            observer.on_row(index, reachable_cells(&row));
        }

        // The answer is the last cell of the last row: the full budget.
        let last = row.last().ok_or(SolverError::InvariantViolation {
            message: "DP row has no cost levels",
        })?;

        match last {
            DpCell::Unreachable => Err(SolverError::NoFeasibleCombination),
            DpCell::Reachable {
                preference,
                choices,
            } => {
                let cost = exact_cost(categories, choices)?;

                let solution = Solution {
                    choices: choices.clone(),
                    preference: *preference,
                    cost,
                };

                observer.on_solution(&solution);

                Ok(solution)
            }
        }
    }
}

impl Solver for DpSolver {
    fn solve(categories: &[Category], budget: f64) -> Result<Solution, SolverError> {
        let mut observer = NoopObserver;

        Self::solve_internal(categories, budget, &mut observer)
    }
}

/// Sum of cheapest and most expensive tier costs over all categories.
///
/// # Errors
///
/// Returns [`SolverError::NoCategories`] for an empty slice and
/// [`SolverError::EmptyCategory`] for a category without tiers.
fn feasible_range(categories: &[Category]) -> Result<(f64, f64), SolverError> {
    if categories.is_empty() {
        return Err(SolverError::NoCategories);
    }

    let mut min_cost = 0.0;
    let mut max_cost = 0.0;

    for (index, category) in categories.iter().enumerate() {
        min_cost += category
            .cheapest_cost()
            .ok_or(SolverError::EmptyCategory(index))?;
        max_cost += category
            .steepest_cost()
            .ok_or(SolverError::EmptyCategory(index))?;
    }

    Ok((min_cost, max_cost))
}

/// Builds the row for the first category: per cost level, the single best
/// affordable tier.
fn base_row(category: &Category, bucket_size: f64) -> Vec<DpCell> {
    let mut row = Vec::with_capacity(usize::from(COST_LEVELS));

    for bucket in 0..COST_LEVELS {
        let target_cost = f64::from(bucket) * bucket_size;
        let mut best = DpCell::Unreachable;

        for (tier_index, tier) in category.iter().enumerate() {
            if tier.cost > target_cost {
                continue;
            }

            // Strict comparison keeps the first maximum found, so ties
            // resolve to the lowest tier index.
            if improves(&best, tier.preference) {
                best = DpCell::Reachable {
                    preference: tier.preference,
                    choices: TierChoiceList::from_slice(&[tier_index]),
                };
            }
        }

        row.push(best);
    }

    row
}

/// Builds the row for a subsequent category by combining each of its tiers
/// with the best previous-row cell that leaves room for it.
fn next_row(category: &Category, previous: &[DpCell], bucket_size: f64) -> Vec<DpCell> {
    let mut row = Vec::with_capacity(previous.len());

    for bucket in 0..COST_LEVELS {
        let target_cost = f64::from(bucket) * bucket_size;
        let mut best = DpCell::Unreachable;

        for (tier_index, tier) in category.iter().enumerate() {
            let remaining = target_cost - tier.cost;

            if remaining < 0.0 {
                // Tier too expensive for this cost level
                continue;
            }

            let Some(DpCell::Reachable {
                preference,
                choices,
            }) = previous.get(bucket_for(remaining, bucket_size))
            else {
                continue;
            };

            let total = preference + tier.preference;

            if improves(&best, total) {
                let mut extended = choices.clone();
                extended.push(tier_index);

                best = DpCell::Reachable {
                    preference: total,
                    choices: extended,
                };
            }
        }

        row.push(best);
    }

    row
}

/// Whether a candidate preference strictly beats the best cell so far.
fn improves(best: &DpCell, candidate: f64) -> bool {
    match best {
        DpCell::Unreachable => true,
        DpCell::Reachable { preference, .. } => candidate > *preference,
    }
}

/// Maps a remaining cost onto the index of the cost level at or below it.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the index is checked non-negative and clamped to the table size before casting"
)]
fn bucket_for(remaining: f64, bucket_size: f64) -> usize {
    if bucket_size <= 0.0 {
        return 0;
    }

    let index = (remaining / bucket_size).floor();

    if index.is_nan() || index.is_sign_negative() {
        return 0;
    }

    if index >= f64::from(COST_LEVELS - 1) {
        usize::from(COST_LEVELS - 1)
    } else {
        index as usize
    }
}

/// Number of reachable cells in a row, reported to observers.
fn reachable_cells(row: &[DpCell]) -> usize {
    row.iter()
        .filter(|cell| matches!(cell, DpCell::Reachable { .. }))
        .count()
}

/// Recomputes the exact cost of a choice list from the real tier costs.
///
/// # Errors
///
/// Returns [`SolverError::InvariantViolation`] if the choice list length
/// does not match the category count, or a wrapped [`CategoryError`] if a
/// chosen index is out of range (both are bugs in the table construction).
///
/// [`CategoryError`]: crate::categories::CategoryError
fn exact_cost(categories: &[Category], choices: &TierChoiceList) -> Result<f64, SolverError> {
    if choices.len() != categories.len() {
        return Err(SolverError::InvariantViolation {
            message: "choice list length does not match category count",
        });
    }

    categories
        .iter()
        .zip(choices.iter())
        .try_fold(0.0, |acc, (category, &choice)| {
            Ok(acc + category.tier(choice)?.cost)
        })
}
