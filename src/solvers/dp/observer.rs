//! Solve Observer

use crate::solvers::Solution;

/// Observer trait for watching a DP solve as it runs.
///
/// This trait provides callbacks at key points during table construction,
/// allowing external observers to record the feasibility pre-check, row
/// progress, and the final solution without duplicating solver logic.
///
/// The observer pattern keeps a single source of truth: the solver remains
/// the only implementation of the DP, while observers passively record
/// what happens for diagnostics. Because diagnostics flow through the
/// observer rather than an ambient global, the solver is testable without
/// capturing output streams, and the primary result channel never carries
/// log output.
pub trait SolveObserver {
    /// Called once the feasibility pre-check has computed the feasible
    /// range, before any table work.
    ///
    /// # Parameters
    ///
    /// - `min_cost`: Sum of the cheapest tier cost over all categories
    /// - `max_cost`: Sum of the most expensive tier cost over all categories
    /// - `budget`: The requested budget
    fn on_feasible_range(&mut self, _min_cost: f64, _max_cost: f64, _budget: f64) {}

    /// Called after each table row is completed.
    ///
    /// # Parameters
    ///
    /// - `category`: Index of the category whose row was just built
    /// - `reachable`: Number of reachable cells in that row
    fn on_row(&mut self, _category: usize, _reachable: usize) {}

    /// Called once with the final solution before it is returned.
    fn on_solution(&mut self, _solution: &Solution) {}
}

/// Observer that ignores all callbacks.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SolveObserver for NoopObserver {}

/// Observer that emits `tracing` events for each callback.
///
/// Event levels are chosen so that ordinary verbosity shows the pre-check
/// and the outcome, while per-row progress stays behind trace level.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SolveObserver for TracingObserver {
    fn on_feasible_range(&mut self, min_cost: f64, max_cost: f64, budget: f64) {
        tracing::debug!(min_cost, max_cost, budget, "feasibility pre-check");
    }

    fn on_row(&mut self, category: usize, reachable: usize) {
        tracing::trace!(category, reachable, "DP row complete");
    }

    fn on_solution(&mut self, solution: &Solution) {
        tracing::debug!(
            preference = solution.preference,
            cost = solution.cost,
            categories = solution.choices.len(),
            "solution found"
        );
    }
}
