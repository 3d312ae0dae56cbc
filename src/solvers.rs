//! Solvers for tier allocation

use smallvec::SmallVec;
use thiserror::Error;

use crate::categories::{Category, CategoryError};

pub mod dp;

/// One chosen tier index per category, in category order.
pub type TierChoiceList = SmallVec<[usize; 8]>;

/// Solver Errors
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    /// No categories were provided, so there is nothing to allocate.
    #[error("no categories provided")]
    NoCategories,

    /// A category offers no tiers, so no complete assignment exists.
    #[error("category {0} has no tiers")]
    EmptyCategory(usize),

    /// The budget cannot cover even the cheapest tier in every category.
    #[error("budget below minimum: budget {budget} is less than minimum cost {min_cost}")]
    BudgetBelowMinimum {
        /// The requested budget
        budget: f64,

        /// Sum of the cheapest tier cost over all categories
        min_cost: f64,
    },

    /// The budget is at or beyond the sum of the most expensive tiers.
    ///
    /// Choosing the top tier everywhere is trivially affordable at this
    /// point, so discretization has nothing to optimize; by contract this
    /// is reported as an error rather than short-circuited.
    #[error("budget out of feasible range: budget {budget} is not below maximum cost {max_cost}")]
    BudgetOutOfRange {
        /// The requested budget
        budget: f64,

        /// Sum of the most expensive tier cost over all categories
        max_cost: f64,
    },

    /// Discretization left the final cell unreachable: every candidate
    /// combination rounded fractionally over budget.
    #[error("no feasible tier combination found at this budget resolution")]
    NoFeasibleCombination,

    /// Wrapped category access error.
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// A complete tier assignment: one choice per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Chosen tier index per category, in category order
    pub choices: TierChoiceList,

    /// Summed preference score of the chosen tiers
    pub preference: f64,

    /// Exact total cost of the chosen tiers, recomputed from the real
    /// tier costs rather than from discretized bucket levels
    pub cost: f64,
}

/// Trait for solving the tier allocation problem over a set of categories
pub trait Solver {
    /// Choose one tier per category, maximizing summed preference without
    /// exceeding the budget.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the input is degenerate, the budget is
    /// outside the feasible range, or no combination fits the budget.
    fn solve(categories: &[Category], budget: f64) -> Result<Solution, SolverError>;
}
