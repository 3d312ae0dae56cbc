//! Quoin
//!
//! Quoin is a budget-constrained tier allocation engine. Given a spec
//! template (the rate card), per-constituent quantities, spec choices and
//! priorities, and a single shared budget, it chooses exactly one spec
//! tier per constituent to maximize total preference without exceeding
//! the budget, using a discretized multiple-choice knapsack dynamic
//! program.

pub mod categories;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod request;
pub mod solvers;
pub mod template;
