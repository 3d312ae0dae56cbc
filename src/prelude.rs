//! Quoin prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    categories::{Category, CategoryError, Tier},
    pricing::categories_for,
    receipt::{OptimizeResponse, Receipt, ReceiptError},
    request::{ConstituentInput, OptimizeRequest, RequestError},
    solvers::{
        Solution, Solver, SolverError, TierChoiceList,
        dp::{COST_LEVELS, DpSolver, NoopObserver, SolveObserver, TracingObserver},
    },
    template::{SpecEntry, Template, TemplateError},
};
