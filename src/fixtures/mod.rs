//! Fixtures
//!
//! Sample data shared by integration tests and the CLI demo: a spec
//! template CSV, a matching request, and the reference two-tier scenario
//! used throughout the solver tests.

use crate::categories::{Category, Tier};

/// Sample spec template CSV: four constituents with five levels each.
#[must_use]
pub fn template_csv() -> &'static str {
    include_str!("../../fixtures/template.csv")
}

/// Sample request JSON matching [`template_csv`].
#[must_use]
pub fn request_json() -> &'static str {
    include_str!("../../fixtures/request.json")
}

/// The reference scenario: two categories, each with a (10, 1) and a
/// (20, 5) tier, so the feasible range is [20, 40).
#[must_use]
pub fn two_tier_categories() -> Vec<Category> {
    vec![
        Category::new("Walls", [Tier::new(10.0, 1.0), Tier::new(20.0, 5.0)]),
        Category::new("Roof", [Tier::new(10.0, 1.0), Tier::new(20.0, 5.0)]),
    ]
}
