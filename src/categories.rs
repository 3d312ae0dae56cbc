//! Categories and Tiers

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors related to category access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// A tier index was not found within the category (category name, tier index).
    #[error("Category {0} has no tier {1}")]
    TierNotFound(String, usize),
}

/// One discrete option within a category: a cost and a preference score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Absolute cost of choosing this tier (rate already scaled by quantity).
    pub cost: f64,

    /// Preference score awarded for choosing this tier.
    pub preference: f64,
}

impl Tier {
    /// Creates a tier from a cost and a preference score.
    #[must_use]
    pub const fn new(cost: f64, preference: f64) -> Self {
        Self { cost, preference }
    }
}

/// One decision axis: an ordered list of tier options.
///
/// Tiers are conventionally sorted by ascending cost; the feasibility
/// pre-check reads the first tier as the cheapest and the last as the
/// most expensive.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    name: String,
    tiers: SmallVec<[Tier; 9]>,
}

impl Category {
    /// Creates a category from a name and its tier options.
    pub fn new(name: impl Into<String>, tiers: impl IntoIterator<Item = Tier>) -> Self {
        Self {
            name: name.into(),
            tiers: tiers.into_iter().collect(),
        }
    }

    /// The category name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over the tier options in ascending-cost order.
    pub fn iter(&self) -> impl Iterator<Item = &Tier> {
        self.tiers.iter()
    }

    /// Gets a tier by its index within this category.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::TierNotFound`] if the index is out of range.
    pub fn tier(&self, index: usize) -> Result<&Tier, CategoryError> {
        self.tiers
            .get(index)
            .ok_or_else(|| CategoryError::TierNotFound(self.name.clone(), index))
    }

    /// Cost of the cheapest tier, i.e. the first one by convention.
    ///
    /// Returns `None` for a category with no tiers.
    #[must_use]
    pub fn cheapest_cost(&self) -> Option<f64> {
        self.tiers.first().map(|tier| tier.cost)
    }

    /// Cost of the most expensive tier, i.e. the last one by convention.
    ///
    /// Returns `None` for a category with no tiers.
    #[must_use]
    pub fn steepest_cost(&self) -> Option<f64> {
        self.tiers.last().map(|tier| tier.cost)
    }

    /// Number of tier options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the category has no tier options.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
