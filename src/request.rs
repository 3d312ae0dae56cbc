//! Optimization Requests

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::template::Template;

/// Request Validation Errors
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    /// A template constituent is missing from the request.
    #[error("Missing required constituent: {0}")]
    MissingConstituent(String),

    /// The requested spec level is not a single digit 1–9.
    #[error("Invalid spec level for {constituent}: {level} (must be 1-9)")]
    SpecLevelOutOfRange {
        /// Constituent with the invalid level
        constituent: String,

        /// The rejected level
        level: u8,
    },

    /// The requested priority level is not a single digit 0–9.
    #[error("Invalid priority level for {constituent}: {level} (must be 0-9)")]
    PriorityOutOfRange {
        /// Constituent with the invalid priority
        constituent: String,

        /// The rejected priority
        level: u8,
    },

    /// The quantity is zero.
    #[error("Invalid quantity for {0}: must be a positive integer")]
    QuantityNotPositive(String),

    /// The requested spec level has no rate in the template.
    #[error("No template rate for {constituent} at spec level {level}")]
    UnknownSpecLevel {
        /// Constituent with the unpriced level
        constituent: String,

        /// The level missing from the template
        level: u8,
    },

    /// The budget is not a finite, non-negative number.
    #[error("Invalid budget: {0}")]
    InvalidBudget(f64),
}

/// Per-constituent request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentInput {
    /// Quantity of the constituent to provision (scales rates into costs)
    pub quantity: u32,

    /// Chosen spec level; tiers are offered for levels 1 up to this one
    pub spec_level: u8,

    /// Priority, controlling how fast preference decays below the chosen
    /// level: higher priority means steeper decay
    pub priority_level: u8,
}

/// A single optimization request: one input per constituent plus the
/// shared budget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizeRequest {
    /// Inputs keyed by constituent name
    pub constituents: FxHashMap<String, ConstituentInput>,

    /// Shared spending limit across all constituents
    pub budget: f64,
}

impl OptimizeRequest {
    /// Parses a request from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for malformed JSON or
    /// missing fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Input for one constituent.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MissingConstituent`] if absent.
    pub fn constituent(&self, name: &str) -> Result<&ConstituentInput, RequestError> {
        self.constituents
            .get(name)
            .ok_or_else(|| RequestError::MissingConstituent(name.to_string()))
    }

    /// Validates the request against a template before the solver runs.
    ///
    /// Every template constituent must be present with a spec level of
    /// 1–9 priced by the template, a priority level of 0–9, a positive
    /// quantity, and the budget must be a finite non-negative number.
    ///
    /// # Errors
    ///
    /// Returns the first [`RequestError`] encountered, in template order.
    pub fn validate(&self, template: &Template) -> Result<(), RequestError> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(RequestError::InvalidBudget(self.budget));
        }

        for name in template.constituent_list() {
            let input = self.constituent(name)?;

            if !(1..=9).contains(&input.spec_level) {
                return Err(RequestError::SpecLevelOutOfRange {
                    constituent: name.clone(),
                    level: input.spec_level,
                });
            }

            if input.priority_level > 9 {
                return Err(RequestError::PriorityOutOfRange {
                    constituent: name.clone(),
                    level: input.priority_level,
                });
            }

            if input.quantity == 0 {
                return Err(RequestError::QuantityNotPositive(name.clone()));
            }

            // Every offered level must be priced, not just the chosen one,
            // since pricing builds a tier for each level up to the choice.
            for level in 1..=input.spec_level {
                if template.rate_for(name, level).is_none() {
                    return Err(RequestError::UnknownSpecLevel {
                        constituent: name.clone(),
                        level,
                    });
                }
            }
        }

        Ok(())
    }
}
