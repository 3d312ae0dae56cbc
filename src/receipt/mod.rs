//! Receipt

use std::io;

use serde::Serialize;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    categories::{Category, CategoryError},
    solvers::{Solution, SolverError},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A chosen tier index was out of range for its category.
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// IO error writing the receipt
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// The structured response for one optimization request.
///
/// Exactly one of these is emitted per invocation: either a complete
/// assignment or an error record with a reason string. A pre-check or
/// solver failure never escapes as a crash; it is folded into the error
/// variant here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptimizeResponse {
    /// A complete assignment, one chosen tier index per category
    Success {
        /// Chosen tier index per category, in category order
        choices: Vec<usize>,

        /// Summed preference score of the chosen tiers
        preferences: f64,

        /// Exact total cost of the chosen tiers
        cost: f64,
    },

    /// No assignment; the reason string names the failure
    Error {
        /// Human-readable failure reason
        error: String,
    },
}

impl From<&Solution> for OptimizeResponse {
    fn from(solution: &Solution) -> Self {
        Self::Success {
            choices: solution.choices.to_vec(),
            preferences: solution.preference,
            cost: solution.cost,
        }
    }
}

impl From<&SolverError> for OptimizeResponse {
    fn from(error: &SolverError) -> Self {
        // The two pre-check reasons are contract strings; everything else
        // reports its own message.
        let reason = match error {
            SolverError::BudgetBelowMinimum { .. } => "budget below minimum".to_string(),
            SolverError::BudgetOutOfRange { .. } => "budget out of feasible range".to_string(),
            other => other.to_string(),
        };

        Self::Error { error: reason }
    }
}

impl OptimizeResponse {
    /// Folds a solver outcome into a response record.
    #[must_use]
    pub fn from_outcome(outcome: &Result<Solution, SolverError>) -> Self {
        match outcome {
            Ok(solution) => Self::from(solution),
            Err(error) => Self::from(error),
        }
    }
}

/// Human-readable summary of a solved assignment.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    categories: &'a [Category],
    solution: &'a Solution,
    budget: f64,
}

impl<'a> Receipt<'a> {
    /// Creates a receipt for a solution over the given categories.
    #[must_use]
    pub const fn new(categories: &'a [Category], solution: &'a Solution, budget: f64) -> Self {
        Self {
            categories,
            solution,
            budget,
        }
    }

    /// Writes the receipt table and summary to the given sink.
    ///
    /// # Errors
    ///
    /// - [`ReceiptError::Category`]: a chosen tier index was out of range
    ///   for its category (a solver bug).
    /// - [`ReceiptError::Io`]: the sink rejected a write.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Constituent", "Spec Level", "Cost", "Preference"]);

        for (category, &choice) in self.categories.iter().zip(self.solution.choices.iter()) {
            let tier = category.tier(choice)?;

            builder.push_record([
                category.name().to_string(),
                format!("{}", choice + 1),
                format!("{:.2}", tier.cost),
                format!("{:.3}", tier.preference),
            ]);
        }

        write_receipt_table(&mut out, builder)?;
        write_receipt_summary(&mut out, self.solution, self.budget)?;

        Ok(())
    }
}

fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    solution: &Solution,
    budget: f64,
) -> Result<(), ReceiptError> {
    writeln!(out, " Budget:     {budget:.2}")?;
    writeln!(out, " Total cost: {:.2}", solution.cost)?;
    writeln!(out, " Preference: {:.3}", solution.preference)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::categories::Tier;

    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category::new("Walls", [Tier::new(10.0, 1.0), Tier::new(20.0, 5.0)]),
            Category::new("Roof", [Tier::new(10.0, 1.0), Tier::new(20.0, 5.0)]),
        ]
    }

    fn solution() -> Solution {
        Solution {
            choices: smallvec![1, 0],
            preference: 6.0,
            cost: 30.0,
        }
    }

    #[test]
    fn success_response_serializes_contract_fields() -> TestResult {
        let response = OptimizeResponse::from(&solution());

        let json = serde_json::to_value(&response)?;

        assert_eq!(
            json,
            serde_json::json!({ "choices": [1, 0], "preferences": 6.0, "cost": 30.0 }),
            "success payload shape"
        );

        Ok(())
    }

    #[test]
    fn precheck_errors_use_contract_reason_strings() -> TestResult {
        let below = OptimizeResponse::from(&SolverError::BudgetBelowMinimum {
            budget: 15.0,
            min_cost: 20.0,
        });
        let above = OptimizeResponse::from(&SolverError::BudgetOutOfRange {
            budget: 45.0,
            max_cost: 40.0,
        });

        assert_eq!(
            serde_json::to_value(&below)?,
            serde_json::json!({ "error": "budget below minimum" }),
            "below-minimum reason"
        );
        assert_eq!(
            serde_json::to_value(&above)?,
            serde_json::json!({ "error": "budget out of feasible range" }),
            "out-of-range reason"
        );

        Ok(())
    }

    #[test]
    fn from_outcome_folds_both_arms() {
        let ok = OptimizeResponse::from_outcome(&Ok(solution()));
        let err = OptimizeResponse::from_outcome(&Err(SolverError::NoFeasibleCombination));

        assert!(
            matches!(ok, OptimizeResponse::Success { .. }),
            "solution folds to success"
        );
        assert!(
            matches!(err, OptimizeResponse::Error { .. }),
            "solver error folds to error"
        );
    }

    #[test]
    fn write_to_renders_choices_and_totals() -> TestResult {
        let categories = categories();
        let solution = solution();
        let receipt = Receipt::new(&categories, &solution, 35.0);

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Walls"), "constituent name rendered");
        assert!(output.contains("Roof"), "constituent name rendered");
        assert!(output.contains("Budget:"), "summary rendered");
        assert!(output.contains("30.00"), "total cost rendered");

        Ok(())
    }

    #[test]
    fn write_to_rejects_out_of_range_choice() {
        let categories = categories();
        let solution = Solution {
            choices: smallvec![9, 0],
            preference: 0.0,
            cost: 0.0,
        };
        let receipt = Receipt::new(&categories, &solution, 35.0);

        let err = receipt.write_to(Vec::new()).err();

        assert!(
            matches!(err, Some(ReceiptError::Category(_))),
            "choice 9 is out of range"
        );
    }
}
