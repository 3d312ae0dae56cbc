//! Pricing
//!
//! Turns a template and a validated request into the solver's input:
//! one category per constituent, with one tier per offered spec level.

use crate::{
    categories::{Category, Tier},
    request::{ConstituentInput, OptimizeRequest, RequestError},
    template::Template,
};

/// Builds solver categories from a template and a request, in template
/// order.
///
/// For each constituent, tiers are offered for every spec level from 1 up
/// to the chosen one. A tier's cost is its template rate scaled by the
/// requested quantity; its preference is 1.0 at the chosen level and
/// decays by a factor of the priority level for each level below it.
///
/// # Errors
///
/// Returns a [`RequestError`] if the request fails validation against the
/// template.
pub fn categories_for(
    template: &Template,
    request: &OptimizeRequest,
) -> Result<Vec<Category>, RequestError> {
    request.validate(template)?;

    template
        .constituent_list()
        .iter()
        .map(|name| {
            let input = request.constituent(name)?;

            let tiers = (1..=input.spec_level)
                .map(|level| {
                    let rate = template.rate_for(name, level).ok_or_else(|| {
                        RequestError::UnknownSpecLevel {
                            constituent: name.clone(),
                            level,
                        }
                    })?;

                    Ok(Tier::new(
                        rate * f64::from(input.quantity),
                        preference_for(input, level),
                    ))
                })
                .collect::<Result<Vec<Tier>, RequestError>>()?;

            Ok(Category::new(name.clone(), tiers))
        })
        .collect()
}

/// Preference score of one spec level under the requested choice.
///
/// The chosen level scores 1.0; each level below it is divided by the
/// priority level once more, so a high priority makes settling for a
/// lower level expensive.
fn preference_for(input: &ConstituentInput, level: u8) -> f64 {
    let levels_below = input.spec_level.saturating_sub(level);

    if levels_below == 0 {
        1.0
    } else {
        1.0 / f64::from(input.priority_level).powi(i32::from(levels_below))
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;
    use testresult::TestResult;

    use crate::template::TemplateError;

    use super::*;

    const TEMPLATE: &str = "\
Constituent,Spec,Rate,Inclusion,Specification
Walls,1,10,,
Walls,2,15,,
Walls,3,20,,
Roof,1,50,,
";

    fn template() -> Result<Template, TemplateError> {
        Template::from_reader(TEMPLATE.as_bytes())
    }

    fn request() -> OptimizeRequest {
        let mut constituents = FxHashMap::default();

        constituents.insert(
            "Walls".to_string(),
            ConstituentInput {
                quantity: 2,
                spec_level: 3,
                priority_level: 2,
            },
        );
        constituents.insert(
            "Roof".to_string(),
            ConstituentInput {
                quantity: 4,
                spec_level: 1,
                priority_level: 5,
            },
        );

        OptimizeRequest {
            constituents,
            budget: 1000.0,
        }
    }

    #[test]
    fn categories_follow_template_order() -> TestResult {
        let categories = categories_for(&template()?, &request())?;

        let names: Vec<&str> = categories.iter().map(Category::name).collect();

        assert_eq!(names, ["Walls", "Roof"], "template order");

        Ok(())
    }

    #[test]
    fn costs_scale_rates_by_quantity() -> TestResult {
        let categories = categories_for(&template()?, &request())?;

        let costs: Vec<f64> = categories
            .first()
            .map(|walls| walls.iter().map(|tier| tier.cost).collect())
            .unwrap_or_default();

        // Rates 10, 15, 20 at quantity 2.
        let expected = [20.0, 30.0, 40.0];
        let matches = costs
            .iter()
            .zip(expected.iter())
            .all(|(cost, want)| (cost - want).abs() < 1e-9);

        assert!(matches, "costs are rate x quantity: {costs:?}");

        Ok(())
    }

    #[test]
    fn preference_decays_by_priority_below_the_chosen_level() -> TestResult {
        let categories = categories_for(&template()?, &request())?;

        let preferences: Vec<f64> = categories
            .first()
            .map(|walls| walls.iter().map(|tier| tier.preference).collect())
            .unwrap_or_default();

        // Chosen level 3 at priority 2: 1/4, 1/2, 1.
        let expected = [0.25, 0.5, 1.0];
        let matches = preferences
            .iter()
            .zip(expected.iter())
            .all(|(preference, want)| (preference - want).abs() < 1e-9);

        assert!(matches, "preference ladder: {preferences:?}");

        Ok(())
    }

    #[test]
    fn chosen_level_alone_scores_one() -> TestResult {
        let categories = categories_for(&template()?, &request())?;

        let roof = categories.get(1);

        assert!(
            matches!(roof, Some(category) if category.len() == 1),
            "only level 1 is offered"
        );
        assert!(
            matches!(
                roof.and_then(|category| category.iter().next()),
                Some(tier) if (tier.preference - 1.0).abs() < 1e-9
            ),
            "the chosen level scores 1.0"
        );

        Ok(())
    }

    #[test]
    fn invalid_request_is_rejected_before_pricing() -> TestResult {
        let mut bad = request();
        bad.budget = -1.0;

        let err = categories_for(&template()?, &bad).err();

        assert!(
            matches!(err, Some(RequestError::InvalidBudget(_))),
            "validation runs first"
        );

        Ok(())
    }
}
