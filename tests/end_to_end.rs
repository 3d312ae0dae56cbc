//! End-to-end tests: template CSV → request intake → pricing → solver → response

use testresult::TestResult;

use quoin::{
    fixtures,
    prelude::{categories_for, DpSolver, OptimizeRequest, OptimizeResponse, Receipt, Solver, Template},
};

fn fixture_template() -> Result<Template, quoin::prelude::TemplateError> {
    Template::from_reader(fixtures::template_csv().as_bytes())
}

#[test]
fn fixture_request_solves_within_budget() -> TestResult {
    let template = fixture_template()?;
    let request = OptimizeRequest::from_json(fixtures::request_json())?;

    let categories = categories_for(&template, &request)?;
    let solution = DpSolver::solve(&categories, request.budget)?;

    assert_eq!(solution.choices.len(), 4, "one choice per constituent");
    assert!(
        solution.cost <= request.budget + request.budget / 1000.0,
        "cost {} within budget {} plus rounding",
        solution.cost,
        request.budget
    );

    let response = serde_json::to_value(OptimizeResponse::from(&solution))?;

    assert!(response.get("choices").is_some(), "success payload has choices");
    assert!(response.get("error").is_none(), "success payload has no error");

    Ok(())
}

#[test]
fn starved_budget_reports_the_contract_reason() -> TestResult {
    let template = fixture_template()?;

    let mut request = OptimizeRequest::from_json(fixtures::request_json())?;
    request.budget = 300.0; // min_cost for the fixture request is 370

    let categories = categories_for(&template, &request)?;
    let outcome = DpSolver::solve(&categories, request.budget);

    let response = serde_json::to_value(OptimizeResponse::from_outcome(&outcome))?;

    assert_eq!(
        response,
        serde_json::json!({ "error": "budget below minimum" }),
        "below-minimum contract payload"
    );

    Ok(())
}

#[test]
fn oversized_budget_reports_the_contract_reason() -> TestResult {
    let template = fixture_template()?;

    let mut request = OptimizeRequest::from_json(fixtures::request_json())?;
    request.budget = 730.0; // max_cost for the fixture request

    let categories = categories_for(&template, &request)?;
    let outcome = DpSolver::solve(&categories, request.budget);

    let response = serde_json::to_value(OptimizeResponse::from_outcome(&outcome))?;

    assert_eq!(
        response,
        serde_json::json!({ "error": "budget out of feasible range" }),
        "out-of-range contract payload"
    );

    Ok(())
}

#[test]
fn receipt_renders_every_constituent() -> TestResult {
    let template = fixture_template()?;
    let request = OptimizeRequest::from_json(fixtures::request_json())?;

    let categories = categories_for(&template, &request)?;
    let solution = DpSolver::solve(&categories, request.budget)?;

    let mut out = Vec::new();
    Receipt::new(&categories, &solution, request.budget).write_to(&mut out)?;

    let rendered = String::from_utf8(out)?;

    for name in template.constituent_list() {
        assert!(rendered.contains(name.as_str()), "receipt lists {name}");
    }

    Ok(())
}

#[test]
fn template_round_trips_through_json() -> TestResult {
    let template = fixture_template()?;

    let json = serde_json::to_value(&template)?;

    let listed = json
        .get("constituent_list")
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len);

    assert_eq!(listed, 4, "four constituents serialized");

    Ok(())
}
