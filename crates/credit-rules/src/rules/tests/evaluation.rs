use serde_json::json;

use super::common::*;
use crate::rules::domain::{
    ActionKind, Condition, FieldType, LogicalOperator, Operator, RuleDefinition, Scalar,
};

#[test]
fn matching_applicant_fires_actions() {
    let evaluation = rule().evaluate(&prime_applicant());
    assert!(evaluation.matched);
    assert!(evaluation.conditions.iter().all(|outcome| outcome.matched));
    let kinds: Vec<ActionKind> = evaluation.actions.iter().map(|a| a.kind()).collect();
    assert_eq!(kinds, [ActionKind::SetLimit, ActionKind::Approve]);
}

#[test]
fn failing_condition_suppresses_actions() {
    let mut applicant = prime_applicant();
    applicant.insert("credit_score".to_string(), json!(640));

    let evaluation = rule().evaluate(&applicant);
    assert!(!evaluation.matched);
    assert!(evaluation.actions.is_empty());
    assert!(!evaluation.conditions[1].matched);
}

#[test]
fn missing_fields_never_match() {
    let evaluation = rule().evaluate(&facts(json!({ "monthly_income": 50000 })));
    assert!(!evaluation.matched);
}

#[test]
fn inactive_rule_never_matches() {
    let mut metadata = metadata();
    metadata.is_active = false;
    let inactive = RuleDefinition::new(metadata)
        .with_condition(income_condition())
        .with_action(limit_action());
    assert!(!inactive.evaluate(&prime_applicant()).matched);
}

#[test]
fn combinators_follow_their_truth_tables() {
    let base = RuleDefinition::new(metadata())
        .with_condition(income_condition())
        .with_condition(collateral_condition())
        .with_action(limit_action());

    let applicant = prime_applicant();
    assert!(!base.clone().evaluate(&applicant).matched);
    assert!(base
        .clone()
        .with_logical_operator(LogicalOperator::Or)
        .evaluate(&applicant)
        .matched);
    assert!(base
        .clone()
        .with_logical_operator(LogicalOperator::Xor)
        .evaluate(&applicant)
        .matched);
    assert!(!base
        .with_logical_operator(LogicalOperator::Not)
        .evaluate(&applicant)
        .matched);
}

#[test]
fn string_and_array_operators() {
    let applicant = facts(json!({
        "phone_number": "+251911234567",
        "region": "Addis Ababa",
        "tags": ["salary", "mobile_money", "merchant"],
    }));

    let regex = Condition::new("phone_number", Operator::Regex, "^(\\+251|0)[0-9]{9}$")
        .expect("regex condition");
    assert!(regex.matches(&applicant));

    let contains = Condition::new("region", Operator::Contains, "addis").expect("contains");
    assert!(contains.matches(&applicant));

    let not_in = Condition::new("region", Operator::NotIn, "Oromia, Amhara").expect("not_in");
    assert!(not_in.matches(&applicant));

    let all = Condition::typed(
        "tags",
        FieldType::Array,
        Operator::ContainsAll,
        vec![Scalar::from("salary"), Scalar::from("merchant")],
    )
    .expect("contains_all");
    assert!(all.matches(&applicant));

    let any = Condition::typed(
        "tags",
        FieldType::Array,
        Operator::ContainsAny,
        vec![Scalar::from("payroll")],
    )
    .expect("contains_any");
    assert!(!any.matches(&applicant));
}

#[test]
fn numeric_comparison_accepts_numeric_strings() {
    let condition = Condition::new("loan_amount", Operator::LessOrEqual, 50000.0)
        .expect("amount condition");
    assert!(condition.matches(&facts(json!({ "loan_amount": "50000" }))));
    assert!(!condition.matches(&facts(json!({ "loan_amount": "fifty" }))));
}
