use serde_json::{json, Value};

use crate::rules::domain::{
    Action, ActionKind, Condition, FieldType, LogicalOperator, Operator, RuleDefinition,
    RuleMetadata, Scalar,
};
use crate::FieldMap;

pub(super) fn metadata() -> RuleMetadata {
    RuleMetadata {
        product_type: Some("PersonalLoan".to_string()),
        evaluation_order: 10,
        ..RuleMetadata::new(
            "Salaried prime uplift",
            "Raise the limit for salaried applicants with strong bureau history",
        )
    }
}

pub(super) fn income_condition() -> Condition {
    Condition::new("monthly_income", Operator::GreaterOrEqual, 15000.0).expect("income condition")
}

pub(super) fn score_condition() -> Condition {
    Condition::new("credit_score", Operator::GreaterThan, 680.0).expect("score condition")
}

pub(super) fn status_condition() -> Condition {
    Condition::new(
        "employment_status",
        Operator::In,
        vec![Scalar::from("employed"), Scalar::from("self_employed")],
    )
    .expect("status condition")
}

pub(super) fn collateral_condition() -> Condition {
    Condition::typed("has_collateral", FieldType::Boolean, Operator::IsTrue, true)
        .expect("collateral condition")
}

pub(super) fn limit_action() -> Action {
    Action::with_value(ActionKind::SetLimit, 250000.0).expect("limit action")
}

pub(super) fn rule() -> RuleDefinition {
    RuleDefinition::new(metadata())
        .with_condition(income_condition())
        .with_condition(score_condition())
        .with_condition(status_condition())
        .with_logical_operator(LogicalOperator::And)
        .with_action(limit_action())
        .with_action(Action::new(ActionKind::Approve))
}

pub(super) fn single_condition_rule() -> RuleDefinition {
    RuleDefinition::new(metadata())
        .with_condition(income_condition())
        .with_action(Action::new(ActionKind::RequireReview))
}

pub(super) fn facts(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object facts, got {other:?}"),
    }
}

pub(super) fn prime_applicant() -> FieldMap {
    facts(json!({
        "monthly_income": 22000,
        "credit_score": 712,
        "employment_status": "Employed",
        "has_collateral": false,
    }))
}
