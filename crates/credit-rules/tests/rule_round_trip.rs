//! The codec law: a rule laid out as a graph and read back keeps its conditions, actions and
//! logical operator, for any number of each.

use proptest::prelude::*;

use credit_rules::rules::{
    rule_preview, to_graph, to_rule, validate_graph, Action, ActionKind, Condition,
    LogicalOperator, Operator, RuleDefinition, RuleMetadata, Scalar,
};

fn numeric_condition() -> impl Strategy<Value = Condition> {
    (
        prop_oneof![
            Just("monthly_income"),
            Just("credit_score"),
            Just("loan_amount"),
            Just("age"),
        ],
        prop_oneof![
            Just(Operator::GreaterOrEqual),
            Just(Operator::LessOrEqual),
            Just(Operator::GreaterThan),
            Just(Operator::LessThan),
            Just(Operator::Equal),
            Just(Operator::NotEqual),
        ],
        0u32..1_000_000,
    )
        .prop_map(|(field, operator, value)| {
            Condition::new(field, operator, f64::from(value)).expect("numeric condition")
        })
}

fn text_condition() -> impl Strategy<Value = Condition> {
    (
        prop_oneof![Just("employment_status"), Just("region"), Just("loan_purpose")],
        "[a-z_]{1,12}",
    )
        .prop_map(|(field, value)| {
            Condition::new(
                field,
                Operator::In,
                vec![Scalar::from(value.as_str()), Scalar::from("other")],
            )
            .expect("list condition")
        })
}

fn condition() -> impl Strategy<Value = Condition> {
    prop_oneof![numeric_condition(), text_condition()]
}

fn action() -> impl Strategy<Value = Action> {
    proptest::sample::select(ActionKind::ALL.to_vec()).prop_map(Action::new)
}

fn logical_operator() -> impl Strategy<Value = LogicalOperator> {
    prop_oneof![
        Just(LogicalOperator::And),
        Just(LogicalOperator::Or),
        Just(LogicalOperator::Not),
        Just(LogicalOperator::Xor),
    ]
}

fn rule() -> impl Strategy<Value = RuleDefinition> {
    (
        proptest::collection::vec(condition(), 1..6),
        proptest::collection::vec(action(), 1..5),
        logical_operator(),
    )
        .prop_map(|(conditions, actions, operator)| {
            let mut rule = RuleDefinition::new(RuleMetadata::new(
                "Generated rule",
                "Built by the round-trip property",
            ))
            .with_logical_operator(operator);
            for condition in conditions {
                rule = rule.with_condition(condition);
            }
            for action in actions {
                rule = rule.with_action(action);
            }
            rule
        })
}

proptest! {
    #[test]
    fn graph_round_trip_preserves_rule_semantics(rule in rule()) {
        let graph = to_graph(&rule);
        let restored = to_rule(&graph);

        prop_assert_eq!(restored.conditions(), rule.conditions());
        prop_assert_eq!(restored.actions(), rule.actions());
        prop_assert_eq!(restored.logical_operator(), rule.logical_operator());
        prop_assert_eq!(restored.metadata(), rule.metadata());
    }

    #[test]
    fn generated_graphs_are_valid(rule in rule()) {
        let validation = validate_graph(&to_graph(&rule));
        prop_assert!(validation.is_valid(), "errors: {:?}", validation.errors());
    }

    #[test]
    fn preview_is_stable_across_the_round_trip(rule in rule()) {
        let restored = to_rule(&to_graph(&rule));
        prop_assert_eq!(rule_preview(&restored), rule_preview(&rule));
    }
}

#[test]
fn rule_json_survives_serde_and_graph() {
    let json = r#"{
        "name": "Short tenure review",
        "description": "Send short employment tenures to an officer",
        "scope": "approval",
        "evaluationOrder": 3,
        "isActive": true,
        "isMandatory": false,
        "conditions": [
            { "field": "years_employed", "operator": "less_than", "value": 2 },
            { "field": "employment_status", "operator": "equals", "value": "self_employed" }
        ],
        "logicalOperator": "OR",
        "actions": [ { "type": "require_review" } ]
    }"#;

    let rule: RuleDefinition = serde_json::from_str(json).expect("rule json");
    assert_eq!(rule.conditions().len(), 2);
    assert_eq!(rule.conditions()[0].operator(), Operator::LessThan);
    assert_eq!(rule.logical_operator(), LogicalOperator::Or);

    let restored = to_rule(&to_graph(&rule));
    let encoded = serde_json::to_value(&restored).expect("encodable");
    assert_eq!(encoded["conditions"][0]["operator"], "<");
    assert_eq!(encoded["logicalOperator"], "OR");
    assert_eq!(encoded["actions"][0]["type"], "require_review");
}
