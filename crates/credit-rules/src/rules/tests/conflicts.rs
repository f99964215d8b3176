use super::common::*;
use crate::rules::conflicts::{detect_conflicts, duplicate_evaluation_orders, ConflictKind};
use crate::rules::domain::{Action, ActionKind, Condition, Operator, RuleDefinition, RuleMetadata};

fn named(name: &str, order: u32) -> RuleMetadata {
    RuleMetadata {
        name: name.to_string(),
        evaluation_order: order,
        ..metadata()
    }
}

#[test]
fn impossible_ranges_are_contradictory() {
    let floor = RuleDefinition::new(named("Floor", 1))
        .with_condition(Condition::new("credit_score", Operator::GreaterThan, 700.0).expect("floor"))
        .with_action(Action::new(ActionKind::Approve));
    let ceiling = RuleDefinition::new(named("Ceiling", 2))
        .with_condition(Condition::new("credit_score", Operator::LessThan, 650.0).expect("ceiling"))
        .with_action(Action::new(ActionKind::Reject));

    let conflicts = detect_conflicts(&floor, &[ceiling]);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Contradictory);
    assert_eq!(
        conflicts[0].description,
        "Rule \"Ceiling\" has contradictory conditions with this rule"
    );
}

#[test]
fn equal_and_not_equal_on_same_value_conflict() {
    let employed = RuleDefinition::new(named("Employed", 1))
        .with_condition(Condition::new("employment_status", Operator::Equal, "employed").expect("eq"))
        .with_action(Action::new(ActionKind::Approve));
    let not_employed = RuleDefinition::new(named("Not employed", 2))
        .with_condition(
            Condition::new("employment_status", Operator::NotEqual, "employed").expect("ne"),
        )
        .with_action(Action::new(ActionKind::RequireReview));

    let conflicts = detect_conflicts(&not_employed, &[employed]);
    assert!(conflicts
        .iter()
        .any(|conflict| conflict.kind == ConflictKind::Contradictory));
}

#[test]
fn shared_fields_on_same_product_overlap() {
    let candidate = rule();
    let existing = RuleDefinition::new(named("Existing", 4))
        .with_condition(income_condition())
        .with_condition(score_condition())
        .with_action(Action::new(ActionKind::Approve));

    let conflicts = detect_conflicts(&candidate, &[existing]);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Overlapping);
}

#[test]
fn duplicate_orders_are_grouped() {
    let rules = [
        RuleDefinition::new(named("A", 1)),
        RuleDefinition::new(named("B", 2)),
        RuleDefinition::new(named("C", 1)),
    ];
    let clashes = duplicate_evaluation_orders(&rules);
    assert_eq!(clashes.len(), 1);
    assert_eq!(clashes[0].evaluation_order, 1);
    assert_eq!(clashes[0].rules, ["A", "C"]);
}
