use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Condition, Operator, RuleDefinition, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Some field is constrained in a way no single value can satisfy both rules.
    Contradictory,
    /// Same product with at least two shared condition fields.
    Overlapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConflict {
    pub existing_rule: String,
    pub kind: ConflictKind,
    pub description: String,
}

/// Rules sharing one evaluation order value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityClash {
    pub evaluation_order: u32,
    pub rules: Vec<String>,
}

const OVERLAP_FIELD_THRESHOLD: usize = 2;

/// Compare a candidate rule against the rules already in force. Conflicts are warnings.
pub fn detect_conflicts(candidate: &RuleDefinition, existing: &[RuleDefinition]) -> Vec<RuleConflict> {
    let mut conflicts = Vec::new();

    for rule in existing.iter().filter(|rule| rule.metadata().is_active) {
        if contradicts(candidate, rule) {
            conflicts.push(RuleConflict {
                existing_rule: rule.name().to_string(),
                kind: ConflictKind::Contradictory,
                description: format!(
                    "Rule \"{}\" has contradictory conditions with this rule",
                    rule.name()
                ),
            });
        }
        if overlaps(candidate, rule) {
            conflicts.push(RuleConflict {
                existing_rule: rule.name().to_string(),
                kind: ConflictKind::Overlapping,
                description: format!(
                    "Rule \"{}\" has overlapping conditions with this rule",
                    rule.name()
                ),
            });
        }
    }

    conflicts
}

/// Evaluation orders claimed by more than one active rule, lowest order first.
pub fn duplicate_evaluation_orders(rules: &[RuleDefinition]) -> Vec<PriorityClash> {
    let mut by_order: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for rule in rules.iter().filter(|rule| rule.metadata().is_active) {
        by_order
            .entry(rule.metadata().evaluation_order)
            .or_default()
            .push(rule.name().to_string());
    }

    by_order
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(evaluation_order, rules)| PriorityClash {
            evaluation_order,
            rules,
        })
        .collect()
}

fn contradicts(left: &RuleDefinition, right: &RuleDefinition) -> bool {
    left.conditions().iter().any(|a| {
        right
            .conditions()
            .iter()
            .filter(|b| b.field() == a.field())
            .any(|b| pair_contradicts(a, b) || pair_contradicts(b, a))
    })
}

fn pair_contradicts(a: &Condition, b: &Condition) -> bool {
    match (a.operator(), b.operator()) {
        (Operator::Equal, Operator::NotEqual) => a.value() == b.value(),
        (lower_op, upper_op) => match (lower_bound(lower_op), upper_bound(upper_op)) {
            (Some(lower_strict), Some(upper_strict)) => {
                let lower = a.value().as_scalar().and_then(Scalar::as_f64);
                let upper = b.value().as_scalar().and_then(Scalar::as_f64);
                match (lower, upper) {
                    (Some(lower), Some(upper)) => {
                        lower > upper || (lower == upper && (lower_strict || upper_strict))
                    }
                    _ => false,
                }
            }
            _ => false,
        },
    }
}

// Returns whether the bound is strict.
fn lower_bound(operator: Operator) -> Option<bool> {
    match operator {
        Operator::GreaterThan => Some(true),
        Operator::GreaterOrEqual => Some(false),
        _ => None,
    }
}

fn upper_bound(operator: Operator) -> Option<bool> {
    match operator {
        Operator::LessThan => Some(true),
        Operator::LessOrEqual => Some(false),
        _ => None,
    }
}

fn overlaps(left: &RuleDefinition, right: &RuleDefinition) -> bool {
    let same_product = match (&left.metadata().product_type, &right.metadata().product_type) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };
    if !same_product {
        return false;
    }

    let shared = left
        .conditions()
        .iter()
        .filter(|a| right.conditions().iter().any(|b| b.field() == a.field()))
        .count();
    shared >= OVERLAP_FIELD_THRESHOLD
}
