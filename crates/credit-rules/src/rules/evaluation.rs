use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::domain::{Action, Condition, ConditionValue, Operator, RuleDefinition, Scalar};
use crate::FieldMap;

const NUMERIC_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionOutcome {
    pub field: String,
    pub operator: Operator,
    pub matched: bool,
}

/// Result of running a rule against one applicant's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleEvaluation {
    pub rule: String,
    pub matched: bool,
    pub conditions: Vec<ConditionOutcome>,
    pub actions: Vec<Action>,
}

impl RuleDefinition {
    /// Evaluate the rule. Inactive rules never match; actions are only reported on a match.
    pub fn evaluate(&self, facts: &FieldMap) -> RuleEvaluation {
        let conditions: Vec<ConditionOutcome> = self
            .conditions()
            .iter()
            .map(|condition| ConditionOutcome {
                field: condition.field().to_string(),
                operator: condition.operator(),
                matched: condition.matches(facts),
            })
            .collect();

        let outcomes: Vec<bool> = conditions.iter().map(|outcome| outcome.matched).collect();
        let matched = self.metadata().is_active && self.logical_operator().combine(&outcomes);
        let actions = if matched {
            self.actions().to_vec()
        } else {
            Vec::new()
        };

        RuleEvaluation {
            rule: self.name().to_string(),
            matched,
            conditions,
            actions,
        }
    }
}

impl Condition {
    /// Whether the applicant's value for this field satisfies the condition.
    /// A missing or null field never matches.
    pub fn matches(&self, facts: &FieldMap) -> bool {
        let Some(fact) = facts.get(self.field()).filter(|value| !value.is_null()) else {
            return false;
        };
        let value = self.value();

        match self.operator() {
            Operator::GreaterOrEqual => compare(fact, value, |a, b| a >= b - NUMERIC_TOLERANCE),
            Operator::LessOrEqual => compare(fact, value, |a, b| a <= b + NUMERIC_TOLERANCE),
            Operator::GreaterThan => compare(fact, value, |a, b| a > b + NUMERIC_TOLERANCE),
            Operator::LessThan => compare(fact, value, |a, b| a < b - NUMERIC_TOLERANCE),
            Operator::Equal => value.as_scalar().is_some_and(|scalar| equals(fact, scalar)),
            Operator::NotEqual => value.as_scalar().is_some_and(|scalar| !equals(fact, scalar)),
            Operator::Contains => match (fact, value.as_scalar()) {
                (Value::Array(items), Some(scalar)) => items.iter().any(|item| equals(item, scalar)),
                (Value::String(text), Some(Scalar::Text(needle))) => text
                    .to_ascii_lowercase()
                    .contains(&needle.to_ascii_lowercase()),
                _ => false,
            },
            Operator::In => value.members().iter().any(|member| equals(fact, member)),
            Operator::NotIn => !value.members().iter().any(|member| equals(fact, member)),
            Operator::Regex => {
                let pattern = value.as_scalar().and_then(Scalar::as_text);
                match (pattern.map(Regex::new), fact_text(fact)) {
                    (Some(Ok(regex)), Some(text)) => regex.is_match(&text),
                    _ => false,
                }
            }
            Operator::IsTrue => truthy(fact) == Some(true),
            Operator::IsFalse => truthy(fact) == Some(false),
            Operator::ContainsAll => match fact {
                Value::Array(items) => value
                    .members()
                    .iter()
                    .all(|member| items.iter().any(|item| equals(item, member))),
                _ => false,
            },
            Operator::ContainsAny => match fact {
                Value::Array(items) => value
                    .members()
                    .iter()
                    .any(|member| items.iter().any(|item| equals(item, member))),
                _ => false,
            },
        }
    }
}

fn compare(fact: &Value, value: &ConditionValue, predicate: impl Fn(f64, f64) -> bool) -> bool {
    match (fact_number(fact), value.as_scalar().and_then(Scalar::as_f64)) {
        (Some(actual), Some(expected)) => predicate(actual, expected),
        _ => false,
    }
}

fn equals(fact: &Value, expected: &Scalar) -> bool {
    match expected {
        Scalar::Bool(flag) => truthy(fact) == Some(*flag),
        Scalar::Number(number) => {
            fact_number(fact).is_some_and(|actual| (actual - number).abs() <= NUMERIC_TOLERANCE)
        }
        Scalar::Text(text) => match (fact_number(fact), text.trim().parse::<f64>()) {
            (Some(actual), Ok(number)) => (actual - number).abs() <= NUMERIC_TOLERANCE,
            _ => fact_text(fact).is_some_and(|actual| actual.eq_ignore_ascii_case(text.trim())),
        },
    }
}

fn fact_number(fact: &Value) -> Option<f64> {
    match fact {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn fact_text(fact: &Value) -> Option<String> {
    match fact {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn truthy(fact: &Value) -> Option<bool> {
    match fact {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|value| value != 0.0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
