use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::Serialize;

use super::codec::to_graph;
use super::domain::RuleDefinition;
use super::graph::{NodeKind, NodeType, RuleGraph};

pub const MAX_RULE_NAME_LEN: usize = 100;

/// Structural verdict for a rule graph. Saving and testing require `Valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphValidation {
    Valid,
    Invalid(Vec<String>),
}

impl GraphValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, GraphValidation::Valid)
    }

    pub fn errors(&self) -> &[String] {
        match self {
            GraphValidation::Valid => &[],
            GraphValidation::Invalid(reasons) => reasons,
        }
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            is_valid_rule: self.is_valid(),
            validation_errors: self.errors().to_vec(),
        }
    }
}

/// Serialisable form handed to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid_rule: bool,
    pub validation_errors: Vec<String>,
}

pub fn validate_graph(graph: &RuleGraph) -> GraphValidation {
    let mut errors = Vec::new();
    let metadata = graph.metadata();

    if metadata.name.trim().is_empty() {
        errors.push("Rule name is required".to_string());
    } else if metadata.name.chars().count() > MAX_RULE_NAME_LEN {
        errors.push(format!(
            "Rule name must be {MAX_RULE_NAME_LEN} characters or less"
        ));
    }
    if metadata.description.trim().is_empty() {
        errors.push("Rule description is required".to_string());
    }

    if graph.nodes_of(NodeType::Condition).next().is_none() {
        errors.push("At least one condition is required".to_string());
    }
    if graph.nodes_of(NodeType::Action).next().is_none() {
        errors.push("At least one action is required".to_string());
    }

    let starts: Vec<&str> = graph
        .nodes_of(NodeType::Start)
        .map(|node| node.id.as_str())
        .collect();
    let has_end = graph.nodes_of(NodeType::End).next().is_some();
    if starts.is_empty() || !has_end {
        errors.push("Start and End nodes are required".to_string());
    }
    if starts.len() > 1 {
        errors.push("Only one Start node is allowed".to_string());
    }
    if graph.nodes_of(NodeType::LogicalOperator).count() > 1 {
        errors.push("Only one logical operator node is allowed".to_string());
    }

    let known: BTreeSet<&str> = graph.nodes().iter().map(|node| node.id.as_str()).collect();
    let dangling: Vec<&str> = graph
        .edges()
        .iter()
        .filter(|edge| {
            !known.contains(edge.source.as_str()) || !known.contains(edge.target.as_str())
        })
        .map(|edge| edge.id.as_str())
        .collect();
    if !dangling.is_empty() {
        errors.push(format!(
            "Edges reference unknown nodes: {}",
            dangling.join(", ")
        ));
    }

    let disconnected: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|node| !matches!(node.kind, NodeKind::Start(_)))
        .filter(|node| !graph.edges().iter().any(|edge| edge.target == node.id))
        .map(|node| node.id.as_str())
        .collect();
    if !disconnected.is_empty() {
        errors.push(format!("Disconnected nodes: {}", disconnected.join(", ")));
    }

    if let [start] = starts.as_slice() {
        let reached = reachable_from(graph, start);
        let unreachable: Vec<&str> = graph
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .filter(|id| !reached.contains(id) && !disconnected.contains(id))
            .collect();
        if !unreachable.is_empty() {
            errors.push(format!("Unreachable nodes: {}", unreachable.join(", ")));
        }
    }

    if errors.is_empty() {
        GraphValidation::Valid
    } else {
        GraphValidation::Invalid(errors)
    }
}

/// Validate a rule record through its graph form.
pub fn validate_rule(rule: &RuleDefinition) -> GraphValidation {
    validate_graph(&to_graph(rule))
}

fn reachable_from<'a>(graph: &'a RuleGraph, start: &'a str) -> BTreeSet<&'a str> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut reached = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in adjacency.get(current).into_iter().flatten() {
            if reached.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    reached
}
