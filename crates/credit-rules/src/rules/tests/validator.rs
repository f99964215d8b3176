use super::common::*;
use crate::rules::codec::to_graph;
use crate::rules::domain::{Action, ActionKind, RuleDefinition, RuleMetadata};
use crate::rules::graph::{GraphMessage, NodeKind, Position, RuleGraph};
use crate::rules::validator::{validate_graph, validate_rule, GraphValidation};

#[test]
fn generated_graph_is_valid() {
    assert_eq!(validate_graph(&to_graph(&rule())), GraphValidation::Valid);
    assert!(validate_rule(&single_condition_rule()).is_valid());
}

#[test]
fn orphan_action_is_reported_by_id() {
    let mut graph = to_graph(&rule());
    graph
        .apply(GraphMessage::AddNode {
            id: "action-orphan".to_string(),
            kind: NodeKind::Action(Action::new(ActionKind::FlagForVerification)),
            position: Position::new(400.0, 600.0),
        })
        .expect("node added");

    let validation = validate_graph(&graph);
    assert!(!validation.is_valid());
    assert!(validation
        .errors()
        .iter()
        .any(|error| error == "Disconnected nodes: action-orphan"));

    let report = validation.report();
    assert!(!report.is_valid_rule);
}

#[test]
fn blank_graph_lists_every_missing_piece_in_order() {
    let graph = RuleGraph::blank(RuleMetadata::new("", ""));
    let validation = validate_graph(&graph);

    assert_eq!(
        validation.errors(),
        [
            "Rule name is required",
            "Rule description is required",
            "At least one condition is required",
            "At least one action is required",
            "Disconnected nodes: end",
        ]
    );
}

#[test]
fn cycle_detached_from_start_is_unreachable() {
    let mut graph = to_graph(&rule());
    for (id, kind) in [
        ("action-a", Action::new(ActionKind::Notify)),
        ("action-b", Action::new(ActionKind::Reject)),
    ] {
        graph
            .apply(GraphMessage::AddNode {
                id: id.to_string(),
                kind: NodeKind::Action(kind),
                position: Position::default(),
            })
            .expect("node added");
    }
    for (source, target) in [("action-a", "action-b"), ("action-b", "action-a")] {
        graph
            .apply(GraphMessage::Connect {
                source: source.to_string(),
                target: target.to_string(),
            })
            .expect("edge added");
    }

    let validation = validate_graph(&graph);
    assert_eq!(
        validation.errors(),
        ["Unreachable nodes: action-a, action-b"]
    );
}

#[test]
fn missing_end_node_is_reported() {
    let rule = rule();
    let graph = to_graph(&rule);
    let value = serde_json::to_value(&graph).expect("graph serialises");
    let mut value = value;
    let nodes = value["nodes"].as_array_mut().expect("nodes array");
    nodes.retain(|node| node["type"] != "end");
    value["edges"]
        .as_array_mut()
        .expect("edges array")
        .retain(|edge| edge["target"] != "end");
    let graph: RuleGraph = serde_json::from_value(value).expect("graph parses");

    let validation = validate_graph(&graph);
    assert!(validation
        .errors()
        .contains(&"Start and End nodes are required".to_string()));
}

#[test]
fn overlong_name_is_rejected() {
    let metadata = RuleMetadata::new("x".repeat(101), "described");
    let rule = RuleDefinition::new(metadata)
        .with_condition(income_condition())
        .with_action(limit_action());
    assert_eq!(
        validate_rule(&rule).errors(),
        ["Rule name must be 100 characters or less"]
    );
}
