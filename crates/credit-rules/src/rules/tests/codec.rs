use super::common::*;
use crate::rules::codec::{to_graph, to_rule};
use crate::rules::domain::{LogicalOperator, RuleDefinition};
use crate::rules::graph::{NodeKind, NodeType, RuleGraph};

#[test]
fn graph_chains_start_conditions_operator_actions_end() {
    let graph = to_graph(&rule());

    let ids: Vec<&str> = graph.nodes().iter().map(|node| node.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "start",
            "condition-0",
            "condition-1",
            "condition-2",
            "logical-operator",
            "action-0",
            "action-1",
            "end"
        ]
    );

    let edges: Vec<(&str, &str)> = graph
        .edges()
        .iter()
        .map(|edge| (edge.source.as_str(), edge.target.as_str()))
        .collect();
    assert_eq!(edges.len(), ids.len() - 1);
    for (window, edge) in ids.windows(2).zip(&edges) {
        assert_eq!((window[0], window[1]), *edge);
    }
    assert_eq!(graph.edges()[0].id, "start-condition-0");
}

#[test]
fn single_condition_with_default_operator_has_no_operator_node() {
    let graph = to_graph(&single_condition_rule());
    assert_eq!(graph.nodes_of(NodeType::LogicalOperator).count(), 0);
    assert_eq!(graph.nodes().len(), 4);
}

#[test]
fn single_condition_keeps_non_default_operator() {
    let rule = single_condition_rule().with_logical_operator(LogicalOperator::Not);
    let graph = to_graph(&rule);
    assert_eq!(graph.nodes_of(NodeType::LogicalOperator).count(), 1);
    assert_eq!(to_rule(&graph), rule);
}

#[test]
fn rule_survives_graph_round_trip() {
    let original = rule().with_logical_operator(LogicalOperator::Xor);
    let restored = to_rule(&to_graph(&original));
    assert_eq!(restored, original);
}

#[test]
fn to_rule_defaults_to_and_without_operator_node() {
    let graph = to_graph(&single_condition_rule());
    assert_eq!(to_rule(&graph).logical_operator(), LogicalOperator::And);
}

#[test]
fn graph_json_uses_editor_node_shape() {
    let graph = to_graph(&rule());
    let value = serde_json::to_value(&graph).expect("graph serialises");

    assert_eq!(value["nodes"][0]["type"], "start");
    assert_eq!(value["nodes"][1]["type"], "condition");
    assert_eq!(value["nodes"][1]["data"]["field"], "monthly_income");
    assert_eq!(value["nodes"][1]["position"]["x"], 200.0);
    assert_eq!(value["nodes"][4]["type"], "logicalOperator");
    assert_eq!(value["nodes"][4]["data"]["operator"], "AND");
    assert_eq!(value["nodes"][5]["data"]["type"], "set_limit");
    assert_eq!(value["edges"][0]["source"], "start");

    let parsed: RuleGraph = serde_json::from_value(value).expect("graph parses");
    assert_eq!(parsed, graph);
}

#[test]
fn graph_json_rejects_condition_with_foreign_operator() {
    let json = r#"{
        "metadata": {"name": "x", "description": "y"},
        "nodes": [
            {"id": "start", "type": "start", "position": {"x": 0, "y": 0}, "data": {"label": "Start"}},
            {"id": "c", "type": "condition", "data": {"field": "loan_amount", "operator": "contains", "value": "1"}}
        ],
        "edges": []
    }"#;
    assert!(serde_json::from_str::<RuleGraph>(json).is_err());
}

#[test]
fn conversions_are_available_through_from() {
    let original = rule();
    let graph = RuleGraph::from(&original);
    assert!(matches!(graph.nodes()[0].kind, NodeKind::Start(_)));
    assert_eq!(RuleDefinition::from(&graph), original);
}
