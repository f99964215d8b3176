use super::domain::{LogicalOperator, RuleDefinition};
use super::graph::{
    GraphEdge, GraphNode, LogicalOperatorData, NodeKind, Position, RuleGraph, TerminalData,
    END_NODE_ID, LOGICAL_NODE_ID, START_NODE_ID,
};

const CONDITION_COLUMN: f64 = 200.0;
const LOGICAL_COLUMN: f64 = 350.0;
const ACTION_COLUMN: f64 = 400.0;
const END_COLUMN: f64 = 500.0;
const FIRST_ROW: f64 = 200.0;
const ROW_STEP: f64 = 100.0;

/// Lay a rule out as a chain: start, conditions, logical operator, actions, end.
///
/// The logical-operator node is emitted when more than one condition is combined, or when
/// the operator differs from the `AND` default, so [`to_rule`] can always recover it.
pub fn to_graph(rule: &RuleDefinition) -> RuleGraph {
    let conditions = rule.conditions();
    let actions = rule.actions();
    let logical_operator = rule.logical_operator();

    let mut nodes = Vec::with_capacity(conditions.len() + actions.len() + 3);
    let mut edges = Vec::with_capacity(conditions.len() + actions.len() + 2);

    nodes.push(GraphNode::new(
        START_NODE_ID,
        NodeKind::Start(TerminalData::labelled("Start")),
        Position::new(100.0, 100.0),
    ));
    let mut previous = START_NODE_ID.to_string();

    let mut chain = |nodes: &mut Vec<GraphNode>, node: GraphNode| {
        edges.push(GraphEdge::between(&previous, &node.id));
        previous = node.id.clone();
        nodes.push(node);
    };

    for (index, condition) in conditions.iter().enumerate() {
        chain(
            &mut nodes,
            GraphNode::new(
                format!("condition-{index}"),
                NodeKind::Condition(condition.clone()),
                Position::new(CONDITION_COLUMN, row(index)),
            ),
        );
    }

    if conditions.len() > 1 || logical_operator != LogicalOperator::And {
        chain(
            &mut nodes,
            GraphNode::new(
                LOGICAL_NODE_ID,
                NodeKind::LogicalOperator(LogicalOperatorData {
                    operator: logical_operator,
                }),
                Position::new(LOGICAL_COLUMN, row(conditions.len())),
            ),
        );
    }

    for (index, action) in actions.iter().enumerate() {
        chain(
            &mut nodes,
            GraphNode::new(
                format!("action-{index}"),
                NodeKind::Action(action.clone()),
                Position::new(ACTION_COLUMN, row(index)),
            ),
        );
    }

    chain(
        &mut nodes,
        GraphNode::new(
            END_NODE_ID,
            NodeKind::End(TerminalData::labelled("End")),
            Position::new(END_COLUMN, row(conditions.len().max(actions.len()))),
        ),
    );

    RuleGraph::from_parts(rule.metadata().clone(), nodes, edges)
}

/// Read a rule back out of a graph: condition and action nodes in node order, and the
/// first logical-operator node's operator (`AND` when there is none).
pub fn to_rule(graph: &RuleGraph) -> RuleDefinition {
    let mut conditions = Vec::new();
    let mut actions = Vec::new();
    let mut logical_operator = None;

    for node in graph.nodes() {
        match &node.kind {
            NodeKind::Condition(condition) => conditions.push(condition.clone()),
            NodeKind::Action(action) => actions.push(action.clone()),
            NodeKind::LogicalOperator(data) => {
                logical_operator.get_or_insert(data.operator);
            }
            NodeKind::Start(_) | NodeKind::End(_) => {}
        }
    }

    RuleDefinition::from_parts(
        graph.metadata().clone(),
        conditions,
        logical_operator.unwrap_or_default(),
        actions,
    )
}

fn row(index: usize) -> f64 {
    FIRST_ROW + ROW_STEP * index as f64
}

impl From<&RuleDefinition> for RuleGraph {
    fn from(rule: &RuleDefinition) -> Self {
        to_graph(rule)
    }
}

impl From<&RuleGraph> for RuleDefinition {
    fn from(graph: &RuleGraph) -> Self {
        to_rule(graph)
    }
}
