//! Node/edge representation of a rule used by the visual editor.
//!
//! The graph is an owned value changed only through [`GraphMessage`]s. Node payloads are a
//! closed set of kinds, so every consumer matches exhaustively instead of probing `data`.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::domain::{
    Action, ActionEdit, Condition, ConditionEdit, LogicalOperator, RuleError, RuleMetadata,
};

pub const START_NODE_ID: &str = "start";
pub const END_NODE_ID: &str = "end";
pub const LOGICAL_NODE_ID: &str = "logical-operator";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Start,
    End,
    Condition,
    LogicalOperator,
    Action,
}

impl NodeType {
    pub const fn label(self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Condition => "condition",
            NodeType::LogicalOperator => "logicalOperator",
            NodeType::Action => "action",
        }
    }

    const fn id_prefix(self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Condition => "condition",
            NodeType::LogicalOperator => "logical-operator",
            NodeType::Action => "action",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TerminalData {
    #[serde(default)]
    pub label: String,
}

impl TerminalData {
    pub fn labelled(label: &str) -> Self {
        TerminalData {
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogicalOperatorData {
    #[serde(default)]
    pub operator: LogicalOperator,
}

/// Payload of a node, one variant per node kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Start(TerminalData),
    End(TerminalData),
    Condition(Condition),
    LogicalOperator(LogicalOperatorData),
    Action(Action),
}

impl NodeKind {
    pub const fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Start(_) => NodeType::Start,
            NodeKind::End(_) => NodeType::End,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::LogicalOperator(_) => NodeType::LogicalOperator,
            NodeKind::Action(_) => NodeType::Action,
        }
    }

    pub const fn is_protected(&self) -> bool {
        matches!(self, NodeKind::Start(_) | NodeKind::End(_))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "NodeWire")]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub position: Position,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        GraphNode {
            id: id.into(),
            kind,
            position,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeWire {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<NodeWire> for GraphNode {
    type Error = GraphError;

    fn try_from(wire: NodeWire) -> Result<Self, Self::Error> {
        let NodeWire {
            id,
            node_type,
            position,
            data,
        } = wire;

        let invalid = |source: serde_json::Error| GraphError::InvalidNodeData {
            id: id.clone(),
            reason: source.to_string(),
        };

        let kind = match node_type {
            NodeType::Start => NodeKind::Start(terminal_from(data).map_err(invalid)?),
            NodeType::End => NodeKind::End(terminal_from(data).map_err(invalid)?),
            NodeType::Condition => {
                NodeKind::Condition(serde_json::from_value(data).map_err(invalid)?)
            }
            NodeType::LogicalOperator => {
                NodeKind::LogicalOperator(serde_json::from_value(data).map_err(invalid)?)
            }
            NodeType::Action => NodeKind::Action(serde_json::from_value(data).map_err(invalid)?),
        };

        Ok(GraphNode { id, kind, position })
    }
}

fn terminal_from(data: serde_json::Value) -> Result<TerminalData, serde_json::Error> {
    if data.is_null() {
        return Ok(TerminalData::default());
    }
    serde_json::from_value(data)
}

impl Serialize for GraphNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("GraphNode", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind.node_type())?;
        state.serialize_field("position", &self.position)?;
        match &self.kind {
            NodeKind::Start(data) | NodeKind::End(data) => state.serialize_field("data", data)?,
            NodeKind::Condition(condition) => state.serialize_field("data", condition)?,
            NodeKind::LogicalOperator(data) => state.serialize_field("data", data)?,
            NodeKind::Action(action) => state.serialize_field("data", action)?,
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn between(source: &str, target: &str) -> Self {
        GraphEdge {
            id: format!("{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Errors raised when a graph update cannot be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Start and End nodes cannot be deleted.")]
    ProtectedNode { id: String },
    #[error("node '{id}' does not exist")]
    UnknownNode { id: String },
    #[error("node '{id}' already exists")]
    DuplicateNode { id: String },
    #[error("node '{id}' is a {actual} node, expected {expected}")]
    KindMismatch {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("edge {source_id} -> {target_id} already exists")]
    DuplicateEdge { source_id: String, target_id: String },
    #[error("edge {source_id} -> {target_id} does not exist")]
    UnknownEdge { source_id: String, target_id: String },
    #[error("node '{id}' cannot connect to itself")]
    SelfLoop { id: String },
    #[error("node '{id}' has invalid data: {reason}")]
    InvalidNodeData { id: String, reason: String },
    #[error("node '{id}': {source}")]
    Rule {
        id: String,
        #[source]
        source: RuleError,
    },
}

/// Explicit update applied to a [`RuleGraph`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphMessage {
    AddNode {
        id: String,
        kind: NodeKind,
        position: Position,
    },
    RemoveNode {
        id: String,
    },
    MoveNode {
        id: String,
        position: Position,
    },
    Connect {
        source: String,
        target: String,
    },
    Disconnect {
        source: String,
        target: String,
    },
    EditCondition {
        id: String,
        edit: ConditionEdit,
    },
    EditAction {
        id: String,
        edit: ActionEdit,
    },
    SetLogicalOperator {
        id: String,
        operator: LogicalOperator,
    },
    EditMetadata(RuleMetadata),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleGraph {
    metadata: RuleMetadata,
    #[serde(default)]
    nodes: Vec<GraphNode>,
    #[serde(default)]
    edges: Vec<GraphEdge>,
}

impl RuleGraph {
    /// Empty editor canvas: just the protected start and end nodes.
    pub fn blank(metadata: RuleMetadata) -> Self {
        RuleGraph {
            metadata,
            nodes: vec![
                GraphNode::new(
                    START_NODE_ID,
                    NodeKind::Start(TerminalData::labelled("Start")),
                    Position::new(100.0, 100.0),
                ),
                GraphNode::new(
                    END_NODE_ID,
                    NodeKind::End(TerminalData::labelled("End")),
                    Position::new(500.0, 200.0),
                ),
            ],
            edges: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        metadata: RuleMetadata,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    ) -> Self {
        RuleGraph {
            metadata,
            nodes,
            edges,
        }
    }

    pub fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn nodes_of(&self, node_type: NodeType) -> impl Iterator<Item = &GraphNode> {
        self.nodes
            .iter()
            .filter(move |node| node.kind.node_type() == node_type)
    }

    /// First unused id of the form `<kind>-<n>`.
    pub fn next_node_id(&self, node_type: NodeType) -> String {
        let prefix = node_type.id_prefix();
        (0..)
            .map(|index| format!("{prefix}-{index}"))
            .find(|candidate| self.node(candidate).is_none())
            .unwrap_or_else(|| format!("{prefix}-{}", self.nodes.len()))
    }

    pub fn apply(&mut self, message: GraphMessage) -> Result<(), GraphError> {
        match message {
            GraphMessage::AddNode { id, kind, position } => {
                if self.node(&id).is_some() {
                    return Err(GraphError::DuplicateNode { id });
                }
                self.nodes.push(GraphNode::new(id, kind, position));
            }
            GraphMessage::RemoveNode { id } => {
                let node = self.require(&id)?;
                if node.kind.is_protected() {
                    return Err(GraphError::ProtectedNode { id });
                }
                self.nodes.retain(|node| node.id != id);
                self.edges
                    .retain(|edge| edge.source != id && edge.target != id);
            }
            GraphMessage::MoveNode { id, position } => {
                self.require_mut(&id)?.position = position;
            }
            GraphMessage::Connect { source, target } => {
                self.require(&source)?;
                self.require(&target)?;
                if source == target {
                    return Err(GraphError::SelfLoop { id: source });
                }
                if self.has_edge(&source, &target) {
                    return Err(GraphError::DuplicateEdge {
                        source_id: source,
                        target_id: target,
                    });
                }
                self.edges.push(GraphEdge::between(&source, &target));
            }
            GraphMessage::Disconnect { source, target } => {
                if !self.has_edge(&source, &target) {
                    return Err(GraphError::UnknownEdge {
                        source_id: source,
                        target_id: target,
                    });
                }
                self.edges
                    .retain(|edge| !(edge.source == source && edge.target == target));
            }
            GraphMessage::EditCondition { id, edit } => {
                let node = self.require_mut(&id)?;
                let NodeKind::Condition(condition) = &node.kind else {
                    return Err(mismatch(&id, NodeType::Condition, &node.kind));
                };
                let updated = condition
                    .apply(edit)
                    .map_err(|source| GraphError::Rule {
                        id: id.clone(),
                        source,
                    })?;
                node.kind = NodeKind::Condition(updated);
            }
            GraphMessage::EditAction { id, edit } => {
                let node = self.require_mut(&id)?;
                let NodeKind::Action(action) = &node.kind else {
                    return Err(mismatch(&id, NodeType::Action, &node.kind));
                };
                let updated = action.apply(edit).map_err(|source| GraphError::Rule {
                    id: id.clone(),
                    source,
                })?;
                node.kind = NodeKind::Action(updated);
            }
            GraphMessage::SetLogicalOperator { id, operator } => {
                match &mut self.require_mut(&id)?.kind {
                    NodeKind::LogicalOperator(data) => data.operator = operator,
                    other => return Err(mismatch(&id, NodeType::LogicalOperator, other)),
                }
            }
            GraphMessage::EditMetadata(metadata) => self.metadata = metadata,
        }
        Ok(())
    }

    pub(crate) fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    fn require(&self, id: &str) -> Result<&GraphNode, GraphError> {
        self.node(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut GraphNode, GraphError> {
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }
}

fn mismatch(id: &str, expected: NodeType, actual: &NodeKind) -> GraphError {
    GraphError::KindMismatch {
        id: id.to_string(),
        expected: expected.label(),
        actual: actual.node_type().label(),
    }
}
