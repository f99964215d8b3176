use super::codec::{to_graph, to_rule};
use super::domain::{RuleDefinition, RuleMetadata};
use super::evaluation::RuleEvaluation;
use super::graph::{GraphError, GraphMessage, RuleGraph};
use super::preview::rule_preview;
use super::validator::{validate_graph, GraphValidation};
use crate::FieldMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Please fix all validation errors before saving: {}", .reasons.join("; "))]
    InvalidRule { reasons: Vec<String> },
}

/// Owns the graph being edited and its current validation verdict.
///
/// Every accepted [`GraphMessage`] re-runs validation, and save/test are refused while the
/// graph is invalid.
#[derive(Debug, Clone)]
pub struct RuleEditor {
    graph: RuleGraph,
    validation: GraphValidation,
}

impl RuleEditor {
    pub fn new(metadata: RuleMetadata) -> Self {
        Self::from_graph(RuleGraph::blank(metadata))
    }

    pub fn load(rule: &RuleDefinition) -> Self {
        Self::from_graph(to_graph(rule))
    }

    pub fn from_graph(graph: RuleGraph) -> Self {
        let validation = validate_graph(&graph);
        RuleEditor { graph, validation }
    }

    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    pub fn validation(&self) -> &GraphValidation {
        &self.validation
    }

    pub fn can_save(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn preview(&self) -> String {
        rule_preview(&to_rule(&self.graph))
    }

    /// Apply one update. A rejected update leaves the graph untouched.
    pub fn apply(&mut self, message: GraphMessage) -> Result<&GraphValidation, GraphError> {
        let mut next = self.graph.clone();
        next.apply(message)?;
        self.validation = validate_graph(&next);
        self.graph = next;
        Ok(&self.validation)
    }

    pub fn save(&self) -> Result<RuleDefinition, EditorError> {
        self.ensure_valid()?;
        Ok(to_rule(&self.graph))
    }

    pub fn test(&self, facts: &FieldMap) -> Result<RuleEvaluation, EditorError> {
        self.ensure_valid()?;
        Ok(to_rule(&self.graph).evaluate(facts))
    }

    fn ensure_valid(&self) -> Result<(), EditorError> {
        match &self.validation {
            GraphValidation::Valid => Ok(()),
            GraphValidation::Invalid(reasons) => Err(EditorError::InvalidRule {
                reasons: reasons.clone(),
            }),
        }
    }
}
