//! Rule authoring: the canonical rule record, its editor graph, and the checks that gate
//! saving a rule.

pub mod codec;
pub mod conflicts;
pub mod domain;
pub mod editor;
pub mod evaluation;
pub mod fields;
pub mod graph;
pub mod preview;
pub mod validator;

pub use codec::{to_graph, to_rule};
pub use conflicts::{detect_conflicts, duplicate_evaluation_orders, ConflictKind, RuleConflict};
pub use domain::{
    Action, ActionEdit, ActionKind, Condition, ConditionEdit, ConditionValue, EvaluationScope,
    FieldType, LogicalOperator, Operator, RuleDefinition, RuleError, RuleMetadata, Scalar,
};
pub use editor::{EditorError, RuleEditor};
pub use evaluation::{ConditionOutcome, RuleEvaluation};
pub use graph::{GraphError, GraphMessage, NodeKind, NodeType, Position, RuleGraph};
pub use preview::rule_preview;
pub use validator::{validate_graph, validate_rule, GraphValidation, ValidationReport};

#[cfg(test)]
mod tests;
