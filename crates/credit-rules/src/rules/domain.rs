use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::fields::infer_field_type;

/// Value category of a condition field. Selects the operator menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Number,
    String,
    Boolean,
    Array,
}

impl FieldType {
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
        }
    }

    pub const fn operators(self) -> &'static [Operator] {
        match self {
            FieldType::Number => &[
                Operator::GreaterOrEqual,
                Operator::LessOrEqual,
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::Equal,
                Operator::NotEqual,
            ],
            FieldType::String => &[
                Operator::Equal,
                Operator::NotEqual,
                Operator::Contains,
                Operator::In,
                Operator::NotIn,
                Operator::Regex,
            ],
            FieldType::Boolean => &[Operator::IsTrue, Operator::IsFalse],
            FieldType::Array => &[Operator::ContainsAll, Operator::ContainsAny],
        }
    }

    pub const fn default_operator(self) -> Operator {
        match self {
            FieldType::Number => Operator::GreaterOrEqual,
            FieldType::String => Operator::Equal,
            FieldType::Boolean => Operator::IsTrue,
            FieldType::Array => Operator::ContainsAny,
        }
    }

    /// Value a condition holds right after its field or type changes.
    pub fn empty_value(self) -> ConditionValue {
        match self {
            FieldType::Number => ConditionValue::Scalar(Scalar::Number(0.0)),
            FieldType::String => ConditionValue::Scalar(Scalar::Text(String::new())),
            FieldType::Boolean => ConditionValue::Scalar(Scalar::Bool(true)),
            FieldType::Array => ConditionValue::List(Vec::new()),
        }
    }

    pub fn allows(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparison applied between a field and a condition value.
///
/// Serialises as the editor's symbol; the backend's long names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">=", alias = "greater_than_or_equal")]
    GreaterOrEqual,
    #[serde(rename = "<=", alias = "less_than_or_equal")]
    LessOrEqual,
    #[serde(rename = ">", alias = "greater_than")]
    GreaterThan,
    #[serde(rename = "<", alias = "less_than")]
    LessThan,
    #[serde(rename = "==", alias = "equals")]
    Equal,
    #[serde(rename = "!=", alias = "not_equals")]
    NotEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = "regex", alias = "matches")]
    Regex,
    #[serde(rename = "is_true")]
    IsTrue,
    #[serde(rename = "is_false")]
    IsFalse,
    #[serde(rename = "contains_all")]
    ContainsAll,
    #[serde(rename = "contains_any")]
    ContainsAny,
}

impl Operator {
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Contains => "contains",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Regex => "regex",
            Operator::IsTrue => "is_true",
            Operator::IsFalse => "is_false",
            Operator::ContainsAll => "contains_all",
            Operator::ContainsAny => "contains_any",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single JSON scalar carried by conditions and actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) => Some(*value),
            Scalar::Text(text) => text.trim().parse::<f64>().ok(),
            Scalar::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{value:.0}")
            }
            Scalar::Number(value) => write!(f, "{value}"),
            Scalar::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Right-hand side of a condition: one scalar or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    List(Vec<Scalar>),
    Scalar(Scalar),
}

impl ConditionValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ConditionValue::Scalar(scalar) => Some(scalar),
            ConditionValue::List(_) => None,
        }
    }

    /// Members for set operators. A text value is read as a comma separated list.
    pub fn members(&self) -> Vec<Scalar> {
        match self {
            ConditionValue::List(items) => items.clone(),
            ConditionValue::Scalar(Scalar::Text(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Scalar::from)
                .collect(),
            ConditionValue::Scalar(other) => vec![other.clone()],
        }
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Scalar(scalar) => write!(f, "{scalar}"),
            ConditionValue::List(items) => {
                let joined = items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{joined}]")
            }
        }
    }
}

impl From<Scalar> for ConditionValue {
    fn from(value: Scalar) -> Self {
        ConditionValue::Scalar(value)
    }
}

impl From<Vec<Scalar>> for ConditionValue {
    fn from(items: Vec<Scalar>) -> Self {
        ConditionValue::List(items)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Scalar(Scalar::Number(value))
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Scalar(Scalar::Bool(value))
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Scalar(Scalar::from(value))
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Scalar(Scalar::Text(value))
    }
}

/// Errors raised when a condition or action would break the rule schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("condition field name is required")]
    EmptyField,
    #[error("operator '{operator}' is not allowed for {field_type} field '{field}'")]
    OperatorNotAllowed {
        field: String,
        operator: Operator,
        field_type: FieldType,
    },
    #[error("pattern '{pattern}' on field '{field}' is not a valid regular expression")]
    InvalidPattern { field: String, pattern: String },
    #[error("operator '{operator}' on field '{field}' requires a list value")]
    ExpectedList { field: String, operator: Operator },
    #[error("action '{kind}' requires a value or a calculation")]
    MissingValue { kind: ActionKind },
    #[error("action '{kind}' requires a multiplier or a calculation")]
    MissingMultiplier { kind: ActionKind },
    #[error("action multiplier must be a finite number")]
    InvalidMultiplier,
}

/// Wire shape of a condition, before the schema is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
}

/// Field/operator/value predicate whose operator always fits the field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConditionSpec", into = "ConditionSpec")]
pub struct Condition {
    field: String,
    operator: Operator,
    value: ConditionValue,
    field_type: Option<FieldType>,
}

/// Editor change applied to a condition node.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEdit {
    SetField(String),
    SetType(FieldType),
    SetOperator(Operator),
    SetValue(ConditionValue),
}

impl Condition {
    /// Build a condition whose type is inferred from the field name.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Result<Self, RuleError> {
        Self::try_from(ConditionSpec {
            field: field.into(),
            operator,
            value: value.into(),
            field_type: None,
        })
    }

    /// Build a condition with an explicitly declared type.
    pub fn typed(
        field: impl Into<String>,
        field_type: FieldType,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Result<Self, RuleError> {
        Self::try_from(ConditionSpec {
            field: field.into(),
            operator,
            value: value.into(),
            field_type: Some(field_type),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    pub fn declared_type(&self) -> Option<FieldType> {
        self.field_type
    }

    /// Declared type, or the type inferred from the field name.
    pub fn field_type(&self) -> FieldType {
        self.field_type
            .unwrap_or_else(|| infer_field_type(&self.field))
    }

    /// Apply an editor change. A field change re-infers the type, resets the
    /// operator to that type's default and clears the value.
    pub fn apply(&self, edit: ConditionEdit) -> Result<Self, RuleError> {
        let mut next = self.clone();
        match edit {
            ConditionEdit::SetField(field) => {
                let field_type = infer_field_type(&field);
                next.field = field;
                next.field_type = None;
                next.operator = field_type.default_operator();
                next.value = field_type.empty_value();
            }
            ConditionEdit::SetType(field_type) => {
                next.field_type = Some(field_type);
                next.operator = field_type.default_operator();
                next.value = field_type.empty_value();
            }
            ConditionEdit::SetOperator(operator) => next.operator = operator,
            ConditionEdit::SetValue(value) => next.value = value,
        }
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.field.trim().is_empty() {
            return Err(RuleError::EmptyField);
        }

        let field_type = self.field_type();
        if !field_type.allows(self.operator) {
            return Err(RuleError::OperatorNotAllowed {
                field: self.field.clone(),
                operator: self.operator,
                field_type,
            });
        }

        match self.operator {
            Operator::Regex => {
                let pattern = self
                    .value
                    .as_scalar()
                    .and_then(Scalar::as_text)
                    .unwrap_or_default();
                if Regex::new(pattern).is_err() {
                    return Err(RuleError::InvalidPattern {
                        field: self.field.clone(),
                        pattern: self.value.to_string(),
                    });
                }
            }
            Operator::ContainsAll | Operator::ContainsAny => {
                if !matches!(self.value, ConditionValue::List(_)) {
                    return Err(RuleError::ExpectedList {
                        field: self.field.clone(),
                        operator: self.operator,
                    });
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl TryFrom<ConditionSpec> for Condition {
    type Error = RuleError;

    fn try_from(spec: ConditionSpec) -> Result<Self, Self::Error> {
        let condition = Condition {
            field: spec.field,
            operator: spec.operator,
            value: spec.value,
            field_type: spec.field_type,
        };
        condition.validate()?;
        Ok(condition)
    }
}

impl From<Condition> for ConditionSpec {
    fn from(condition: Condition) -> Self {
        ConditionSpec {
            field: condition.field,
            operator: condition.operator,
            value: condition.value,
            field_type: condition.field_type,
        }
    }
}

/// How the conditions of a rule combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
    #[serde(alias = "not")]
    Not,
    #[serde(alias = "xor")]
    Xor,
}

impl LogicalOperator {
    pub const fn label(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
            LogicalOperator::Xor => "XOR",
        }
    }

    /// Combine per-condition outcomes. `Not` holds when no condition holds,
    /// `Xor` when exactly one does.
    pub fn combine(self, outcomes: &[bool]) -> bool {
        let held = outcomes.iter().filter(|outcome| **outcome).count();
        match self {
            LogicalOperator::And => !outcomes.is_empty() && held == outcomes.len(),
            LogicalOperator::Or => held > 0,
            LogicalOperator::Not => held == 0,
            LogicalOperator::Xor => held == 1,
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome a rule produces when its conditions hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SetLimit,
    AdjustInterestRate,
    Approve,
    Reject,
    RequireReview,
    SetApprovalLevel,
    MultiplyLimit,
    AddFee,
    SetPriority,
    FlagForVerification,
    Notify,
    LimitAdjustment,
    Custom,
}

impl ActionKind {
    pub const ALL: [ActionKind; 13] = [
        ActionKind::SetLimit,
        ActionKind::AdjustInterestRate,
        ActionKind::Approve,
        ActionKind::Reject,
        ActionKind::RequireReview,
        ActionKind::SetApprovalLevel,
        ActionKind::MultiplyLimit,
        ActionKind::AddFee,
        ActionKind::SetPriority,
        ActionKind::FlagForVerification,
        ActionKind::Notify,
        ActionKind::LimitAdjustment,
        ActionKind::Custom,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ActionKind::SetLimit => "set_limit",
            ActionKind::AdjustInterestRate => "adjust_interest_rate",
            ActionKind::Approve => "approve",
            ActionKind::Reject => "reject",
            ActionKind::RequireReview => "require_review",
            ActionKind::SetApprovalLevel => "set_approval_level",
            ActionKind::MultiplyLimit => "multiply_limit",
            ActionKind::AddFee => "add_fee",
            ActionKind::SetPriority => "set_priority",
            ActionKind::FlagForVerification => "flag_for_verification",
            ActionKind::Notify => "notify",
            ActionKind::LimitAdjustment => "limit_adjustment",
            ActionKind::Custom => "custom",
        }
    }

    pub const fn carries_value(self) -> bool {
        matches!(
            self,
            ActionKind::SetLimit
                | ActionKind::AdjustInterestRate
                | ActionKind::SetApprovalLevel
                | ActionKind::AddFee
                | ActionKind::SetPriority
                | ActionKind::LimitAdjustment
        )
    }

    pub const fn carries_multiplier(self) -> bool {
        matches!(self, ActionKind::MultiplyLimit)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wire shape of an action, before the schema is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Scalar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActionSpec", into = "ActionSpec")]
pub struct Action {
    kind: ActionKind,
    value: Option<Scalar>,
    multiplier: Option<f64>,
    calculation: Option<String>,
    parameters: BTreeMap<String, Scalar>,
}

/// Editor change applied to an action node.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEdit {
    SetKind(ActionKind),
    SetValue(Option<Scalar>),
    SetMultiplier(Option<f64>),
    SetCalculation(Option<String>),
    SetParameter { key: String, value: Option<Scalar> },
}

impl Action {
    /// Action with the defaults its kind requires (value 0, multiplier 1).
    pub fn new(kind: ActionKind) -> Self {
        Action {
            kind,
            value: kind.carries_value().then_some(Scalar::Number(0.0)),
            multiplier: kind.carries_multiplier().then_some(1.0),
            calculation: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_value(kind: ActionKind, value: impl Into<Scalar>) -> Result<Self, RuleError> {
        Self::try_from(ActionSpec {
            kind,
            value: Some(value.into()),
            multiplier: None,
            calculation: None,
            parameters: BTreeMap::new(),
        })
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    pub fn multiplier(&self) -> Option<f64> {
        self.multiplier
    }

    pub fn calculation(&self) -> Option<&str> {
        self.calculation.as_deref()
    }

    pub fn parameters(&self) -> &BTreeMap<String, Scalar> {
        &self.parameters
    }

    /// Apply an editor change. Switching kind resets value and multiplier to
    /// the new kind's defaults.
    pub fn apply(&self, edit: ActionEdit) -> Result<Self, RuleError> {
        let mut next = self.clone();
        match edit {
            ActionEdit::SetKind(kind) => {
                let parameters = std::mem::take(&mut next.parameters);
                let calculation = next.calculation.take();
                next = Action::new(kind);
                next.parameters = parameters;
                next.calculation = calculation;
            }
            ActionEdit::SetValue(value) => next.value = value,
            ActionEdit::SetMultiplier(multiplier) => next.multiplier = multiplier,
            ActionEdit::SetCalculation(calculation) => {
                next.calculation = calculation.filter(|text| !text.trim().is_empty())
            }
            ActionEdit::SetParameter { key, value } => match value {
                Some(value) => {
                    next.parameters.insert(key, value);
                }
                None => {
                    next.parameters.remove(&key);
                }
            },
        }
        next.validate()?;
        Ok(next)
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        let calculated = self.calculation.is_some();
        if self.kind.carries_value() && self.value.is_none() && !calculated {
            return Err(RuleError::MissingValue { kind: self.kind });
        }
        if self.kind.carries_multiplier() && self.multiplier.is_none() && !calculated {
            return Err(RuleError::MissingMultiplier { kind: self.kind });
        }
        if self.multiplier.is_some_and(|multiplier| !multiplier.is_finite()) {
            return Err(RuleError::InvalidMultiplier);
        }
        Ok(())
    }
}

impl TryFrom<ActionSpec> for Action {
    type Error = RuleError;

    fn try_from(spec: ActionSpec) -> Result<Self, Self::Error> {
        let action = Action {
            kind: spec.kind,
            value: spec.value,
            multiplier: spec.multiplier,
            calculation: spec.calculation,
            parameters: spec.parameters,
        };
        action.validate()?;
        Ok(action)
    }
}

impl From<Action> for ActionSpec {
    fn from(action: Action) -> Self {
        ActionSpec {
            kind: action.kind,
            value: action.value,
            multiplier: action.multiplier,
            calculation: action.calculation,
            parameters: action.parameters,
        }
    }
}

/// Lending stage a rule participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationScope {
    #[default]
    All,
    Eligibility,
    Scoring,
    Pricing,
    Approval,
}

impl EvaluationScope {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationScope::All => "all",
            EvaluationScope::Eligibility => "eligibility",
            EvaluationScope::Scoring => "scoring",
            EvaluationScope::Pricing => "pricing",
            EvaluationScope::Approval => "approval",
        }
    }
}

/// Descriptive and scheduling attributes of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub scope: EvaluationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_segment: Option<String>,
    #[serde(default)]
    pub evaluation_order: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_mandatory: bool,
}

fn default_active() -> bool {
    true
}

impl RuleMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        RuleMetadata {
            name: name.into(),
            description: description.into(),
            scope: EvaluationScope::All,
            product_type: None,
            customer_segment: None,
            evaluation_order: 0,
            is_active: true,
            is_mandatory: false,
        }
    }
}

/// Canonical rule record exchanged with the rule backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    #[serde(flatten)]
    metadata: RuleMetadata,
    conditions: Vec<Condition>,
    #[serde(default)]
    logical_operator: LogicalOperator,
    actions: Vec<Action>,
}

impl RuleDefinition {
    pub fn new(metadata: RuleMetadata) -> Self {
        RuleDefinition {
            metadata,
            conditions: Vec::new(),
            logical_operator: LogicalOperator::And,
            actions: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        metadata: RuleMetadata,
        conditions: Vec<Condition>,
        logical_operator: LogicalOperator,
        actions: Vec<Action>,
    ) -> Self {
        RuleDefinition {
            metadata,
            conditions,
            logical_operator,
            actions,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_logical_operator(mut self, operator: LogicalOperator) -> Self {
        self.logical_operator = operator;
        self
    }

    pub fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn logical_operator(&self) -> LogicalOperator {
        self.logical_operator
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// A rule can be persisted once it has at least one condition and one action.
    pub fn is_savable(&self) -> bool {
        !self.conditions.is_empty() && !self.actions.is_empty()
    }
}
