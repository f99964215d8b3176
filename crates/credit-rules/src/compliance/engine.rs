use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::thresholds::{ComplianceThresholds, EXISTING_DEBT_SERVICE_RATIO};
use crate::FieldMap;

const EPSILON: f64 = 1e-6;
const MIN_TENURE_YEARS: f64 = 0.5;
const MIN_AGE: f64 = 18.0;
const MAX_AGE: f64 = 100.0;
const MIN_RETIREMENT_AGE: f64 = 55.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComplianceError {
    #[error("Loan term must be greater than 0")]
    NonPositiveTerm { term_months: f64 },
}

/// Verdict of one check. `valid == false` always carries an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        CheckOutcome {
            valid: true,
            ..Default::default()
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        CheckOutcome {
            valid: false,
            error: Some(error.into()),
            warning: None,
        }
    }

    pub fn warn(warning: impl Into<String>) -> Self {
        CheckOutcome {
            valid: true,
            error: None,
            warning: Some(warning.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub valid: bool,
    pub violations: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ComplianceResult {
    fn record(&mut self, field: &str, value: Option<Value>, outcome: CheckOutcome) {
        if let Some(message) = outcome.error {
            self.violations.push(Issue {
                field: field.to_string(),
                message,
                value: value.clone(),
            });
        }
        if let Some(message) = outcome.warning {
            self.warnings.push(Issue {
                field: field.to_string(),
                message,
                value,
            });
        }
    }

    fn finish(mut self) -> Self {
        self.valid = self.violations.is_empty();
        self
    }
}

/// Salary-rule arithmetic for one loan request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityAssessment {
    pub monthly_payment: f64,
    pub max_affordable_payment: f64,
    pub existing_debt_service: f64,
    pub total_obligation: f64,
    /// Amount by which the obligation exceeds the ceiling; zero when within it.
    pub overage: f64,
    pub within_limit: bool,
    pub near_limit: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    thresholds: ComplianceThresholds,
}

impl ComplianceEngine {
    pub fn new(thresholds: ComplianceThresholds) -> Self {
        Self {
            thresholds: thresholds.sanitized(),
        }
    }

    pub fn thresholds(&self) -> &ComplianceThresholds {
        &self.thresholds
    }

    pub fn assess_affordability(
        &self,
        loan_amount: f64,
        monthly_income: f64,
        term_months: f64,
        existing_debt: Option<f64>,
    ) -> Result<AffordabilityAssessment, ComplianceError> {
        if term_months <= 0.0 {
            return Err(ComplianceError::NonPositiveTerm { term_months });
        }

        let monthly_payment = loan_amount / term_months;
        let max_affordable_payment = monthly_income * self.thresholds.salary_rule_ratio;
        let existing_debt_service = existing_debt.unwrap_or(0.0) * EXISTING_DEBT_SERVICE_RATIO;
        let total_obligation = monthly_payment + existing_debt_service;
        let within_limit = total_obligation <= max_affordable_payment + EPSILON;
        let near_limit = total_obligation
            > max_affordable_payment * self.thresholds.affordability_warning_ratio + EPSILON;

        Ok(AffordabilityAssessment {
            monthly_payment,
            max_affordable_payment,
            existing_debt_service,
            total_obligation,
            overage: (total_obligation - max_affordable_payment).max(0.0),
            within_limit,
            near_limit,
        })
    }

    pub fn affordability(
        &self,
        loan_amount: f64,
        monthly_income: f64,
        term_months: f64,
        existing_debt: Option<f64>,
    ) -> CheckOutcome {
        let assessment =
            match self.assess_affordability(loan_amount, monthly_income, term_months, existing_debt)
            {
                Ok(assessment) => assessment,
                Err(err) => return CheckOutcome::fail(err.to_string()),
            };

        if !assessment.within_limit {
            return CheckOutcome::fail(format!(
                "Total monthly payment ({:.2} ETB) exceeds {} of monthly income ({:.2} ETB) - NBE compliance violation",
                assessment.total_obligation,
                self.thresholds.salary_rule_label(),
                assessment.max_affordable_payment,
            ));
        }
        if assessment.near_limit {
            return CheckOutcome::warn(format!(
                "Monthly payment is close to the {} salary limit. Consider reducing loan amount or extending term.",
                self.thresholds.salary_rule_label(),
            ));
        }
        CheckOutcome::pass()
    }

    pub fn income_expenses(&self, monthly_income: f64, monthly_expenses: f64) -> CheckOutcome {
        if monthly_expenses > monthly_income + EPSILON {
            return CheckOutcome::fail("Monthly expenses cannot exceed monthly income");
        }
        if monthly_expenses > monthly_income * self.thresholds.expense_warning_ratio + EPSILON {
            return CheckOutcome::warn(format!(
                "Expenses are very high relative to income (over {:.0}%)",
                self.thresholds.expense_warning_ratio * 100.0
            ));
        }
        CheckOutcome::pass()
    }

    pub fn credit_utilization(
        &self,
        total_debt: f64,
        utilization_pct: f64,
        credit_limit: Option<f64>,
    ) -> CheckOutcome {
        if !(0.0..=100.0).contains(&utilization_pct) {
            return CheckOutcome::fail("Credit utilization ratio must be between 0 and 100");
        }

        if let Some(limit) = credit_limit.filter(|limit| *limit > 0.0) {
            let computed = total_debt / limit * 100.0;
            if (computed - utilization_pct).abs() > self.thresholds.utilization_tolerance_pct + EPSILON
            {
                return CheckOutcome::fail(format!(
                    "Credit utilization ratio ({utilization_pct}%) doesn't match calculated ratio ({computed:.2}%) based on debt and credit limit"
                ));
            }
        }

        if utilization_pct > self.thresholds.utilization_warning_pct {
            return CheckOutcome::warn(format!(
                "High credit utilization ratio (>{}%) may negatively impact credit score",
                self.thresholds.utilization_warning_pct
            ));
        }
        CheckOutcome::pass()
    }

    pub fn employment_stability(
        &self,
        employment_status: &str,
        years_employed: f64,
        monthly_income: f64,
    ) -> CheckOutcome {
        match normalize_status(employment_status).as_str() {
            "unemployed" => self.unemployed_income(employment_status, monthly_income),
            "employed" if years_employed < 0.0 => {
                CheckOutcome::fail("Years employed must be non-negative for employed status")
            }
            "employed" if years_employed < MIN_TENURE_YEARS => CheckOutcome::warn(
                "Very short employment tenure (<6 months) may impact credit assessment",
            ),
            _ => CheckOutcome::pass(),
        }
    }

    /// The part of the employment check that needs no tenure.
    pub fn unemployed_income(&self, employment_status: &str, monthly_income: f64) -> CheckOutcome {
        if normalize_status(employment_status) == "unemployed" && monthly_income > 0.0 {
            return CheckOutcome::fail(
                "Cannot have monthly income if employment status is unemployed",
            );
        }
        CheckOutcome::pass()
    }

    pub fn age_employment(
        &self,
        age: f64,
        employment_status: &str,
        years_employed: f64,
    ) -> CheckOutcome {
        if age < MIN_AGE {
            return CheckOutcome::fail("Age must be at least 18 years");
        }
        if age > MAX_AGE {
            return CheckOutcome::fail("Age cannot exceed 100 years");
        }
        if years_employed > age - MIN_AGE {
            return CheckOutcome::fail("Years employed cannot exceed age minus 18");
        }
        if normalize_status(employment_status) == "retired" && age < MIN_RETIREMENT_AGE {
            return CheckOutcome::fail("Retirement status typically requires age 55 or older");
        }
        CheckOutcome::pass()
    }

    /// Debt-to-income ceiling. Skipped when there is no income to compare against.
    pub fn debt_to_income(&self, total_debt: f64, monthly_income: f64) -> CheckOutcome {
        if monthly_income <= 0.0 {
            return CheckOutcome::pass();
        }
        let ratio = total_debt / monthly_income * 100.0;
        if ratio > self.thresholds.max_dti_pct + EPSILON {
            return CheckOutcome::fail(format!(
                "Debt-to-income ratio ({ratio:.2}%) exceeds the maximum of {}%",
                self.thresholds.max_dti_pct
            ));
        }
        CheckOutcome::pass()
    }

    /// Loan-to-value ceiling. Skipped for unsecured loans.
    pub fn loan_to_value(&self, loan_amount: f64, collateral_value: f64) -> CheckOutcome {
        if collateral_value <= 0.0 {
            return CheckOutcome::pass();
        }
        let ratio = loan_amount / collateral_value * 100.0;
        if ratio > self.thresholds.max_ltv_pct + EPSILON {
            return CheckOutcome::fail(format!(
                "Loan-to-value ratio ({ratio:.2}%) exceeds the maximum of {}%",
                self.thresholds.max_ltv_pct
            ));
        }
        CheckOutcome::pass()
    }

    /// Run the cross-field consistency checks whose inputs are present.
    pub fn evaluate_core(&self, fields: &FieldMap) -> ComplianceResult {
        let reader = FieldReader::new(fields);
        let mut result = ComplianceResult::default();
        self.run_core(&reader, &mut result);
        result.violations.extend(reader.into_malformed());
        result.finish()
    }

    /// Core checks plus the debt-to-income and loan-to-value ceilings.
    pub fn evaluate(&self, fields: &FieldMap) -> ComplianceResult {
        let reader = FieldReader::new(fields);
        let mut result = ComplianceResult::default();
        self.run_core(&reader, &mut result);

        if let (Some(debt), Some(income)) =
            (reader.number("total_debt"), reader.number("monthly_income"))
        {
            result.record(
                "total_debt",
                reader.raw("total_debt"),
                self.debt_to_income(debt, income),
            );
        }
        if let (Some(amount), Some(collateral)) =
            (reader.number("loan_amount"), reader.number("collateral_value"))
        {
            result.record(
                "collateral_value",
                reader.raw("collateral_value"),
                self.loan_to_value(amount, collateral),
            );
        }

        result.violations.extend(reader.into_malformed());
        let result = result.finish();
        debug!(
            valid = result.valid,
            violations = result.violations.len(),
            warnings = result.warnings.len(),
            "compliance evaluated"
        );
        result
    }

    fn run_core(&self, reader: &FieldReader<'_>, result: &mut ComplianceResult) {
        let income = reader.number("monthly_income");
        let status = reader.text("employment_status");
        let years = reader.number("years_employed");

        if let (Some(amount), Some(income), Some(term)) = (
            reader.number("loan_amount"),
            income,
            reader.number("loan_term_months"),
        ) {
            let outcome = self.affordability(amount, income, term, reader.number("total_debt"));
            result.record("loan_amount", reader.raw("loan_amount"), outcome);
        }

        if let (Some(income), Some(expenses)) = (income, reader.number("monthly_expenses")) {
            result.record(
                "monthly_expenses",
                reader.raw("monthly_expenses"),
                self.income_expenses(income, expenses),
            );
        }

        if let Some(ratio) = reader.number("credit_utilization_ratio") {
            // The declared ratio is only cross-checked when both debt and limit are known.
            let outcome = match reader.number("total_debt") {
                Some(debt) => self.credit_utilization(debt, ratio, reader.number("credit_limit")),
                None => self.credit_utilization(0.0, ratio, None),
            };
            result.record(
                "credit_utilization_ratio",
                reader.raw("credit_utilization_ratio"),
                outcome,
            );
        }

        if let Some(status) = status.as_deref() {
            let income = income.unwrap_or(0.0);
            let outcome = match years {
                Some(years) => self.employment_stability(status, years, income),
                None => self.unemployed_income(status, income),
            };
            result.record("employment_status", reader.raw("employment_status"), outcome);
        }

        if let Some(age) = reader.number("age") {
            result.record(
                "age",
                reader.raw("age"),
                self.age_employment(age, status.as_deref().unwrap_or_default(), years.unwrap_or(0.0)),
            );
        }
    }
}

pub(crate) fn normalize_status(status: &str) -> String {
    status.trim().to_lowercase()
}

/// Lenient typed view over a flat field map. Numbers may arrive as JSON numbers or numeric
/// strings; anything else is remembered as malformed and reported once.
struct FieldReader<'a> {
    fields: &'a FieldMap,
    malformed: std::cell::RefCell<std::collections::BTreeMap<String, Value>>,
}

impl<'a> FieldReader<'a> {
    fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            malformed: Default::default(),
        }
    }

    fn raw(&self, field: &str) -> Option<Value> {
        self.fields.get(field).cloned()
    }

    fn number(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Null => None,
            Value::Number(number) => number.as_f64(),
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => match text.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => Some(number),
                _ => self.mark_malformed(field),
            },
            _ => self.mark_malformed(field),
        }
    }

    fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        }
    }

    fn mark_malformed(&self, field: &str) -> Option<f64> {
        if let Some(value) = self.fields.get(field) {
            self.malformed
                .borrow_mut()
                .insert(field.to_string(), value.clone());
        }
        None
    }

    fn into_malformed(self) -> Vec<Issue> {
        self.malformed
            .into_inner()
            .into_iter()
            .map(|(field, value)| Issue {
                message: format!("Field '{field}' must be a valid number"),
                field,
                value: Some(value),
            })
            .collect()
    }
}
