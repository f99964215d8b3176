use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FieldMap;

/// Share of outstanding debt assumed to be serviced monthly.
const DEBT_SERVICE_RATIO: f64 = 0.1;

/// Typed, total reads over resolved field values. Absent or non-numeric values read as zero,
/// absent text as the empty string.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ApplicantView<'a> {
    values: &'a FieldMap,
}

impl<'a> ApplicantView<'a> {
    pub(crate) fn new(values: &'a FieldMap) -> Self {
        Self { values }
    }

    pub(crate) fn raw(&self, field: &str) -> Option<&'a Value> {
        match self.values.get(field)? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            value => Some(value),
        }
    }

    pub(crate) fn has(&self, field: &str) -> bool {
        self.number(field) != 0.0 || matches!(self.raw(field), Some(Value::Bool(true)))
    }

    pub(crate) fn number_opt(&self, field: &str) -> Option<f64> {
        match self.raw(field)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub(crate) fn number(&self, field: &str) -> f64 {
        self.number_opt(field).unwrap_or(0.0)
    }

    pub(crate) fn count(&self, field: &str) -> u32 {
        self.number(field).max(0.0).round() as u32
    }

    pub(crate) fn text(&self, field: &str) -> String {
        match self.raw(field) {
            Some(Value::String(text)) => text.trim().to_string(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }

    pub(crate) fn text_or(&self, field: &str, fallback: &str) -> String {
        let text = self.text(field);
        if text.is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }

    pub(crate) fn flag(&self, field: &str) -> bool {
        match self.raw(field) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => matches!(
                text.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1"
            ),
            Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }

    pub(crate) fn object(&self, field: &str) -> Value {
        match self.raw(field) {
            Some(value @ Value::Object(_)) => value.clone(),
            _ => Value::Object(FieldMap::new()),
        }
    }
}

/// Affordability figures shared by several payload sections. Every ratio is guarded
/// against a zero denominator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub debt_to_income_pct: f64,
    pub savings_ratio_pct: f64,
    pub net_income: f64,
    pub projected_installment: f64,
    pub installment_to_income_pct: f64,
    pub residual_income: f64,
    pub estimated_debt_service: f64,
    pub scheduled_debt_service: f64,
    pub total_credit_limit: f64,
}

impl DerivedMetrics {
    pub fn from_values(values: &FieldMap) -> Self {
        Self::compute(&ApplicantView::new(values))
    }

    pub(crate) fn compute(view: &ApplicantView<'_>) -> Self {
        let income = view.number("monthly_income");
        let expenses = view.number("monthly_expenses");
        let total_debt = view.number("total_debt");
        let term = view.number("loan_term_months");

        let percent_of_income = |amount: f64| {
            if income > 0.0 {
                amount / income * 100.0
            } else {
                0.0
            }
        };

        let net_income = income - expenses;
        let projected_installment = if term > 0.0 {
            view.number("loan_amount") / term
        } else {
            0.0
        };
        let estimated_debt_service = total_debt * DEBT_SERVICE_RATIO;
        let utilization = view.number("credit_utilization_ratio") / 100.0;

        DerivedMetrics {
            debt_to_income_pct: percent_of_income(total_debt),
            savings_ratio_pct: percent_of_income(view.number("savings_balance")),
            net_income,
            projected_installment,
            installment_to_income_pct: percent_of_income(projected_installment),
            residual_income: net_income - projected_installment,
            estimated_debt_service,
            scheduled_debt_service: view.number("existing_loan_payments") + estimated_debt_service,
            total_credit_limit: total_debt / utilization.max(0.01),
        }
    }

    /// Passes when 85% of net income still covers the new installment.
    pub fn passes_stress_test(&self) -> bool {
        self.net_income * 0.85 >= self.projected_installment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Current,
    Late,
    Default,
}

impl PaymentStatus {
    pub fn worst(defaults: u32, late_payments: u32) -> Self {
        if defaults > 0 {
            PaymentStatus::Default
        } else if late_payments > 0 {
            PaymentStatus::Late
        } else {
            PaymentStatus::Current
        }
    }
}

/// Delinquency bucket by number of late payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelinquencyBucket {
    Current,
    PastDue30,
    PastDue60,
    PastDue90,
}

impl DelinquencyBucket {
    pub fn from_late_payments(late_payments: u32) -> Self {
        match late_payments {
            0 => DelinquencyBucket::Current,
            1..=2 => DelinquencyBucket::PastDue30,
            3..=5 => DelinquencyBucket::PastDue60,
            _ => DelinquencyBucket::PastDue90,
        }
    }
}

pub fn employment_category(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "employed" => "Salaried",
        "self_employed" => "Self-Employed",
        "unemployed" => "Unemployed",
        "retired" => "Retired",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Utilisation in percent, payment history score on 0..100.
    pub fn classify(utilization_pct: f64, payment_history: f64) -> Self {
        if utilization_pct < 30.0 && payment_history > 80.0 {
            RiskLevel::Low
        } else if utilization_pct < 60.0 && payment_history > 60.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

pub fn reason_codes(income: f64, payment_history: f64, utilization_pct: f64) -> [&'static str; 3] {
    [
        if income > 30_000.0 {
            "high_income"
        } else {
            "moderate_income"
        },
        if payment_history > 80.0 {
            "good_payment_history"
        } else {
            "fair_payment_history"
        },
        if utilization_pct < 30.0 {
            "low_utilization"
        } else {
            "moderate_utilization"
        },
    ]
}
