use serde::{Deserialize, Serialize};

pub const DEFAULT_SALARY_RULE_RATIO: f64 = 1.0 / 3.0;
pub const DEFAULT_AFFORDABILITY_WARNING_RATIO: f64 = 0.9;
pub const DEFAULT_EXPENSE_WARNING_RATIO: f64 = 0.9;
pub const DEFAULT_UTILIZATION_WARNING_PCT: f64 = 80.0;
pub const DEFAULT_UTILIZATION_TOLERANCE_PCT: f64 = 5.0;
pub const DEFAULT_MAX_DTI_PCT: f64 = 40.0;
pub const DEFAULT_MAX_LTV_PCT: f64 = 80.0;

/// Share of outstanding debt assumed to be serviced each month.
pub const EXISTING_DEBT_SERVICE_RATIO: f64 = 0.1;

/// Policy dials for the compliance checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceThresholds {
    pub salary_rule_ratio: f64,
    pub affordability_warning_ratio: f64,
    pub expense_warning_ratio: f64,
    pub utilization_warning_pct: f64,
    pub utilization_tolerance_pct: f64,
    pub max_dti_pct: f64,
    pub max_ltv_pct: f64,
}

impl ComplianceThresholds {
    /// Replace non-finite or non-positive dials with their defaults.
    pub fn sanitized(self) -> Self {
        fn dial(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        Self {
            salary_rule_ratio: dial(self.salary_rule_ratio, DEFAULT_SALARY_RULE_RATIO),
            affordability_warning_ratio: dial(
                self.affordability_warning_ratio,
                DEFAULT_AFFORDABILITY_WARNING_RATIO,
            ),
            expense_warning_ratio: dial(self.expense_warning_ratio, DEFAULT_EXPENSE_WARNING_RATIO),
            utilization_warning_pct: dial(
                self.utilization_warning_pct,
                DEFAULT_UTILIZATION_WARNING_PCT,
            ),
            utilization_tolerance_pct: dial(
                self.utilization_tolerance_pct,
                DEFAULT_UTILIZATION_TOLERANCE_PCT,
            ),
            max_dti_pct: dial(self.max_dti_pct, DEFAULT_MAX_DTI_PCT),
            max_ltv_pct: dial(self.max_ltv_pct, DEFAULT_MAX_LTV_PCT),
        }
    }

    /// Human label for the salary rule, e.g. `1/3`.
    pub fn salary_rule_label(&self) -> String {
        let denominator = 1.0 / self.salary_rule_ratio;
        if (denominator - denominator.round()).abs() < 1e-9 {
            format!("1/{}", denominator.round() as u64)
        } else {
            format!("{:.0}%", self.salary_rule_ratio * 100.0)
        }
    }
}

impl Default for ComplianceThresholds {
    fn default() -> Self {
        Self {
            salary_rule_ratio: DEFAULT_SALARY_RULE_RATIO,
            affordability_warning_ratio: DEFAULT_AFFORDABILITY_WARNING_RATIO,
            expense_warning_ratio: DEFAULT_EXPENSE_WARNING_RATIO,
            utilization_warning_pct: DEFAULT_UTILIZATION_WARNING_PCT,
            utilization_tolerance_pct: DEFAULT_UTILIZATION_TOLERANCE_PCT,
            max_dti_pct: DEFAULT_MAX_DTI_PCT,
            max_ltv_pct: DEFAULT_MAX_LTV_PCT,
        }
    }
}
