//! Central-bank lending limits and the pricing calculators derived from them.

use serde::{Deserialize, Serialize};

/// Regulatory lending limits. Rates are annual fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LendingLimits {
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    pub max_loan_term_months: f64,
    pub min_interest_rate: f64,
    pub max_interest_rate: f64,
    pub salary_rule_ratio: f64,
    pub grace_period_days: u32,
    pub late_fee_rate: f64,
}

pub const LONG_TERM_WARNING_MONTHS: f64 = 48.0;
const LARGE_LOAN: f64 = 1_000_000.0;
const SMALL_LOAN: f64 = 50_000.0;
const LONG_TERM_PRICING_MONTHS: f64 = 36.0;
const EXTRA_GRACE_DAYS: u32 = 7;
const LATE_FEE_PERIOD_DAYS: u32 = 30;
const LATE_FEE_STEP_RATE: f64 = 0.01;
const DEFAULT_CREDIT_SCORE: f64 = 700.0;

impl Default for LendingLimits {
    fn default() -> Self {
        LendingLimits {
            min_loan_amount: 1_000.0,
            max_loan_amount: 5_000_000.0,
            max_loan_term_months: 60.0,
            min_interest_rate: 0.12,
            max_interest_rate: 0.25,
            salary_rule_ratio: 1.0 / 3.0,
            grace_period_days: 30,
            late_fee_rate: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Individual,
    Business,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub loan_amount: f64,
    pub monthly_income: f64,
    pub loan_term_months: f64,
    /// Overrides the straight-line `amount / term` installment.
    #[serde(default)]
    pub monthly_payment: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitViolation {
    pub rule: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_allowed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_required: Option<f64>,
    pub proposed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitWarning {
    pub rule: String,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loan_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loan_term: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_monthly_payment: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitAssessment {
    pub compliant: bool,
    pub violations: Vec<LimitViolation>,
    pub warnings: Vec<LimitWarning>,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingReport {
    pub compliance: LimitAssessment,
    pub grace_period_days: u32,
    pub late_fee_example: f64,
    pub max_affordable_loan: f64,
    pub recommended_interest_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LendingLimitValidator {
    limits: LendingLimits,
}

impl LendingLimitValidator {
    pub fn new(limits: LendingLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &LendingLimits {
        &self.limits
    }

    pub fn validate(&self, request: &LoanRequest) -> LimitAssessment {
        let limits = &self.limits;
        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let mut recommendations = Recommendations::default();
        let amount = request.loan_amount;
        let term = request.loan_term_months;

        if amount < limits.min_loan_amount {
            violations.push(LimitViolation {
                rule: "Minimum loan amount".to_string(),
                description: format!(
                    "Loan amount ({} ETB) is below the minimum threshold ({} ETB)",
                    group_thousands(amount),
                    group_thousands(limits.min_loan_amount)
                ),
                max_allowed: None,
                min_required: Some(limits.min_loan_amount),
                proposed: amount,
            });
        }
        if amount > limits.max_loan_amount {
            violations.push(LimitViolation {
                rule: "Maximum loan amount".to_string(),
                description: format!(
                    "Loan amount ({} ETB) exceeds the maximum threshold ({} ETB)",
                    group_thousands(amount),
                    group_thousands(limits.max_loan_amount)
                ),
                max_allowed: Some(limits.max_loan_amount),
                min_required: None,
                proposed: amount,
            });
        }

        if term > limits.max_loan_term_months {
            violations.push(LimitViolation {
                rule: "Maximum loan term".to_string(),
                description: format!(
                    "Loan term ({term} months) exceeds the maximum allowed ({} months)",
                    limits.max_loan_term_months
                ),
                max_allowed: Some(limits.max_loan_term_months),
                min_required: None,
                proposed: term,
            });
            recommendations.max_loan_term = Some(limits.max_loan_term_months);
        }

        let max_payment = request.monthly_income * limits.salary_rule_ratio;
        let proposed_payment = request
            .monthly_payment
            .filter(|payment| *payment > 0.0)
            .or_else(|| (term > 0.0).then(|| amount / term))
            .unwrap_or(amount);

        if proposed_payment > max_payment {
            violations.push(LimitViolation {
                rule: "1/3 salary rule".to_string(),
                description: format!(
                    "Proposed monthly payment ({} ETB) exceeds 1/3 of monthly income ({} ETB)",
                    group_thousands(proposed_payment),
                    group_thousands(max_payment)
                ),
                max_allowed: Some(max_payment),
                min_required: None,
                proposed: proposed_payment,
            });
            recommendations.max_monthly_payment = Some(max_payment);
            recommendations.max_loan_amount = Some(max_payment * term);
        } else if proposed_payment > max_payment * 0.9 {
            warnings.push(LimitWarning {
                rule: "1/3 salary rule".to_string(),
                description: "Monthly payment is close to the 1/3 salary limit".to_string(),
                recommendation:
                    "Consider reducing the loan amount or extending the term to provide more buffer"
                        .to_string(),
            });
        }

        if let Some(rate) = request.interest_rate {
            if rate < limits.min_interest_rate {
                violations.push(LimitViolation {
                    rule: "Minimum interest rate".to_string(),
                    description: format!(
                        "Interest rate ({:.2}%) is below the minimum threshold ({:.2}%)",
                        rate * 100.0,
                        limits.min_interest_rate * 100.0
                    ),
                    max_allowed: None,
                    min_required: Some(limits.min_interest_rate),
                    proposed: rate,
                });
                recommendations.suggested_interest_rate = Some(limits.min_interest_rate);
            }
            if rate > limits.max_interest_rate {
                violations.push(LimitViolation {
                    rule: "Maximum interest rate".to_string(),
                    description: format!(
                        "Interest rate ({:.2}%) exceeds the maximum threshold ({:.2}%)",
                        rate * 100.0,
                        limits.max_interest_rate * 100.0
                    ),
                    max_allowed: Some(limits.max_interest_rate),
                    min_required: None,
                    proposed: rate,
                });
                recommendations.suggested_interest_rate = Some(limits.max_interest_rate);
            }
        }

        if term > LONG_TERM_WARNING_MONTHS {
            warnings.push(LimitWarning {
                rule: "Long loan term".to_string(),
                description: "Loan term exceeds 4 years".to_string(),
                recommendation:
                    "Longer terms may increase default risk. Consider shorter terms if possible"
                        .to_string(),
            });
        }

        LimitAssessment {
            compliant: violations.is_empty(),
            violations,
            warnings,
            recommendations,
        }
    }

    /// Risk-priced annual rate on a 300..850 score scale, clamped to the regulatory band and
    /// rounded to four decimals.
    pub fn compliant_interest_rate(
        &self,
        credit_score: f64,
        loan_amount: f64,
        term_months: f64,
        customer_type: CustomerType,
    ) -> f64 {
        let limits = &self.limits;
        let spread = limits.max_interest_rate - limits.min_interest_rate;
        let mut rate = limits.min_interest_rate + (850.0 - credit_score) / 550.0 * spread * 0.6;

        if loan_amount > LARGE_LOAN {
            rate += 0.02;
        } else if loan_amount < SMALL_LOAN {
            rate -= 0.01;
        }
        if term_months > LONG_TERM_PRICING_MONTHS {
            rate += 0.01;
        }
        if customer_type == CustomerType::Business {
            rate += 0.01;
        }

        let clamped = rate.clamp(limits.min_interest_rate, limits.max_interest_rate);
        (clamped * 10_000.0).round() / 10_000.0
    }

    /// Largest principal whose installment fits the salary rule. Without a rate the installment
    /// is straight-line; with one it is the present value of the annuity, capped at the
    /// maximum loan amount.
    pub fn max_affordable_loan(
        &self,
        monthly_income: f64,
        term_months: f64,
        interest_rate: Option<f64>,
    ) -> f64 {
        let max_payment = monthly_income * self.limits.salary_rule_ratio;
        match interest_rate.filter(|rate| *rate > 0.0) {
            None => max_payment * term_months,
            Some(rate) => {
                let monthly_rate = rate / 12.0;
                let factor = (1.0 - (1.0 + monthly_rate).powf(-term_months)) / monthly_rate;
                (max_payment * factor).min(self.limits.max_loan_amount)
            }
        }
    }

    pub fn grace_period_days(
        &self,
        loan_amount: f64,
        term_months: f64,
        customer_type: CustomerType,
    ) -> u32 {
        let mut days = self.limits.grace_period_days;
        if loan_amount > LARGE_LOAN {
            days += EXTRA_GRACE_DAYS;
        }
        if term_months > LONG_TERM_PRICING_MONTHS {
            days += EXTRA_GRACE_DAYS;
        }
        if customer_type == CustomerType::Business {
            days += EXTRA_GRACE_DAYS;
        }
        days
    }

    /// Base late fee plus one percent for every full period past the first.
    pub fn late_fee(&self, overdue_amount: f64, days_overdue: u32) -> f64 {
        if days_overdue == 0 || overdue_amount <= 0.0 {
            return 0.0;
        }
        let base = overdue_amount * self.limits.late_fee_rate;
        if days_overdue <= LATE_FEE_PERIOD_DAYS {
            return base;
        }
        let extra_periods = (days_overdue - LATE_FEE_PERIOD_DAYS) / LATE_FEE_PERIOD_DAYS;
        base + overdue_amount * LATE_FEE_STEP_RATE * f64::from(extra_periods)
    }

    pub fn report(&self, request: &LoanRequest, customer_type: CustomerType) -> LendingReport {
        let installment = if request.loan_term_months > 0.0 {
            request.loan_amount / request.loan_term_months
        } else {
            request.loan_amount
        };

        LendingReport {
            compliance: self.validate(request),
            grace_period_days: self.grace_period_days(
                request.loan_amount,
                request.loan_term_months,
                customer_type,
            ),
            late_fee_example: self.late_fee(installment, 35),
            max_affordable_loan: self.max_affordable_loan(
                request.monthly_income,
                request.loan_term_months,
                request.interest_rate,
            ),
            recommended_interest_rate: request.interest_rate.unwrap_or_else(|| {
                self.compliant_interest_rate(
                    DEFAULT_CREDIT_SCORE,
                    request.loan_amount,
                    request.loan_term_months,
                    customer_type,
                )
            }),
        }
    }
}

/// `1234567.5` -> `1,234,567.5`; at most two fraction digits.
pub fn group_thousands(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let whole = rounded.abs().trunc() as u64;
    let cents = ((rounded.abs() - rounded.abs().trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = match cents {
        0 => String::new(),
        c if c % 10 == 0 => format!(".{}", c / 10),
        c => format!(".{c:02}"),
    };
    format!("{}{grouped}{fraction}", if negative { "-" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64, income: f64, term: f64) -> LoanRequest {
        LoanRequest {
            loan_amount: amount,
            monthly_income: income,
            loan_term_months: term,
            monthly_payment: None,
            interest_rate: None,
        }
    }

    #[test]
    fn salary_rule_violation_recommends_a_smaller_loan() {
        let assessment = LendingLimitValidator::default().validate(&request(240_000.0, 30_000.0, 12.0));

        assert!(!assessment.compliant);
        assert_eq!(assessment.violations[0].rule, "1/3 salary rule");
        assert_eq!(
            assessment.violations[0].description,
            "Proposed monthly payment (20,000 ETB) exceeds 1/3 of monthly income (10,000 ETB)"
        );
        let suggested = assessment
            .recommendations
            .max_loan_amount
            .expect("suggested amount");
        assert!((suggested - 120_000.0).abs() < 1e-6);
    }

    #[test]
    fn amount_term_and_rate_limits() {
        let mut loan = request(500.0, 100_000.0, 72.0);
        loan.interest_rate = Some(0.3);
        let assessment = LendingLimitValidator::default().validate(&loan);

        let rules: Vec<&str> = assessment
            .violations
            .iter()
            .map(|violation| violation.rule.as_str())
            .collect();
        assert_eq!(
            rules,
            ["Minimum loan amount", "Maximum loan term", "Maximum interest rate"]
        );
        assert_eq!(assessment.recommendations.max_loan_term, Some(60.0));
        assert_eq!(assessment.recommendations.suggested_interest_rate, Some(0.25));
        assert!(assessment
            .warnings
            .iter()
            .any(|warning| warning.rule == "Long loan term"));
    }

    #[test]
    fn interest_rate_tracks_risk_and_stays_in_band() {
        let validator = LendingLimitValidator::default();
        assert_eq!(
            validator.compliant_interest_rate(850.0, 100_000.0, 12.0, CustomerType::Individual),
            0.12
        );
        assert_eq!(
            validator.compliant_interest_rate(300.0, 2_000_000.0, 48.0, CustomerType::Business),
            0.238
        );
        // 0.12 + (850 - 575) / 550 * 0.13 * 0.6 = 0.159
        assert_eq!(
            validator.compliant_interest_rate(575.0, 100_000.0, 24.0, CustomerType::Individual),
            0.159
        );
    }

    #[test]
    fn affordable_loan_with_and_without_interest() {
        let validator = LendingLimitValidator::default();
        assert!((validator.max_affordable_loan(30_000.0, 12.0, None) - 120_000.0).abs() < 1e-6);

        let priced = validator.max_affordable_loan(30_000.0, 12.0, Some(0.12));
        assert!(priced < 120_000.0);
        assert!((priced - 112_550.77).abs() < 0.01);

        assert_eq!(
            validator.max_affordable_loan(3_000_000.0, 60.0, Some(0.12)),
            5_000_000.0
        );
    }

    #[test]
    fn grace_period_and_late_fee_schedule() {
        let validator = LendingLimitValidator::default();
        assert_eq!(
            validator.grace_period_days(2_000_000.0, 48.0, CustomerType::Business),
            51
        );
        assert_eq!(validator.late_fee(1_000.0, 0), 0.0);
        assert!((validator.late_fee(1_000.0, 20) - 20.0).abs() < 1e-9);
        assert!((validator.late_fee(1_000.0, 95) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn report_prices_with_the_default_score() {
        let report = LendingLimitValidator::default()
            .report(&request(120_000.0, 30_000.0, 12.0), CustomerType::Individual);
        assert!(report.compliance.compliant);
        assert_eq!(report.grace_period_days, 30);
        assert!((report.late_fee_example - 200.0).abs() < 1e-9);
        assert!(report.recommended_interest_rate > 0.12);
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(5_000_000.0), "5,000,000");
        assert_eq!(group_thousands(16_666.666), "16,666.67");
        assert_eq!(group_thousands(999.5), "999.5");
    }
}
