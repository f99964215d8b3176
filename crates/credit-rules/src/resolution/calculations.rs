//! Pure derivations used by `calculated` and `system` catalog entries.

use serde_json::{json, Value};

use super::CalculationError;
use crate::FieldMap;

fn numeric(form: &FieldMap, key: &str) -> Result<Option<f64>, CalculationError> {
    match form.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CalculationError::NotNumeric {
                input: key.to_string(),
                value: text.clone(),
            }),
        Some(other) => Err(CalculationError::NotNumeric {
            input: key.to_string(),
            value: other.to_string(),
        }),
    }
}

fn filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

pub(crate) fn utilization_trend(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let ratio = numeric(form, "credit_utilization_ratio")?.unwrap_or(0.0);
    Ok(Some(json!(ratio)))
}

/// Savings relative to monthly expenses, expressed in months of cover divided by 30.
pub(crate) fn emergency_fund_months(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let expenses = numeric(form, "monthly_expenses")?.unwrap_or(0.0);
    let savings = numeric(form, "savings_balance")?.unwrap_or(0.0);
    let months = if expenses > 0.0 && savings > 0.0 {
        (savings / expenses) / 30.0
    } else {
        0.0
    };
    Ok(Some(json!(months)))
}

pub(crate) fn savings_rate(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let income = numeric(form, "monthly_income")?.unwrap_or(0.0);
    if income <= 0.0 {
        return Ok(Some(json!(0.0)));
    }
    let savings = numeric(form, "savings_balance")?.unwrap_or(0.0);
    Ok(Some(json!(savings / income * 100.0)))
}

pub(crate) fn employment_stability_score(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let years = numeric(form, "years_employed")?.unwrap_or(0.0);
    let score = if years > 3.0 {
        0.8
    } else if years > 1.0 {
        0.6
    } else {
        0.4
    };
    Ok(Some(json!(score)))
}

pub(crate) fn industry_risk_score(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let sector = form
        .get("business_sector")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let score = match sector {
        "Technology" => 30.0,
        "Finance" => 40.0,
        "Agriculture" => 60.0,
        "Retail" => 50.0,
        "Manufacturing" => 45.0,
        _ => 50.0,
    };
    Ok(Some(json!(score)))
}

pub(crate) fn cross_sell_opportunity_score(
    _form: &FieldMap,
    customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let prior_loans = customer
        .and_then(|data| data.get("prior_loans_count_akafay"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    Ok(Some(json!(if prior_loans > 0.0 { 0.7 } else { 0.3 })))
}

/// Share of the identifying inputs (customer, amount, income) that were supplied.
pub(crate) fn prediction_confidence(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    const KEYS: [&str; 3] = ["customer_id", "loan_amount", "monthly_income"];
    let supplied = KEYS.iter().filter(|key| filled(form.get(**key))).count();
    Ok(Some(json!(supplied as f64 / KEYS.len() as f64)))
}

pub(crate) fn data_quality_score(
    form: &FieldMap,
    _customer: Option<&Value>,
) -> Result<Option<Value>, CalculationError> {
    let total = form.len().max(1);
    let supplied = form.values().filter(|value| filled(Some(value))).count();
    Ok(Some(json!((supplied as f64 / total as f64).min(1.0))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn emergency_fund_requires_both_inputs() {
        let full = form(json!({ "monthly_expenses": 5000, "savings_balance": 30000 }));
        assert_eq!(
            emergency_fund_months(&full, None).expect("calculates"),
            Some(json!(0.2))
        );

        let partial = form(json!({ "monthly_expenses": 5000 }));
        assert_eq!(
            emergency_fund_months(&partial, None).expect("calculates"),
            Some(json!(0.0))
        );
    }

    #[test]
    fn non_numeric_input_is_an_error() {
        let bad = form(json!({ "monthly_income": "lots", "savings_balance": 10 }));
        match savings_rate(&bad, None) {
            Err(CalculationError::NotNumeric { input, .. }) => assert_eq!(input, "monthly_income"),
            other => panic!("expected not numeric, got {other:?}"),
        }
    }

    #[test]
    fn stability_and_sector_buckets() {
        let veteran = form(json!({ "years_employed": 4, "business_sector": "Agriculture" }));
        assert_eq!(
            employment_stability_score(&veteran, None).expect("score"),
            Some(json!(0.8))
        );
        assert_eq!(
            industry_risk_score(&veteran, None).expect("score"),
            Some(json!(60.0))
        );
    }

    #[test]
    fn confidence_counts_identifying_inputs() {
        let data = form(json!({ "customer_id": "C-1", "loan_amount": "", "monthly_income": 9000 }));
        let confidence = prediction_confidence(&data, None)
            .expect("confidence")
            .and_then(|value| value.as_f64())
            .expect("numeric");
        assert!((confidence - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn cross_sell_reads_customer_history() {
        let history = json!({ "prior_loans_count_akafay": 2 });
        assert_eq!(
            cross_sell_opportunity_score(&FieldMap::new(), Some(&history)).expect("score"),
            Some(json!(0.7))
        );
    }
}
