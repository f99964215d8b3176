//! An application travelling through resolution, the compliance gate and the scoring payload,
//! plus a branch upload validated from disk.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Value};

use credit_rules::compliance::{validate_batch_file, ComplianceEngine};
use credit_rules::features::{FeatureRequestBuilder, RequestContext};
use credit_rules::resolution::{FieldResolver, ResolutionInputs, SourceTag, SystemContext};
use credit_rules::FieldMap;

fn captured_at() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-05-04T10:15:00+03:00").expect("valid timestamp")
}

fn form(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object form, got {other:?}"),
    }
}

fn application() -> ResolutionInputs {
    ResolutionInputs {
        form_data: form(json!({
            "customer_id": "AK-2001",
            "loan_amount": 90000,
            "loan_term_months": 18,
            "monthly_income": 24000,
            "monthly_expenses": 9000,
            "total_debt": 4000,
            "credit_utilization_ratio": 20,
            "payment_history_score": 92,
            "employment_status": "employed",
            "years_employed": 6,
            "age": 34,
            "kyc_level": "",
            "loan_product_type": ""
        })),
        customer_data: Some(json!({
            "identity_and_fraud_intelligence": { "kyc_level": "Tier3" },
            "prior_loans_count_akafay": 2
        })),
        system_data: Some(
            SystemContext::new(captured_at())
                .with_channel("mobile_app")
                .into_system_data(),
        ),
        auto_fetched_data: None,
    }
}

#[test]
fn resolution_prefers_the_highest_tier_with_a_value() {
    let resolver = FieldResolver::standard();
    let inputs = application();

    let kyc = resolver.resolve("kyc_level", &inputs);
    assert_eq!(kyc.source, SourceTag::Customer360);
    assert_eq!(kyc.value, Some(json!("Tier3")));

    let channel = resolver.resolve("channel_type", &inputs);
    assert_eq!(channel.source, SourceTag::System);
    assert_eq!(channel.value, Some(json!("mobile_app")));

    assert_eq!(
        resolver.fallback_warnings(&inputs),
        ["Required field loan_product_type using fallback default value"]
    );
}

#[test]
fn compliant_application_produces_a_scoring_request() {
    let resolver = FieldResolver::standard();
    let inputs = application();

    let compliance = ComplianceEngine::default().evaluate(&resolver.resolved_values(&inputs));
    assert!(compliance.valid, "violations: {:?}", compliance.violations);
    assert!(compliance.warnings.is_empty(), "warnings: {:?}", compliance.warnings);

    let timestamp: DateTime<Utc> = captured_at().with_timezone(&Utc);
    let request = FeatureRequestBuilder::new(resolver)
        .build(&inputs, &RequestContext::new("req-77", "corr-77", timestamp));

    assert_eq!(request.customer_id, "AK-2001");
    assert_eq!(request.identity_and_fraud_intelligence.kyc_level, "Tier3");
    assert_eq!(request.additional_context.application_channel, "mobile_app");
    assert_eq!(
        request.digital_behavioral_intelligence.app_submission_timestamp_context,
        "Business_Hours"
    );
    assert_eq!(request.product_specific_intelligence.product_type, "PersonalLoan");
    assert_eq!(request.core_credit_performance.prior_loans_count_akafay, 2);
    assert!((request.core_credit_performance.credit_utilization_ratio - 0.2).abs() < 1e-9);
    assert_eq!(request.loan_details.loan_amount, 90000.0);
}

#[test]
fn over_limit_application_is_blocked_with_field_tags() {
    let mut inputs = application();
    inputs
        .form_data
        .insert("loan_amount".to_string(), json!(400000));
    inputs
        .form_data
        .insert("collateral_value".to_string(), json!(450000));

    let values = FieldResolver::standard().resolved_values(&inputs);
    let result = ComplianceEngine::default().evaluate(&values);

    assert!(!result.valid);
    let fields: Vec<&str> = result
        .violations
        .iter()
        .map(|issue| issue.field.as_str())
        .collect();
    assert_eq!(fields, ["loan_amount", "collateral_value"]);
}

#[test]
fn branch_upload_is_validated_row_by_row() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/loan_applications.csv");
    let result = validate_batch_file(path).expect("fixture readable");

    assert!(!result.valid);
    assert_eq!(result.valid_rows, 3);
    assert_eq!(result.invalid_rows, 2);

    let errors: Vec<(u64, &str)> = result
        .errors
        .iter()
        .map(|issue| (issue.row, issue.field.as_str()))
        .collect();
    assert_eq!(
        errors,
        [(4, "loan_amount"), (5, "phone_number"), (5, "monthly_expenses")]
    );

    let warnings: Vec<(u64, &str)> = result
        .warnings
        .iter()
        .map(|issue| (issue.row, issue.field.as_str()))
        .collect();
    assert_eq!(warnings, [(2, "loan_amount")]);
    assert_eq!(
        result.summary(),
        "Total rows: 5 | Valid: 3 | Invalid: 2 | Errors: 3 | Warnings: 1"
    );
}
