use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::calculations;
use super::CalculationError;
use crate::FieldMap;

/// Pure derivation over `(formData, customerData)`.
pub type Calculation = fn(&FieldMap, Option<&Value>) -> Result<Option<Value>, CalculationError>;

/// Where a field is expected to come from when the applicant leaves it blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    UserInput,
    #[serde(rename = "customer_360")]
    Customer360,
    Calculated,
    System,
    AutoFetched,
}

/// Static fallback used when no source produced a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Null,
    Number(f64),
    Text(&'static str),
    Flag(bool),
    EmptyObject,
}

impl Fallback {
    pub fn to_value(self) -> Value {
        match self {
            Fallback::Null => Value::Null,
            Fallback::Number(number) => json!(number),
            Fallback::Text(text) => json!(text),
            Fallback::Flag(flag) => json!(flag),
            Fallback::EmptyObject => json!({}),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub form_field: &'static str,
    /// Section and field in the scoring payload; also the path into customer-360 data.
    pub api_path: &'static [&'static str],
    pub source: FieldSource,
    pub required: bool,
    pub fallback: Option<Fallback>,
    pub calculation: Option<Calculation>,
}

impl FieldMapping {
    const fn new(
        form_field: &'static str,
        api_path: &'static [&'static str],
        source: FieldSource,
    ) -> Self {
        FieldMapping {
            form_field,
            api_path,
            source,
            required: false,
            fallback: None,
            calculation: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    const fn calculated(mut self, calculation: Calculation) -> Self {
        self.calculation = Some(calculation);
        self
    }

    /// Follow `api_path` through nested customer-360 data.
    pub fn extract_from(&self, data: &Value) -> Option<Value> {
        let mut current = data;
        for key in self.api_path {
            current = current.get(key)?;
        }
        Some(current.clone())
    }
}

/// Immutable field name to mapping table. Build once and share by reference.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    mappings: BTreeMap<&'static str, FieldMapping>,
}

static STANDARD_CATALOG: OnceLock<FieldCatalog> = OnceLock::new();

impl FieldCatalog {
    pub fn from_mappings(mappings: impl IntoIterator<Item = FieldMapping>) -> Self {
        FieldCatalog {
            mappings: mappings
                .into_iter()
                .map(|mapping| (mapping.form_field, mapping))
                .collect(),
        }
    }

    /// The credit application catalog, built on first use.
    pub fn standard() -> &'static FieldCatalog {
        STANDARD_CATALOG.get_or_init(|| FieldCatalog::from_mappings(STANDARD_MAPPINGS.iter().copied()))
    }

    pub fn get(&self, field: &str) -> Option<&FieldMapping> {
        self.mappings.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mappings.keys().copied()
    }

    pub fn by_source(&self, source: FieldSource) -> impl Iterator<Item = &FieldMapping> + '_ {
        self.mappings
            .values()
            .filter(move |mapping| mapping.source == source)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

use FieldSource::{AutoFetched, Calculated, Customer360, System, UserInput};

const STANDARD_MAPPINGS: &[FieldMapping] = &[
    // core credit performance
    FieldMapping::new(
        "tenure_with_akafay_months",
        &["core_credit_performance", "tenure_with_akafay_months"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "new_accounts_last_6m",
        &["core_credit_performance", "new_credit_lines_opened_6m"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "inquiries_last_6m",
        &["core_credit_performance", "recent_hard_inquiries_12m"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "inquiries_last_12m",
        &["core_credit_performance", "recent_hard_inquiries_12m"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "public_record_flag",
        &["core_credit_performance", "collections_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "bankruptcy_flag",
        &["core_credit_performance", "bankruptcy_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "repossession_flag",
        &["core_credit_performance", "prior_default_or_chargeoff_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "foreclosure_flag",
        &["core_credit_performance", "prior_default_or_chargeoff_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "tax_lien_flag",
        &["core_credit_performance", "collections_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "judgment_flag",
        &["core_credit_performance", "collections_flag"],
        UserInput,
    )
    .fallback(Fallback::Flag(false)),
    FieldMapping::new(
        "utilization_trend_3m",
        &["core_credit_performance", "credit_mix_diversity_index"],
        Calculated,
    )
    .calculated(calculations::utilization_trend),
    FieldMapping::new(
        "utilization_trend_6m",
        &["core_credit_performance", "credit_mix_diversity_index"],
        Calculated,
    )
    .calculated(calculations::utilization_trend),
    // affordability
    FieldMapping::new(
        "existing_loan_payments",
        &["affordability_and_obligations", "scheduled_monthly_debt_service"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "other_monthly_obligations",
        &["affordability_and_obligations", "scheduled_monthly_debt_service"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "emergency_fund_months",
        &["affordability_and_obligations", "cash_buffer_days"],
        Calculated,
    )
    .calculated(calculations::emergency_fund_months),
    FieldMapping::new(
        "savings_rate",
        &["affordability_and_obligations", "residual_income_ratio"],
        Calculated,
    )
    .calculated(calculations::savings_rate),
    // bank and mobile money
    FieldMapping::new(
        "bank_account_age_months",
        &["bank_and_mobile_money_dynamics", "primary_bank_tenure_months"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "mobile_money_account_age_months",
        &["bank_and_mobile_money_dynamics", "primary_bank_tenure_months"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "transaction_frequency",
        &["bank_and_mobile_money_dynamics", "mobile_money_txn_count_90d"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "mpesa_balance",
        &["bank_and_mobile_money_dynamics", "mobile_money_txn_volume_90d"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "direct_deposit_flag",
        &["bank_and_mobile_money_dynamics", "salary_deposit_count_6m"],
        Customer360,
    ),
    // identity and fraud
    FieldMapping::new(
        "fayda_verification_status",
        &["identity_and_fraud_intelligence", "fayda_verification_status"],
        Customer360,
    )
    .required()
    .fallback(Fallback::Text("Not Verified")),
    FieldMapping::new(
        "kyc_level",
        &["identity_and_fraud_intelligence", "kyc_level"],
        Customer360,
    )
    .required()
    .fallback(Fallback::Text("Tier1")),
    FieldMapping::new(
        "device_compromise_status",
        &["identity_and_fraud_intelligence", "device_compromise_status"],
        System,
    )
    .required()
    .fallback(Fallback::Text("Clean")),
    FieldMapping::new(
        "biometric_liveness_check",
        &["identity_and_fraud_intelligence", "biometric_liveness_check_status"],
        System,
    )
    .required()
    .fallback(Fallback::Text("Passed")),
    FieldMapping::new(
        "phone_tenure_months",
        &["identity_and_fraud_intelligence", "phone_tenure_months"],
        Customer360,
    ),
    FieldMapping::new(
        "application_velocity",
        &["identity_and_fraud_intelligence", "application_velocity_user_30d"],
        System,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "device_type",
        &["identity_and_fraud_intelligence", "is_device_emulator"],
        System,
    )
    .fallback(Fallback::Text("desktop")),
    // personal and professional stability
    FieldMapping::new(
        "marital_status",
        &["personal_and_professional_stability", "marital_status"],
        UserInput,
    )
    .fallback(Fallback::Text("Unknown")),
    FieldMapping::new(
        "education_level",
        &["personal_and_professional_stability", "education_level"],
        UserInput,
    )
    .fallback(Fallback::Text("Unknown")),
    FieldMapping::new(
        "years_at_current_address",
        &["personal_and_professional_stability", "location_stability_score"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "dependents",
        &["personal_and_professional_stability", "dependents_count"],
        UserInput,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "employment_stability_score",
        &["personal_and_professional_stability", "years_in_profession"],
        Calculated,
    )
    .calculated(calculations::employment_stability_score),
    // macro context
    FieldMapping::new(
        "regional_economic_index",
        &["contextual_and_macroeconomic_factors", "local_economic_resilience_score"],
        AutoFetched,
    )
    .fallback(Fallback::Number(50.0)),
    FieldMapping::new(
        "sector_growth_rate",
        &["contextual_and_macroeconomic_factors", "sector_cyclicality_index"],
        AutoFetched,
    )
    .fallback(Fallback::Number(5.0)),
    FieldMapping::new(
        "inflation_rate",
        &["contextual_and_macroeconomic_factors", "inflation_rate_recent"],
        AutoFetched,
    )
    .fallback(Fallback::Number(15.0)),
    FieldMapping::new(
        "unemployment_rate_regional",
        &["contextual_and_macroeconomic_factors", "regional_unemployment_rate"],
        AutoFetched,
    )
    .fallback(Fallback::Number(5.0)),
    // product
    FieldMapping::new(
        "loan_product_type",
        &["product_specific_intelligence", "product_type"],
        UserInput,
    )
    .required()
    .fallback(Fallback::Text("PersonalLoan")),
    FieldMapping::new(
        "cross_sell_opportunity_score",
        &["product_specific_intelligence", "relationship_strength_proxy"],
        Calculated,
    )
    .calculated(calculations::cross_sell_opportunity_score),
    FieldMapping::new(
        "channel_type",
        &["additional_context", "application_channel"],
        System,
    )
    .required()
    .fallback(Fallback::Text("web_dashboard")),
    FieldMapping::new(
        "application_source",
        &["additional_context", "application_channel"],
        System,
    )
    .required()
    .fallback(Fallback::Text("web_dashboard")),
    // business and receivables
    FieldMapping::new(
        "years_in_business",
        &["business_and_receivables_finance", "years_in_business"],
        UserInput,
    )
    .fallback(Fallback::Null),
    FieldMapping::new(
        "industry_risk_score",
        &["business_and_receivables_finance", "industry_risk_score"],
        Calculated,
    )
    .calculated(calculations::industry_risk_score),
    FieldMapping::new(
        "merchant_revenue_share",
        &["business_and_receivables_finance", "merchant_revenue_share_top_3"],
        UserInput,
    )
    .fallback(Fallback::Null),
    FieldMapping::new(
        "seasonality_index",
        &["business_and_receivables_finance", "seasonality_index_12m"],
        UserInput,
    )
    .fallback(Fallback::Null),
    // digital behaviour
    FieldMapping::new(
        "time_of_day_application",
        &["digital_behavioral_intelligence", "app_submission_timestamp_context"],
        System,
    ),
    FieldMapping::new(
        "app_usage_frequency",
        &["digital_behavioral_intelligence", "app_engagement_frequency_30d"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "session_duration",
        &["digital_behavioral_intelligence", "app_engagement_frequency_30d"],
        Customer360,
    )
    .fallback(Fallback::Number(0.0)),
    FieldMapping::new(
        "spending_category_distribution",
        &["digital_behavioral_intelligence", "device_installed_app_categories"],
        Customer360,
    )
    .fallback(Fallback::EmptyObject),
    // model governance
    FieldMapping::new(
        "model_version",
        &["model_governance_and_monitoring", "model_version"],
        System,
    )
    .required()
    .fallback(Fallback::Text("v4.0")),
    FieldMapping::new(
        "feature_drift_score",
        &["model_governance_and_monitoring", "data_quality_score"],
        System,
    )
    .fallback(Fallback::Number(0.9)),
    FieldMapping::new(
        "prediction_confidence",
        &["model_governance_and_monitoring", "model_confidence_score"],
        Calculated,
    )
    .calculated(calculations::prediction_confidence),
    FieldMapping::new(
        "data_quality_score",
        &["model_governance_and_monitoring", "data_quality_score"],
        Calculated,
    )
    .calculated(calculations::data_quality_score),
];
