//! Assembles the multi-section scoring payload from resolved application fields.
//!
//! The builder never performs I/O: ids and the timestamp come from a [`RequestContext`] so the
//! same inputs always produce the same payload.

mod metrics;
mod sections;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::resolution::{values_of, FieldResolver, ResolutionInputs};
use crate::FieldMap;

use self::metrics::ApplicantView;
pub use metrics::{
    employment_category, reason_codes, DelinquencyBucket, DerivedMetrics, PaymentStatus,
    RiskLevel,
};
pub use sections::{
    AdditionalContext, AffordabilityAndObligations, BankAndMobileMoneyDynamics,
    BehavioralIntelligence, BusinessAndReceivablesFinance, ContextualAndMacroeconomicFactors,
    CoreCreditPerformance, DigitalBehavioralIntelligence, IdentityAndFraudIntelligence,
    LoanDetails, ModelGovernanceAndMonitoring, PersonalAndProfessionalStability,
    ProductSpecificIntelligence,
};

/// Caller-owned identity of a scoring request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub request_id: String,
    pub correlation_id: String,
    pub timestamp: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        request_id: impl Into<String>,
        correlation_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            correlation_id: correlation_id.into(),
            timestamp,
        }
    }
}

/// Payload submitted verbatim to the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub request_id: String,
    pub customer_id: String,
    pub correlation_id: String,
    pub core_credit_performance: CoreCreditPerformance,
    pub affordability_and_obligations: AffordabilityAndObligations,
    pub bank_and_mobile_money_dynamics: BankAndMobileMoneyDynamics,
    pub identity_and_fraud_intelligence: IdentityAndFraudIntelligence,
    pub personal_and_professional_stability: PersonalAndProfessionalStability,
    pub contextual_and_macroeconomic_factors: ContextualAndMacroeconomicFactors,
    pub product_specific_intelligence: ProductSpecificIntelligence,
    pub business_and_receivables_finance: BusinessAndReceivablesFinance,
    pub behavioral_intelligence: BehavioralIntelligence,
    pub model_governance_and_monitoring: ModelGovernanceAndMonitoring,
    pub digital_behavioral_intelligence: DigitalBehavioralIntelligence,
    pub loan_details: LoanDetails,
    pub additional_context: AdditionalContext,
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureRequestBuilder<'c> {
    resolver: FieldResolver<'c>,
}

impl FeatureRequestBuilder<'static> {
    pub fn standard() -> Self {
        Self::new(FieldResolver::standard())
    }
}

impl<'c> FeatureRequestBuilder<'c> {
    pub fn new(resolver: FieldResolver<'c>) -> Self {
        Self { resolver }
    }

    /// Resolves every catalog field plus the form's own keys, then maps them into sections.
    pub fn build(&self, inputs: &ResolutionInputs, context: &RequestContext) -> ScoringRequest {
        let values = values_of(self.resolver.resolve_catalog(inputs));
        let request = Self::from_values(&values, inputs.customer_data.as_ref(), context);
        debug!(
            request_id = %request.request_id,
            customer_id = %request.customer_id,
            resolved = values.len(),
            "built scoring request"
        );
        request
    }

    /// Maps already-resolved values into a payload without running the resolver.
    pub fn from_values(
        values: &FieldMap,
        customer: Option<&Value>,
        context: &RequestContext,
    ) -> ScoringRequest {
        let view = ApplicantView::new(values);
        let metrics = DerivedMetrics::compute(&view);
        let timestamp = context.timestamp;

        ScoringRequest {
            request_id: context.request_id.clone(),
            customer_id: customer_id(&view, customer),
            correlation_id: context.correlation_id.clone(),
            core_credit_performance: sections::core_credit_performance(&view, &metrics, customer),
            affordability_and_obligations: sections::affordability_and_obligations(
                &view, &metrics,
            ),
            bank_and_mobile_money_dynamics: sections::bank_and_mobile_money(&view, &metrics),
            identity_and_fraud_intelligence: sections::identity_and_fraud(&view),
            personal_and_professional_stability: sections::personal_and_professional(&view),
            contextual_and_macroeconomic_factors: sections::contextual_and_macroeconomic(&view),
            product_specific_intelligence: sections::product_specific(&view, &metrics, timestamp),
            business_and_receivables_finance: sections::business_and_receivables(&view),
            behavioral_intelligence: sections::behavioral(&view),
            model_governance_and_monitoring: sections::model_governance(&view, timestamp),
            digital_behavioral_intelligence: sections::digital_behavioral(&view, &metrics),
            loan_details: sections::loan_details(&view),
            additional_context: sections::additional_context(&view, timestamp),
        }
    }
}

fn customer_id(view: &ApplicantView<'_>, customer: Option<&Value>) -> String {
    let from_form = view.text("customer_id");
    if !from_form.is_empty() {
        return from_form;
    }
    customer
        .and_then(|data| data.get("customer_id").or_else(|| data.get("id")))
        .map(|id| match id {
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            _ => String::new(),
        })
        .unwrap_or_default()
}
