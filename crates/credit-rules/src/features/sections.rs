//! Sections of the scoring payload. Field names are the scoring service's wire names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metrics::{
    employment_category, reason_codes, ApplicantView, DelinquencyBucket, DerivedMetrics,
    PaymentStatus, RiskLevel,
};

const REQUESTED_RATE_PCT: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreCreditPerformance {
    pub credit_history_length_months: f64,
    pub worst_status_last_12m: PaymentStatus,
    pub recent_delinquency_flag_90d: bool,
    /// Fraction in 0..1.
    pub credit_utilization_ratio: f64,
    pub payment_history_score: f64,
    pub number_of_credit_accounts: u32,
    pub number_of_late_payments: u32,
    pub number_of_defaults: u32,
    pub average_account_age_months: f64,
    pub oldest_account_age_months: f64,
    pub new_accounts_last_6m: u32,
    pub inquiries_last_6m: u32,
    pub inquiries_last_12m: u32,
    pub total_credit_limit: f64,
    pub revolving_credit_limit: f64,
    pub installment_credit_limit: f64,
    pub utilization_trend_3m: f64,
    pub utilization_trend_6m: f64,
    pub worst_status_last_6m: PaymentStatus,
    pub worst_status_last_24m: PaymentStatus,
    pub collections_flag: bool,
    pub public_record_flag: bool,
    pub bankruptcy_flag: bool,
    pub repossession_flag: bool,
    pub foreclosure_flag: bool,
    pub tax_lien_flag: bool,
    pub judgment_flag: bool,
    pub charge_off_flag: bool,
    pub account_status_current: bool,
    pub account_status_30_dpd: bool,
    pub account_status_60_dpd: bool,
    pub account_status_90_dpd: bool,
    pub account_status_default: bool,
    pub tenure_with_akafay_months: f64,
    pub prior_loans_count_akafay: u32,
    pub prior_rollover_count_akafay: u32,
}

pub(crate) fn core_credit_performance(
    view: &ApplicantView<'_>,
    metrics: &DerivedMetrics,
    customer: Option<&Value>,
) -> CoreCreditPerformance {
    let history_months = view.number("credit_history_length") * 12.0;
    let accounts = view.count("number_of_credit_accounts");
    let late = view.count("number_of_late_payments");
    let defaults = view.count("number_of_defaults");
    let utilization = view.number("credit_utilization_ratio");
    let trend = |field: &str| {
        view.number_opt(field)
            .filter(|value| *value != 0.0)
            .unwrap_or(utilization)
            / 100.0
    };
    let bucket = DelinquencyBucket::from_late_payments(late);
    let customer_count = |field: &str| {
        customer
            .and_then(|data| data.get(field))
            .and_then(Value::as_f64)
            .map(|count| count.max(0.0).round() as u32)
            .unwrap_or(0)
    };
    let settled_status = if defaults > 0 {
        PaymentStatus::Default
    } else {
        PaymentStatus::Current
    };

    CoreCreditPerformance {
        credit_history_length_months: history_months,
        worst_status_last_12m: PaymentStatus::worst(defaults, late),
        recent_delinquency_flag_90d: late > 0,
        credit_utilization_ratio: utilization / 100.0,
        payment_history_score: view.number("payment_history_score") / 100.0,
        number_of_credit_accounts: accounts,
        number_of_late_payments: late,
        number_of_defaults: defaults,
        average_account_age_months: history_months / f64::from(accounts.max(1)),
        oldest_account_age_months: history_months,
        new_accounts_last_6m: view.count("new_accounts_last_6m"),
        inquiries_last_6m: view.count("inquiries_last_6m"),
        inquiries_last_12m: view.count("inquiries_last_12m"),
        total_credit_limit: metrics.total_credit_limit,
        revolving_credit_limit: metrics.total_credit_limit,
        installment_credit_limit: view.number("total_debt") * 0.3,
        utilization_trend_3m: trend("utilization_trend_3m"),
        utilization_trend_6m: trend("utilization_trend_6m"),
        worst_status_last_6m: settled_status,
        worst_status_last_24m: settled_status,
        collections_flag: defaults > 0,
        public_record_flag: view.flag("public_record_flag"),
        bankruptcy_flag: view.flag("bankruptcy_flag"),
        repossession_flag: view.flag("repossession_flag"),
        foreclosure_flag: view.flag("foreclosure_flag"),
        tax_lien_flag: view.flag("tax_lien_flag"),
        judgment_flag: view.flag("judgment_flag"),
        charge_off_flag: defaults > 0,
        account_status_current: bucket == DelinquencyBucket::Current,
        account_status_30_dpd: bucket == DelinquencyBucket::PastDue30,
        account_status_60_dpd: bucket == DelinquencyBucket::PastDue60,
        account_status_90_dpd: bucket == DelinquencyBucket::PastDue90,
        account_status_default: defaults > 0,
        tenure_with_akafay_months: view.number("tenure_with_akafay_months"),
        prior_loans_count_akafay: customer_count("prior_loans_count_akafay"),
        prior_rollover_count_akafay: customer_count("prior_rollover_count_akafay"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityAndObligations {
    pub monthly_income_etb: f64,
    pub monthly_expenses_etb: f64,
    pub net_monthly_income_etb: f64,
    pub debt_to_income_ratio: f64,
    pub savings_balance_etb: f64,
    pub checking_balance_etb: f64,
    pub total_liquid_assets_etb: f64,
    pub total_debt_etb: f64,
    pub projected_installment_etb: f64,
    pub installment_to_income_ratio: f64,
    pub residual_income_etb: f64,
    pub disposable_income_ratio: f64,
    pub savings_ratio: f64,
    pub expense_to_income_ratio: f64,
    pub debt_service_coverage_ratio: f64,
    pub fixed_obligations_etb: f64,
    pub variable_obligations_etb: f64,
    pub total_monthly_obligations_etb: f64,
    pub available_cash_flow_etb: f64,
    pub collateral_coverage_ratio: f64,
    pub scheduled_monthly_debt_service: f64,
    pub total_outstanding_balance_etb: f64,
    pub total_credit_limit_etb: f64,
    pub affordability_buffer_ratio: f64,
    pub affordability_stress_pass: bool,
    pub cash_buffer_days: f64,
}

pub(crate) fn affordability_and_obligations(
    view: &ApplicantView<'_>,
    metrics: &DerivedMetrics,
) -> AffordabilityAndObligations {
    let income = view.number("monthly_income");
    let expenses = view.number("monthly_expenses");
    let savings = view.number("savings_balance");
    let checking = view.number("checking_balance");
    let income_floor = income.max(1.0);

    AffordabilityAndObligations {
        monthly_income_etb: income,
        monthly_expenses_etb: expenses,
        net_monthly_income_etb: metrics.net_income,
        debt_to_income_ratio: metrics.debt_to_income_pct / 100.0,
        savings_balance_etb: savings,
        checking_balance_etb: checking,
        total_liquid_assets_etb: savings + checking,
        total_debt_etb: view.number("total_debt"),
        projected_installment_etb: metrics.projected_installment,
        installment_to_income_ratio: metrics.installment_to_income_pct / 100.0,
        residual_income_etb: metrics.residual_income,
        disposable_income_ratio: metrics.net_income / income_floor,
        savings_ratio: metrics.savings_ratio_pct / 100.0,
        expense_to_income_ratio: expenses / income_floor,
        debt_service_coverage_ratio: metrics.net_income
            / (metrics.projected_installment + metrics.estimated_debt_service).max(1.0),
        fixed_obligations_etb: metrics.scheduled_debt_service,
        variable_obligations_etb: expenses - metrics.estimated_debt_service,
        total_monthly_obligations_etb: metrics.scheduled_debt_service
            + metrics.projected_installment,
        available_cash_flow_etb: metrics.residual_income - metrics.scheduled_debt_service,
        collateral_coverage_ratio: loan_to_value(view),
        scheduled_monthly_debt_service: metrics.scheduled_debt_service,
        total_outstanding_balance_etb: view.number("total_debt"),
        total_credit_limit_etb: metrics.total_credit_limit,
        affordability_buffer_ratio: metrics.residual_income / income_floor,
        affordability_stress_pass: metrics.passes_stress_test(),
        cash_buffer_days: view.number("emergency_fund_months") * 30.0,
    }
}

fn loan_to_value(view: &ApplicantView<'_>) -> f64 {
    if view.has("collateral_value") {
        view.number("loan_amount") / view.number("collateral_value").max(1.0)
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAndMobileMoneyDynamics {
    pub primary_bank_tenure_months: f64,
    pub mobile_money_account_age_months: f64,
    pub bank_avg_balance_3m: f64,
    pub bank_avg_balance_6m: f64,
    pub bank_avg_balance_12m: f64,
    pub mobile_money_balance: f64,
    pub bank_transaction_count_30d: u32,
    pub bank_transaction_count_90d: u32,
    pub mobile_money_transaction_count_30d: u32,
    pub mobile_money_transaction_count_90d: u32,
    pub bank_inflow_3m: f64,
    pub bank_outflow_3m: f64,
    pub mobile_money_inflow_30d: f64,
    pub mobile_money_outflow_30d: f64,
    pub net_flow_3m: f64,
    pub bank_account_status: String,
    pub mobile_money_status: String,
    pub salary_inflow_consistency_score: f64,
    pub net_inflow_volatility_90d: f64,
    pub number_of_negative_balance_days_90d: u32,
    pub end_of_month_cash_crunch_indicator: bool,
    pub merchant_spend_ratio: f64,
    pub cash_deposit_anomaly_flag: bool,
    pub utility_recent_missed_bills_3m_flag: bool,
    pub mobile_money_in_out_ratio: f64,
    pub salary_deposit_count_6m: u32,
    pub salary_regular_day_match_rate: f64,
    pub overdraft_usage_days_90d: u32,
    pub returned_payment_count_6m: u32,
    pub average_daily_balance_90d: f64,
    pub nsf_count_6m: u32,
    pub nsf_frequency_6m: f64,
    pub utility_on_time_rate_12m: f64,
    pub telecom_on_time_rate_12m: f64,
    pub mobile_money_txn_volume_90d: f64,
    pub mobile_money_txn_count_90d: u32,
}

pub(crate) fn bank_and_mobile_money(
    view: &ApplicantView<'_>,
    metrics: &DerivedMetrics,
) -> BankAndMobileMoneyDynamics {
    let history_years = view.number("credit_history_length");
    let checking = view.number("checking_balance");
    let income = view.number("monthly_income");
    let expenses = view.number("monthly_expenses");
    let mobile_balance = view.number("mpesa_balance");
    let salaried = view.flag("direct_deposit_flag");
    let or_else = |field: &str, fallback: f64| {
        view.number_opt(field)
            .filter(|value| *value != 0.0)
            .unwrap_or(fallback)
    };

    BankAndMobileMoneyDynamics {
        primary_bank_tenure_months: or_else("bank_account_age_months", history_years * 12.0),
        mobile_money_account_age_months: or_else(
            "mobile_money_account_age_months",
            history_years * 6.0,
        ),
        bank_avg_balance_3m: checking,
        bank_avg_balance_6m: checking,
        bank_avg_balance_12m: checking,
        mobile_money_balance: or_else("mpesa_balance", checking * 0.3),
        bank_transaction_count_30d: view.count("bank_transaction_count_30d"),
        bank_transaction_count_90d: view.count("bank_transaction_count_90d"),
        mobile_money_transaction_count_30d: view.count("mobile_money_transaction_count_30d"),
        mobile_money_transaction_count_90d: view.count("mobile_money_transaction_count_90d"),
        bank_inflow_3m: income * 3.0,
        bank_outflow_3m: expenses * 3.0,
        mobile_money_inflow_30d: income * 0.3,
        mobile_money_outflow_30d: expenses * 0.3,
        net_flow_3m: metrics.net_income * 3.0,
        bank_account_status: if salaried { "Active" } else { "Unknown" }.to_string(),
        mobile_money_status: if mobile_balance > 0.0 {
            "Active"
        } else {
            "Unknown"
        }
        .to_string(),
        salary_inflow_consistency_score: if salaried { 80.0 } else { 50.0 },
        net_inflow_volatility_90d: 0.1,
        number_of_negative_balance_days_90d: 0,
        end_of_month_cash_crunch_indicator: checking < expenses * 0.1,
        merchant_spend_ratio: 0.6,
        cash_deposit_anomaly_flag: false,
        utility_recent_missed_bills_3m_flag: false,
        mobile_money_in_out_ratio: 1.2,
        salary_deposit_count_6m: if salaried { 6 } else { 0 },
        salary_regular_day_match_rate: if salaried { 0.9 } else { 0.0 },
        overdraft_usage_days_90d: 0,
        returned_payment_count_6m: 0,
        average_daily_balance_90d: checking,
        nsf_count_6m: 0,
        nsf_frequency_6m: 0.0,
        utility_on_time_rate_12m: 0.95,
        telecom_on_time_rate_12m: 0.95,
        mobile_money_txn_volume_90d: mobile_balance,
        mobile_money_txn_count_90d: view.count("mobile_money_transaction_count_90d"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAndFraudIntelligence {
    pub fayda_verification_status: String,
    pub kyc_level: String,
    pub pep_or_sanctions_hit_flag: bool,
    pub source_of_income_verified_flag: bool,
    pub is_device_emulator: bool,
    pub device_compromise_status: String,
    pub session_behavior_anomaly_score: f64,
    pub shared_device_fraud_link: bool,
    pub applications_last_30d_across_devices: u32,
    pub identity_mismatch_types_count: u32,
    pub sim_swap_recent_flag: bool,
    pub biometric_liveness_check_status: String,
    pub address_verification_status: String,
    pub document_expiry_days: u32,
    pub device_id_consistency_score: f64,
    pub phone_tenure_months: f64,
    pub application_velocity_user_30d: u32,
    pub shared_contact_link_flag: bool,
    pub gambling_registration_flag: bool,
    pub id_number: String,
    pub phone_number: String,
    pub id_verification_status: String,
    pub phone_verification_status: String,
    pub fraud_score: f64,
    pub suspicious_activity_flag: bool,
    pub identity_verification_flag: bool,
    pub biometric_verification_flag: bool,
    pub document_verification_flag: bool,
    pub address_verification_flag: bool,
}

pub(crate) fn identity_and_fraud(view: &ApplicantView<'_>) -> IdentityAndFraudIntelligence {
    let has_id = !view.text("id_number").is_empty();
    let has_phone = !view.text("phone_number").is_empty();
    let verified = |present: bool| if present { "Verified" } else { "Not Verified" };
    let liveness = view.text_or("biometric_liveness_check", "Passed");
    let velocity = view.count("application_velocity");

    IdentityAndFraudIntelligence {
        fayda_verification_status: view.text_or("fayda_verification_status", "Not Verified"),
        kyc_level: view.text_or("kyc_level", "Tier1"),
        pep_or_sanctions_hit_flag: false,
        source_of_income_verified_flag: view.number("monthly_income") > 0.0,
        is_device_emulator: false,
        device_compromise_status: view.text_or("device_compromise_status", "Clean"),
        session_behavior_anomaly_score: 0.0,
        shared_device_fraud_link: false,
        applications_last_30d_across_devices: velocity,
        identity_mismatch_types_count: 0,
        sim_swap_recent_flag: false,
        biometric_verification_flag: liveness == "Passed",
        biometric_liveness_check_status: liveness,
        address_verification_status: view.text_or("id_verification_status", "Not Verified"),
        document_expiry_days: 365,
        device_id_consistency_score: 1.0,
        phone_tenure_months: view.number("phone_tenure_months"),
        application_velocity_user_30d: velocity,
        shared_contact_link_flag: false,
        gambling_registration_flag: false,
        id_number: view.text("id_number"),
        phone_number: view.text("phone_number"),
        id_verification_status: view.text_or("id_verification_status", verified(has_id)),
        phone_verification_status: view.text_or("phone_verification_status", verified(has_phone)),
        fraud_score: view.number("fraud_score"),
        suspicious_activity_flag: view.flag("suspicious_activity_flag"),
        identity_verification_flag: has_id,
        document_verification_flag: has_id,
        address_verification_flag: view.number("years_at_current_address") > 0.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalAndProfessionalStability {
    pub age: f64,
    pub employment_status: String,
    pub years_in_profession: f64,
    pub employer_name: String,
    pub employment_stability_score: f64,
    pub ethiopian_region: String,
    pub urban_rural: String,
    pub business_sector: String,
    pub location_stability_score: f64,
    pub address_consistency_flag: bool,
    pub employment_consistency_flag: bool,
    pub income_stability_score: f64,
    pub employment_gap_months: u32,
    pub job_changes_last_12m: u32,
    pub job_changes_last_24m: u32,
    pub education_level: String,
    pub marital_status: String,
    pub dependents_count: u32,
    pub housing_status: String,
    pub residential_type: String,
    pub community_involvement_score: f64,
    pub continuous_learning_engagement: f64,
    pub digital_adoption_index: f64,
}

pub(crate) fn personal_and_professional(
    view: &ApplicantView<'_>,
) -> PersonalAndProfessionalStability {
    let years_employed = view.number("years_employed");
    let years_at_address = view.number("years_at_current_address");
    let urban = view.text_or("urban_rural", "urban").to_lowercase() == "urban";
    let stability = view
        .number_opt("employment_stability_score")
        .filter(|score| *score != 0.0)
        .unwrap_or(if years_employed > 3.0 {
            0.8
        } else if years_employed > 1.0 {
            0.6
        } else {
            0.4
        });

    PersonalAndProfessionalStability {
        age: view.number("age"),
        employment_status: employment_category(&view.text("employment_status")).to_string(),
        years_in_profession: years_employed,
        employer_name: view.text("employer_name"),
        employment_stability_score: stability,
        ethiopian_region: view.text_or("region", "Unknown"),
        urban_rural: view.text_or("urban_rural", "urban"),
        business_sector: view.text("business_sector"),
        location_stability_score: if years_at_address > 2.0 {
            80.0
        } else if years_at_address > 1.0 {
            60.0
        } else {
            40.0
        },
        address_consistency_flag: years_at_address > 0.0,
        employment_consistency_flag: years_employed > 1.0,
        income_stability_score: 0.7,
        employment_gap_months: 0,
        job_changes_last_12m: 0,
        job_changes_last_24m: 0,
        education_level: view.text_or("education_level", "Unknown"),
        marital_status: view.text_or("marital_status", "Unknown"),
        dependents_count: view.count("dependents"),
        housing_status: if urban { "Owned" } else { "Rented" }.to_string(),
        residential_type: if urban { "Urban" } else { "Rural" }.to_string(),
        community_involvement_score: 50.0,
        continuous_learning_engagement: 50.0,
        digital_adoption_index: if view.number("app_usage_frequency") > 0.0 {
            70.0
        } else {
            50.0
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualAndMacroeconomicFactors {
    pub ethiopian_region: String,
    pub agricultural_dependency_score: f64,
    pub remittance_dependency_score: f64,
    pub informal_credit_usage_score: f64,
    pub local_economic_resilience_score: f64,
    pub regional_unemployment_rate: f64,
    pub inflation_rate_recent: f64,
    pub sector_cyclicality_index: f64,
    pub exchange_rate_12m_change: f64,
    pub conflict_risk_index: f64,
    pub drought_flood_index: f64,
    pub energy_blackout_days_90d: u32,
}

pub(crate) fn contextual_and_macroeconomic(
    view: &ApplicantView<'_>,
) -> ContextualAndMacroeconomicFactors {
    let or_else = |field: &str, fallback: f64| {
        view.number_opt(field)
            .filter(|value| *value != 0.0)
            .unwrap_or(fallback)
    };

    ContextualAndMacroeconomicFactors {
        ethiopian_region: view.text_or("region", "Unknown"),
        agricultural_dependency_score: if view.text("business_sector") == "Agriculture" {
            80.0
        } else {
            20.0
        },
        remittance_dependency_score: 30.0,
        informal_credit_usage_score: 40.0,
        local_economic_resilience_score: or_else("regional_economic_index", 50.0),
        regional_unemployment_rate: or_else("unemployment_rate_regional", 5.0),
        inflation_rate_recent: or_else("inflation_rate", 15.0),
        sector_cyclicality_index: or_else("industry_risk_score", 50.0),
        exchange_rate_12m_change: 0.05,
        conflict_risk_index: 30.0,
        drought_flood_index: 25.0,
        energy_blackout_days_90d: 5,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpecificIntelligence {
    pub product_type: String,
    pub loan_to_income_ratio_lti: f64,
    pub debt_service_to_income_ratio_dsti: f64,
    pub collateral_type: String,
    pub collateral_appraised_value_etb: f64,
    pub loan_to_value_ratio_ltv: f64,
    pub collateral_liquidity_tier: String,
    pub invoice_age_days: u32,
    pub debtor_concentration_ratio: f64,
    pub client_payment_days_late_avg: f64,
    pub recourse_terms_flag: bool,
    pub guarantor_experience_score: f64,
    pub relationship_strength_proxy: f64,
    pub collateral_lien_status: String,
    pub collateral_valuation_date: String,
    pub collateral_insurance_coverage_flag: bool,
}

pub(crate) fn product_specific(
    view: &ApplicantView<'_>,
    metrics: &DerivedMetrics,
    timestamp: DateTime<Utc>,
) -> ProductSpecificIntelligence {
    let income = view.number("monthly_income");
    let secured = view.has("collateral_value");
    let when_secured = |text: &str| if secured { text } else { "" }.to_string();

    ProductSpecificIntelligence {
        product_type: view.text_or("loan_product_type", "PersonalLoan"),
        loan_to_income_ratio_lti: view.number("loan_amount") / (income * 12.0).max(1.0),
        debt_service_to_income_ratio_dsti: (view.number("existing_loan_payments")
            + metrics.projected_installment)
            / income.max(1.0),
        collateral_type: if secured { "Property" } else { "None" }.to_string(),
        collateral_appraised_value_etb: view.number("collateral_value"),
        loan_to_value_ratio_ltv: loan_to_value(view),
        collateral_liquidity_tier: if secured { "High" } else { "None" }.to_string(),
        invoice_age_days: 0,
        debtor_concentration_ratio: 0.0,
        client_payment_days_late_avg: view.number("number_of_late_payments") * 30.0,
        recourse_terms_flag: false,
        guarantor_experience_score: if view.flag("guarantor_available") {
            70.0
        } else {
            0.0
        },
        relationship_strength_proxy: view
            .number_opt("cross_sell_opportunity_score")
            .filter(|score| *score != 0.0)
            .unwrap_or(50.0),
        collateral_lien_status: when_secured("First"),
        collateral_valuation_date: if secured {
            timestamp.date_naive().to_string()
        } else {
            String::new()
        },
        collateral_insurance_coverage_flag: secured,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessAndReceivablesFinance {
    pub years_in_business: f64,
    pub industry_risk_score: f64,
    pub merchant_revenue_share_top_3: f64,
    pub seasonality_index_12m: f64,
}

pub(crate) fn business_and_receivables(view: &ApplicantView<'_>) -> BusinessAndReceivablesFinance {
    BusinessAndReceivablesFinance {
        years_in_business: view.number("years_in_business"),
        industry_risk_score: view.number("industry_risk_score"),
        merchant_revenue_share_top_3: view.number("merchant_revenue_share"),
        seasonality_index_12m: view.number("seasonality_index"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralIntelligence {
    pub financial_literacy_score: f64,
    pub risk_tolerance_score: f64,
    pub cognitive_proficiency_score: f64,
    pub behavioral_consistency_score: f64,
    pub social_network_centrality_score: f64,
    pub online_reputation_score: f64,
    pub microfinance_engagement_score: f64,
    pub cooperative_membership_score: f64,
    pub conscientiousness_score: f64,
    pub subscription_lapse_count_12m: u32,
}

pub(crate) fn behavioral(view: &ApplicantView<'_>) -> BehavioralIntelligence {
    let payment_history = view.number("payment_history_score");
    let low_utilization = view.number("credit_utilization_ratio") < 30.0;

    BehavioralIntelligence {
        financial_literacy_score: 60.0,
        risk_tolerance_score: 50.0,
        cognitive_proficiency_score: 60.0,
        behavioral_consistency_score: payment_history * 0.8
            + if low_utilization { 20.0 } else { 0.0 },
        social_network_centrality_score: 50.0,
        online_reputation_score: 50.0,
        microfinance_engagement_score: if view.number("tenure_with_akafay_months") > 12.0 {
            70.0
        } else {
            50.0
        },
        cooperative_membership_score: 50.0,
        conscientiousness_score: payment_history,
        subscription_lapse_count_12m: 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGovernanceAndMonitoring {
    pub model_version: String,
    pub data_quality_score: f64,
    pub imputation_policy_id: String,
    pub data_freshness_days_max: u32,
    pub segment_id: String,
    pub segment_routing_policy_id: String,
    pub timestamp: DateTime<Utc>,
    pub model_confidence_score: f64,
    pub reason_codes_top_3: Vec<String>,
    pub final_risk_level: RiskLevel,
    pub feature_drop_reason_codes: Vec<String>,
    pub post_decision_outcome_tag: String,
}

pub(crate) fn model_governance(
    view: &ApplicantView<'_>,
    timestamp: DateTime<Utc>,
) -> ModelGovernanceAndMonitoring {
    let utilization = view.number("credit_utilization_ratio");
    let payment_history = view.number("payment_history_score");
    let or_else = |field: &str, fallback: f64| {
        view.number_opt(field)
            .filter(|value| *value != 0.0)
            .unwrap_or(fallback)
    };

    ModelGovernanceAndMonitoring {
        model_version: view.text_or("model_version", "v4.0"),
        data_quality_score: or_else("data_quality_score", 90.0),
        imputation_policy_id: "default_v1".to_string(),
        data_freshness_days_max: 0,
        segment_id: employment_category(&view.text("employment_status")).to_string(),
        segment_routing_policy_id: "default_segment_policy".to_string(),
        timestamp,
        model_confidence_score: or_else("prediction_confidence", 0.85),
        reason_codes_top_3: reason_codes(view.number("monthly_income"), payment_history, utilization)
            .iter()
            .map(|code| code.to_string())
            .collect(),
        final_risk_level: RiskLevel::classify(utilization, payment_history),
        feature_drop_reason_codes: Vec::new(),
        post_decision_outcome_tag: String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalBehavioralIntelligence {
    pub device_installed_app_categories: Value,
    pub app_engagement_frequency_30d: f64,
    pub push_notification_interaction_rate: f64,
    pub app_submission_timestamp_context: String,
    pub savings_behavior_score: f64,
    pub discretionary_spend_ratio_90d: f64,
    pub income_source_count_180d: u32,
    pub shared_household_expense_flag: bool,
    pub contact_list_entropy_score: f64,
    pub call_log_io_ratio: f64,
    pub peer_vouching_count: u32,
    pub sms_active_lenders_count_90d: u32,
    pub sms_loan_rejection_count_90d: u32,
    pub momo_cash_out_velocity_48hr: f64,
    pub airtime_purchase_pattern_score: f64,
    pub spending_habit_consistency_score: f64,
    pub anonymized_peer_default_rate: f64,
    pub post_payday_spending_spike_ratio: f64,
    pub weekend_social_spending_volatility: f64,
}

pub(crate) fn digital_behavioral(
    view: &ApplicantView<'_>,
    metrics: &DerivedMetrics,
) -> DigitalBehavioralIntelligence {
    let savings = metrics.savings_ratio_pct;

    DigitalBehavioralIntelligence {
        device_installed_app_categories: view.object("spending_category_distribution"),
        app_engagement_frequency_30d: view.number("app_usage_frequency"),
        push_notification_interaction_rate: 0.5,
        app_submission_timestamp_context: view
            .text_or("time_of_day_application", "Business_Hours"),
        savings_behavior_score: if savings > 20.0 {
            80.0
        } else if savings > 10.0 {
            60.0
        } else {
            40.0
        },
        discretionary_spend_ratio_90d: 0.4,
        income_source_count_180d: 1,
        shared_household_expense_flag: false,
        contact_list_entropy_score: 50.0,
        call_log_io_ratio: 1.2,
        peer_vouching_count: 0,
        sms_active_lenders_count_90d: 0,
        sms_loan_rejection_count_90d: 0,
        momo_cash_out_velocity_48hr: 0.3,
        airtime_purchase_pattern_score: 60.0,
        spending_habit_consistency_score: 70.0,
        anonymized_peer_default_rate: 0.05,
        post_payday_spending_spike_ratio: 1.2,
        weekend_social_spending_volatility: 0.3,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    pub loan_amount: f64,
    pub loan_term_months: f64,
    pub loan_purpose: String,
    pub requested_interest_rate: f64,
}

pub(crate) fn loan_details(view: &ApplicantView<'_>) -> LoanDetails {
    LoanDetails {
        loan_amount: view.number("loan_amount"),
        loan_term_months: view.number("loan_term_months"),
        loan_purpose: view.text_or("loan_purpose", "Personal"),
        requested_interest_rate: REQUESTED_RATE_PCT,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalContext {
    pub application_channel: String,
    pub credit_officer_id: String,
    pub branch_code: String,
    pub application_date: String,
    pub priority_flag: bool,
}

pub(crate) fn additional_context(
    view: &ApplicantView<'_>,
    timestamp: DateTime<Utc>,
) -> AdditionalContext {
    AdditionalContext {
        application_channel: view.text_or("channel_type", "web_dashboard"),
        credit_officer_id: "system".to_string(),
        branch_code: "HQ001".to_string(),
        application_date: timestamp.date_naive().to_string(),
        priority_flag: false,
    }
}
