use super::domain::{FieldType, Operator};

/// Field offered in the condition editor's picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOption {
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
}

const CONDITION_FIELDS: &[FieldOption] = &[
    FieldOption {
        name: "monthly_income",
        label: "Monthly Income",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "loan_amount",
        label: "Loan Amount",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "credit_score",
        label: "Credit Score",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "employment_years",
        label: "Employment Years",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "debt_to_income_ratio",
        label: "Debt-to-Income Ratio",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "loan_term_months",
        label: "Loan Term (Months)",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "age",
        label: "Age",
        field_type: FieldType::Number,
    },
    FieldOption {
        name: "employment_status",
        label: "Employment Status",
        field_type: FieldType::String,
    },
    FieldOption {
        name: "phone_number",
        label: "Phone Number",
        field_type: FieldType::String,
    },
    FieldOption {
        name: "customer_segment",
        label: "Customer Segment",
        field_type: FieldType::String,
    },
    FieldOption {
        name: "risk_level",
        label: "Risk Level",
        field_type: FieldType::String,
    },
];

// Name segments that mark a field as numeric (income, scores, amounts, ratios, ages, counts).
const NUMERIC_SEGMENTS: &[&str] = &[
    "income",
    "score",
    "amount",
    "ratio",
    "age",
    "count",
    "number",
    "years",
    "months",
    "balance",
    "debt",
    "limit",
    "rate",
    "payments",
    "expenses",
    "dependents",
    "inquiries",
    "term",
    "pct",
    "percentage",
];

pub fn condition_fields() -> &'static [FieldOption] {
    CONDITION_FIELDS
}

/// Infer a field's type from its name: `number` for known numeric fields, `string` otherwise.
pub fn infer_field_type(field: &str) -> FieldType {
    let normalized = field.trim().to_ascii_lowercase();

    if let Some(option) = CONDITION_FIELDS
        .iter()
        .find(|option| option.name == normalized)
    {
        return option.field_type;
    }

    let numeric = normalized
        .split(|c: char| c == '_' || c == '.' || c.is_whitespace())
        .any(|segment| NUMERIC_SEGMENTS.contains(&segment));

    if numeric {
        FieldType::Number
    } else {
        FieldType::String
    }
}

/// Operator menu for a field, honouring an explicitly declared type.
pub fn operators_for(field: &str, declared: Option<FieldType>) -> &'static [Operator] {
    declared
        .unwrap_or_else(|| infer_field_type(field))
        .operators()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_fields_keep_their_declared_type() {
        assert_eq!(infer_field_type("employment_status"), FieldType::String);
        assert_eq!(infer_field_type("credit_score"), FieldType::Number);
    }

    #[test]
    fn numeric_segments_mark_unknown_fields_as_numbers() {
        assert_eq!(infer_field_type("savings_balance"), FieldType::Number);
        assert_eq!(infer_field_type("number_of_late_payments"), FieldType::Number);
        assert_eq!(infer_field_type("applicant_age"), FieldType::Number);
    }

    #[test]
    fn segment_matching_ignores_embedded_words() {
        assert_eq!(infer_field_type("mortgage_type"), FieldType::String);
        assert_eq!(infer_field_type("region"), FieldType::String);
    }

    #[test]
    fn operator_menu_follows_declared_type() {
        assert_eq!(
            operators_for("has_collateral", Some(FieldType::Boolean)),
            &[Operator::IsTrue, Operator::IsFalse]
        );
        assert!(operators_for("region", None).contains(&Operator::Regex));
    }
}
