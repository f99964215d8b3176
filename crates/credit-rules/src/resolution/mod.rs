//! Field-value resolution over applicant, customer-360, system and macro data.
//!
//! A field resolves from the first source in a fixed precedence order that yields a
//! usable value. Resolution is pure: the same inputs always give the same value and source.

mod calculations;
mod cascade;
pub mod catalog;
pub mod system;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use self::cascade::{Lookup, CASCADE};
pub use catalog::{Calculation, Fallback, FieldCatalog, FieldMapping, FieldSource};
pub use system::{time_of_day_bucket, SystemContext};

use crate::FieldMap;

/// Where a resolved value came from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    UserInput,
    #[serde(rename = "customer_360")]
    Customer360,
    Calculated,
    System,
    SystemCalculated,
    AutoFetched,
    FallbackDefault,
    None,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalculationError {
    #[error("input '{input}' is not numeric (found {value})")]
    NotNumeric { input: String, value: String },
}

/// Raw data sources supplied by the caller for one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionInputs {
    #[serde(default)]
    pub form_data: FieldMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fetched_data: Option<FieldMap>,
}

impl ResolutionInputs {
    pub fn from_form(form_data: FieldMap) -> Self {
        ResolutionInputs {
            form_data,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldResolutionRecord {
    pub field: String,
    /// `None` when no source produced a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub source: SourceTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'c> {
    catalog: &'c FieldCatalog,
}

impl FieldResolver<'static> {
    pub fn standard() -> Self {
        FieldResolver::new(FieldCatalog::standard())
    }
}

impl<'c> FieldResolver<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        FieldResolver { catalog }
    }

    pub fn catalog(&self) -> &'c FieldCatalog {
        self.catalog
    }

    pub fn resolve(&self, field: &str, inputs: &ResolutionInputs) -> FieldResolutionRecord {
        let mapping = self.catalog.get(field);
        let lookup = Lookup {
            field,
            mapping,
            inputs,
        };

        for tier in &CASCADE {
            if !(tier.applies)(&lookup) {
                continue;
            }
            if let Some(value) = (tier.extract)(&lookup) {
                let warning = (tier.source == SourceTag::FallbackDefault
                    && mapping.is_some_and(|mapping| mapping.required))
                .then(|| format!("Required field {field} using fallback default value"));

                return FieldResolutionRecord {
                    field: field.to_string(),
                    value: Some(value),
                    source: tier.source,
                    warning,
                };
            }
        }

        FieldResolutionRecord {
            field: field.to_string(),
            value: None,
            source: SourceTag::None,
            warning: None,
        }
    }

    /// Resolve every field named in the form data.
    pub fn resolve_all(&self, inputs: &ResolutionInputs) -> BTreeMap<String, FieldResolutionRecord> {
        inputs
            .form_data
            .keys()
            .map(|field| (field.clone(), self.resolve(field, inputs)))
            .collect()
    }

    /// Resolve the form fields plus every catalog field.
    pub fn resolve_catalog(
        &self,
        inputs: &ResolutionInputs,
    ) -> BTreeMap<String, FieldResolutionRecord> {
        let fields: BTreeSet<&str> = inputs
            .form_data
            .keys()
            .map(String::as_str)
            .chain(self.catalog.fields().map(|field| -> &str { field }))
            .collect();

        fields
            .into_iter()
            .map(|field| (field.to_string(), self.resolve(field, inputs)))
            .collect()
    }

    /// `{field: value}` for the form fields that resolved to something.
    pub fn resolved_values(&self, inputs: &ResolutionInputs) -> FieldMap {
        values_of(self.resolve_all(inputs))
    }

    /// Warnings for required fields that fell back to their static default.
    pub fn fallback_warnings(&self, inputs: &ResolutionInputs) -> Vec<String> {
        let warnings: Vec<String> = self
            .resolve_all(inputs)
            .into_values()
            .filter_map(|record| record.warning)
            .collect();
        for warning in &warnings {
            warn!("{warning}");
        }
        warnings
    }
}

/// Strip resolution metadata, dropping fields with no source.
pub fn values_of(records: BTreeMap<String, FieldResolutionRecord>) -> FieldMap {
    records
        .into_iter()
        .filter(|(_, record)| record.source != SourceTag::None)
        .filter_map(|(field, record)| record.value.map(|value| (field, value)))
        .collect()
}
