//! Credit-decision rule authoring and loan-application checks.
//!
//! - [`rules`]: the canonical rule record, its editor graph, the codec between the two and the
//!   validators that gate saving.
//! - [`resolution`]: fills application fields from the form, customer-360 data, calculations,
//!   system context, auto-fetched indicators and static defaults.
//! - [`compliance`]: the 1/3 salary rule and cross-field consistency checks, central bank
//!   lending limits and batch CSV validation.
//! - [`features`]: the multi-section scoring payload.
//!
//! Everything here is synchronous and free of I/O apart from [`compliance::validate_batch_file`].

pub mod compliance;
pub mod features;
pub mod resolution;
pub mod rules;

/// Flat map of field name to value, as entered on a form or resolved for an application.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;
