//! Lending-affordability law and cross-field consistency checks.
//!
//! Every check is a pure function over resolved scalars returning a [`CheckOutcome`]:
//! errors block submission, warnings are surfaced but never block.

pub mod batch;
mod engine;
pub mod limits;
mod thresholds;

pub use batch::{
    parse_csv, validate_batch_csv, validate_batch_file, BatchError, BatchIssue,
    BatchValidationResult, BatchValidator, ParsedCsv,
};
pub use engine::{
    AffordabilityAssessment, CheckOutcome, ComplianceEngine, ComplianceError, ComplianceResult,
    Issue,
};
pub use limits::{CustomerType, LendingLimitValidator, LendingLimits, LoanRequest};
pub use thresholds::ComplianceThresholds;
