//! Control mapping table: validation, normalization, aggregates, and gaps.

mod gaps;
mod loader;
mod normalizer;
pub mod schema;
mod summary;

pub use gaps::gap_list;
pub use loader::{ControlDataset, ControlImportError, ControlRecord};
pub use normalizer::{normalize_framework, normalize_status, EvidenceProvided};
pub use schema::{validate_columns, ValidationError, REQUIRED_COLUMNS};
pub use summary::{
    compliance_percentages, evidence_summary, status_summary, ComplianceSummary, CountPivot,
    FrameworkCompliance, IMPLEMENTED,
};
