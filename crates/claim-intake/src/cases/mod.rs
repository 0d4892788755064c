//! Case intake, staff actions and the HTTP router around the triage engine.

pub(crate) mod dashboard;
pub mod domain;
pub mod export;
mod extract;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use dashboard::{DashboardSummary, StateCount};
pub use domain::{
    AccidentType, CaseFilter, CaseId, CaseRecord, CaseState, CaseView, IntakeForm, StaffUpdate,
    SubmitterRole, UnknownCaseState,
};
pub use export::{read_intake_forms, read_intake_forms_from_path, write_cases, CaseCsvError};
pub use repository::{CaseRepository, RepositoryError};
pub use router::case_router;
pub use service::{BulkDeleteReport, CaseIntakeService, CaseServiceError};
pub use validation::{sanitize, IntakeViolation};
