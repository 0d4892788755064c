use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::dashboard::{sort_newest_first, DashboardSummary};
use super::domain::{CaseFilter, CaseId, CaseRecord, IntakeForm, StaffUpdate};
use super::export::{write_cases, CaseCsvError};
use super::repository::{CaseRepository, RepositoryError};
use super::validation::{sanitize, IntakeViolation};
use crate::config::IntakeConfig;
use crate::triage::TriageEngine;

/// Service composing intake validation, the triage engine and the case repository.
pub struct CaseIntakeService<R> {
    repository: Arc<R>,
    engine: TriageEngine,
    sequence: AtomicU64,
    config: IntakeConfig,
}

impl<R> CaseIntakeService<R>
where
    R: CaseRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: IntakeConfig) -> Self {
        Self {
            repository,
            engine: TriageEngine::new(),
            sequence: AtomicU64::new(1),
            config,
        }
    }

    fn next_case_id(&self) -> CaseId {
        CaseId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Accept a public intake submission, triage it and store the record.
    pub fn submit(&self, form: IntakeForm) -> Result<CaseRecord, CaseServiceError> {
        self.submit_at(form, Utc::now())
    }

    pub fn submit_at(
        &self,
        form: IntakeForm,
        received_at: DateTime<Utc>,
    ) -> Result<CaseRecord, CaseServiceError> {
        let intake = sanitize(form).map_err(|violation| {
            info!(%violation, "intake submission rejected");
            violation
        })?;

        let outcome = self.engine.evaluate(&intake);
        let record = CaseRecord::new(self.next_case_id(), intake, outcome, received_at);

        let stored = self.repository.insert(record).map_err(|err| {
            warn!(error = %err, "failed to store case");
            err
        })?;

        info!(
            case_id = %stored.id,
            score = stored.viability_score,
            state = stored.state.token(),
            priority = stored.priority,
            "case received"
        );

        Ok(stored)
    }

    pub fn get(&self, id: &CaseId) -> Result<CaseRecord, CaseServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Cases matching `filter`, newest first.
    pub fn list(&self, filter: CaseFilter) -> Result<Vec<CaseRecord>, CaseServiceError> {
        let records = self.repository.list()?;
        let mut matching: Vec<&CaseRecord> = records
            .iter()
            .filter(|record| filter.matches(record))
            .collect();
        sort_newest_first(&mut matching);
        Ok(matching.into_iter().cloned().collect())
    }

    /// Apply a staff edit. The triage engine is not consulted.
    pub fn update(
        &self,
        id: &CaseId,
        update: StaffUpdate,
    ) -> Result<CaseRecord, CaseServiceError> {
        if let Some(priority) = update.priority {
            if !(1..=5).contains(&priority) {
                return Err(CaseServiceError::InvalidPriority(priority));
            }
        }

        if update.is_empty() {
            return self.get(id);
        }

        let updated_at = Utc::now();
        let record = self.repository.modify(id, &mut |record: &mut CaseRecord| {
            if let Some(state) = update.state {
                record.state = state;
            }
            if let Some(priority) = update.priority {
                record.priority = priority;
            }
            if let Some(notes) = &update.lawyer_notes {
                record.lawyer_notes = notes.clone();
            }
            record.updated_at = Some(updated_at);
        })?;

        info!(
            case_id = %record.id,
            state = record.state.token(),
            priority = record.priority,
            "case updated by staff"
        );

        Ok(record)
    }

    /// Recompute score, state and priority from the stored intake answers.
    pub fn retriage(&self, id: &CaseId) -> Result<CaseRecord, CaseServiceError> {
        let engine = self.engine;
        let updated_at = Utc::now();
        let mut summary = String::new();
        let record = self.repository.modify(id, &mut |record: &mut CaseRecord| {
            let outcome = engine.evaluate(&record.intake);
            summary = outcome.summary();
            record.apply_triage(outcome);
            record.updated_at = Some(updated_at);
        })?;

        info!(case_id = %record.id, %summary, "case re-triaged");
        Ok(record)
    }

    pub fn delete(&self, id: &CaseId) -> Result<(), CaseServiceError> {
        self.repository.delete(id)?;
        info!(case_id = %id, "case deleted");
        Ok(())
    }

    /// Delete every listed case. Unknown ids are reported rather than treated as failures.
    pub fn delete_many(&self, ids: &[CaseId]) -> Result<BulkDeleteReport, CaseServiceError> {
        let mut seen = BTreeSet::new();
        let mut report = BulkDeleteReport::default();

        for id in ids.iter().filter(|id| seen.insert(**id)) {
            match self.repository.delete(id) {
                Ok(()) => report.deleted.push(*id),
                Err(RepositoryError::NotFound) => report.missing.push(*id),
                Err(err) => {
                    warn!(case_id = %id, error = %err, "bulk delete aborted");
                    return Err(err.into());
                }
            }
        }

        info!(
            deleted = report.deleted.len(),
            missing = report.missing.len(),
            "bulk delete finished"
        );
        Ok(report)
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, CaseServiceError> {
        let records = self.repository.list()?;
        Ok(DashboardSummary::from_records(
            &records,
            self.config.recent_limit,
        ))
    }

    /// CSV of the newest cases, capped at the configured export limit.
    pub fn export_csv(&self) -> Result<Vec<u8>, CaseServiceError> {
        let mut records = self.list(CaseFilter::default())?;
        records.truncate(self.config.export_limit);

        let mut buffer = Vec::new();
        write_cases(&mut buffer, &records)?;
        Ok(buffer)
    }
}

/// Outcome of a bulk delete request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub deleted: Vec<CaseId>,
    pub missing: Vec<CaseId>,
}

/// Error raised by the case service.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("priority must be between 1 and 5 (found {0})")]
    InvalidPriority(u8),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] CaseCsvError),
}
