use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::cases::domain::{CaseId, CaseRecord, IntakeForm};
use crate::cases::repository::{CaseRepository, RepositoryError};
use crate::cases::{case_router, CaseIntakeService};
use crate::config::IntakeConfig;
use crate::triage::CHECKED;

pub(super) fn contact(name: &str) -> IntakeForm {
    let slug = name.to_ascii_lowercase().replace(' ', ".");
    IntakeForm {
        full_name: Some(name.to_string()),
        email: Some(format!("{slug}@example.com")),
        phone: Some("+54 11 1234-5678".to_string()),
        accident_date: Some("2024-02-11".to_string()),
        description: Some("Rear-ended at a red light on Avenida Corrientes.".to_string()),
        ..IntakeForm::default()
    }
}

/// Injured pedestrian victim with damage and insurance: score 10, qualified, priority 5.
pub(super) fn strong_submission() -> IntakeForm {
    IntakeForm {
        accident_type: Some("pedestrian".to_string()),
        submitter_role: Some("victim".to_string()),
        injuries: Some(CHECKED.to_string()),
        material_damage: Some(CHECKED.to_string()),
        insurance_involved: Some(CHECKED.to_string()),
        own_insurer: Some("Mapfre".to_string()),
        ..contact("Ana Torres")
    }
}

/// Material damage only: score 2, under review, priority 3.
pub(super) fn review_submission() -> IntakeForm {
    IntakeForm {
        accident_type: Some("vehicular".to_string()),
        submitter_role: Some("responsible_party".to_string()),
        material_damage: Some(CHECKED.to_string()),
        ..contact("Luis Diaz")
    }
}

/// Nothing checked: score 0, discarded, priority 1.
pub(super) fn weak_submission() -> IntakeForm {
    IntakeForm {
        accident_type: Some("motorcycle".to_string()),
        submitter_role: Some("responsible_party".to_string()),
        ..contact("Marta Gil")
    }
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (CaseIntakeService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CaseIntakeService::new(repository.clone(), IntakeConfig::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CaseId, CaseRecord>>>,
}

impl CaseRepository for MemoryRepository {
    fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id, record.clone());
        Ok(record)
    }

    fn modify(
        &self,
        id: &CaseId,
        change: &mut dyn FnMut(&mut CaseRecord),
    ) -> Result<CaseRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: &CaseId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl CaseRepository for UnavailableRepository {
    fn insert(&self, _record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &CaseId,
        _change: &mut dyn FnMut(&mut CaseRecord),
    ) -> Result<CaseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &CaseId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status);
}

pub(super) fn router_with_service(service: CaseIntakeService<MemoryRepository>) -> axum::Router {
    case_router(Arc::new(service))
}
