//! Integration scenarios for case intake, triage and staff follow-up.
//!
//! Scenarios go through the public service facade and HTTP router only.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use claim_intake::cases::{
        CaseId, CaseIntakeService, CaseRecord, CaseRepository, IntakeForm, RepositoryError,
    };
    use claim_intake::config::IntakeConfig;

    pub(super) fn form(
        injuries: bool,
        material_damage: bool,
        insurance: bool,
        role: &str,
        accident_type: &str,
    ) -> IntakeForm {
        let flag = |on: bool| on.then(|| "on".to_string());
        IntakeForm {
            full_name: Some("Ana Torres".to_string()),
            email: Some("ana.torres@example.com".to_string()),
            phone: Some("+54 11 5555-0101".to_string()),
            accident_type: Some(accident_type.to_string()),
            submitter_role: Some(role.to_string()),
            accident_date: Some("2024-01-20".to_string()),
            description: Some("Hit by a bus while crossing at the intersection.".to_string()),
            injuries: flag(injuries),
            material_damage: flag(material_damage),
            insurance_involved: flag(insurance),
            own_insurer: None,
            other_insurer: Some("Sancor".to_string()),
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<BTreeMap<CaseId, CaseRecord>>>,
    }

    impl CaseRepository for MemoryRepository {
        fn insert(&self, record: CaseRecord) -> Result<CaseRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
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
            let mut guard = self.records.lock().expect("lock");
            let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
            change(record);
            Ok(record.clone())
        }

        fn fetch(&self, id: &CaseId) -> Result<Option<CaseRecord>, RepositoryError> {
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn list(&self) -> Result<Vec<CaseRecord>, RepositoryError> {
            Ok(self.records.lock().expect("lock").values().cloned().collect())
        }

        fn delete(&self, id: &CaseId) -> Result<(), RepositoryError> {
            self.records
                .lock()
                .expect("lock")
                .remove(id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        }
    }

    pub(super) fn build_service() -> (
        Arc<CaseIntakeService<MemoryRepository>>,
        Arc<MemoryRepository>,
    ) {
        let repository = Arc::new(MemoryRepository::default());
        let service = CaseIntakeService::new(repository.clone(), IntakeConfig::default());
        (Arc::new(service), repository)
    }
}

mod triage {
    use super::common::*;
    use claim_intake::cases::CaseState;

    #[test]
    fn injured_victim_pedestrian_without_damage_goes_to_review() {
        let (service, _) = build_service();
        let record = service
            .submit(form(true, false, false, "victim", "pedestrian"))
            .expect("submitted");

        assert_eq!(record.viability_score, 6);
        assert_eq!(record.state, CaseState::UnderReview);
        assert_eq!(record.priority, 3);
    }

    #[test]
    fn every_signal_present_is_top_priority() {
        let (service, _) = build_service();
        let record = service
            .submit(form(true, true, true, "victim", "pedestrian"))
            .expect("submitted");

        assert_eq!(record.viability_score, 10);
        assert_eq!(record.state, CaseState::Qualified);
        assert_eq!(record.priority, 5);
    }

    #[test]
    fn injured_responsible_party_with_damage_and_insurance_qualifies() {
        let (service, _) = build_service();
        let record = service
            .submit(form(true, true, true, "responsible_party", "vehicular"))
            .expect("submitted");

        assert_eq!(record.viability_score, 7);
        assert_eq!(record.state, CaseState::Qualified);
        assert_eq!(record.priority, 5);
    }

    #[test]
    fn nothing_checked_is_discarded() {
        let (service, _) = build_service();
        let record = service
            .submit(form(false, false, false, "responsible_party", "motorcycle"))
            .expect("submitted");

        assert_eq!(record.viability_score, 0);
        assert_eq!(record.state, CaseState::Discarded);
        assert_eq!(record.priority, 1);
    }
}

mod staff {
    use super::common::*;
    use claim_intake::cases::{CaseFilter, CaseState, StaffUpdate};

    #[test]
    fn overrides_survive_until_explicit_retriage() {
        let (service, _) = build_service();
        let record = service
            .submit(form(true, true, true, "victim", "pedestrian"))
            .expect("submitted");

        service
            .update(
                &record.id,
                StaffUpdate {
                    state: Some(CaseState::Contacted),
                    priority: Some(2),
                    lawyer_notes: Some("Meeting booked for Monday".to_string()),
                },
            )
            .expect("override");

        let listed = service
            .list(CaseFilter {
                state: Some(CaseState::Contacted),
                min_priority: None,
            })
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].priority, 2);
        assert_eq!(listed[0].viability_score, 10);

        let rescored = service.retriage(&record.id).expect("retriage");
        assert_eq!(rescored.state, CaseState::Qualified);
        assert_eq!(rescored.priority, 5);
        assert_eq!(rescored.lawyer_notes, "Meeting booked for Monday");
    }

    #[test]
    fn bulk_delete_clears_dashboard() {
        let (service, _) = build_service();
        let first = service
            .submit(form(false, true, false, "victim", "vehicular"))
            .expect("first");
        let second = service
            .submit(form(false, false, true, "victim", "vehicular"))
            .expect("second");

        let before = service.dashboard().expect("dashboard");
        assert_eq!(before.total_cases, 2);
        assert_eq!(before.pending.len(), 2);

        let report = service
            .delete_many(&[first.id, second.id])
            .expect("bulk delete");
        assert_eq!(report.deleted.len(), 2);
        assert!(report.missing.is_empty());

        let after = service.dashboard().expect("dashboard");
        assert_eq!(after.total_cases, 0);
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use claim_intake::cases::case_router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn intake_then_dashboard_round_trip() {
        let (service, _) = build_service();
        let app = case_router(service);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/cases")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&form(true, false, true, "victim", "pedestrian"))
                            .expect("serialize"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = read_json(response).await;
        assert_eq!(created["viability_score"], json!(8));
        assert_eq!(created["state"], json!("qualified"));

        let response = app
            .oneshot(
                Request::get("/api/v1/admin/dashboard")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let dashboard = read_json(response).await;
        assert_eq!(dashboard["total_cases"], json!(1));
        assert_eq!(dashboard["latest"][0]["id"], created["id"]);
        assert_eq!(dashboard["pending"], json!([]));
    }

    #[tokio::test]
    async fn list_route_filters_with_query_string() {
        let (service, _) = build_service();
        service
            .submit(form(false, true, false, "responsible_party", "vehicular"))
            .expect("review");
        service
            .submit(form(true, true, true, "victim", "pedestrian"))
            .expect("qualified");
        let app = case_router(service);

        let response = app
            .oneshot(
                Request::get("/api/v1/cases?state=under-review")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let cases = payload.as_array().expect("array");
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0]["state"], json!("under_review"));
    }
}
