use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CaseFilter, CaseId, CaseState, CaseView, StaffUpdate};
use super::extract::{rejection_response, CasePath, IntakeSubmission, JsonBody, QueryParams};
use super::repository::{CaseRepository, RepositoryError};
use super::service::{CaseIntakeService, CaseServiceError};

/// Router exposing the public intake endpoint and the staff case endpoints.
pub fn case_router<R>(service: Arc<CaseIntakeService<R>>) -> Router
where
    R: CaseRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/cases",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/cases/:case_id",
            get(detail_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/cases/:case_id/retriage",
            post(retriage_handler::<R>),
        )
        .route(
            "/api/v1/admin/cases/bulk-delete",
            post(bulk_delete_handler::<R>),
        )
        .route("/api/v1/admin/cases/export", get(export_handler::<R>))
        .route("/api/v1/admin/dashboard", get(dashboard_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default)]
    pub(crate) min_priority: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    pub(crate) ids: Vec<CaseId>,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    IntakeSubmission(form): IntakeSubmission,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.submit(form) {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Response
where
    R: CaseRepository + 'static,
{
    let state = match query.state.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match CaseState::parse(raw) {
            Some(state) => Some(state),
            None => {
                return rejection_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("unknown case state '{raw}'"),
                );
            }
        },
    };

    let filter = CaseFilter {
        state,
        min_priority: query.min_priority,
    };

    match service.list(filter) {
        Ok(records) => {
            let views: Vec<CaseView> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    CasePath(case_id): CasePath,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.get(&case_id) {
        Ok(record) => {
            let payload = json!({
                "case": record.view(),
                "intake": record.intake,
                "score_breakdown": record.score_breakdown,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    CasePath(case_id): CasePath,
    JsonBody(update): JsonBody<StaffUpdate>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.update(&case_id, update) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn retriage_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    CasePath(case_id): CasePath,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.retriage(&case_id) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    CasePath(case_id): CasePath,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.delete(&case_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_delete_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
    JsonBody(request): JsonBody<BulkDeleteRequest>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.delete_many(&request.ids) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<R>(State(service): State<Arc<CaseIntakeService<R>>>) -> Response
where
    R: CaseRepository + 'static,
{
    match service.export_csv() {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"cases.csv\""),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<CaseIntakeService<R>>>,
) -> Response
where
    R: CaseRepository + 'static,
{
    match service.dashboard() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: CaseServiceError) -> Response {
    let status = match &err {
        CaseServiceError::Intake(_) | CaseServiceError::InvalidPriority(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CaseServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CaseServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CaseServiceError::Repository(RepositoryError::Unavailable(_))
        | CaseServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    rejection_response(status, err.to_string())
}
