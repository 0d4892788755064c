//! Request extractors whose rejections use the same `{ "error": ... }` body as the handlers.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::domain::{CaseId, IntakeForm};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub(crate) fn rejection_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Intake answers posted either as JSON or as a browser form.
#[derive(Debug)]
pub(crate) struct IntakeSubmission(pub(crate) IntakeForm);

#[async_trait]
impl<S> FromRequest<S> for IntakeSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            Form::<IntakeForm>::from_request(req, state)
                .await
                .map(|Form(form)| Self(form))
                .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
        } else {
            Json::<IntakeForm>::from_request(req, state)
                .await
                .map(|Json(form)| Self(form))
                .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
        }
    }
}

/// JSON request body.
#[derive(Debug)]
pub(crate) struct JsonBody<T>(pub(crate) T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
    }
}

/// `:case_id` path segment.
#[derive(Debug)]
pub(crate) struct CasePath(pub(crate) CaseId);

#[async_trait]
impl<S> FromRequestParts<S> for CasePath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<u64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Self(CaseId(id)))
            .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
    }
}

/// Query string parameters.
#[derive(Debug)]
pub(crate) struct QueryParams<T>(pub(crate) T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| rejection_response(rejection.status(), rejection.body_text()))
    }
}
