use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{HistoryEdit, HistoryId, ProgressId, StatusChangeRequest};
use super::repository::{AssessmentDispatcher, ProgressionStore, StoreError};
use super::service::{StatusChangeError, StatusChangeService};

/// Router builder exposing the status workflow's HTTP surface. Paths
/// match the contract consumed by the front end.
pub fn status_router<S, D>(service: Arc<StatusChangeService<S, D>>) -> Router
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    Router::new()
        .route("/status", get(catalog_handler::<S, D>))
        .route(
            "/applicant/status-history/:id",
            get(history_handler::<S, D>).put(edit_history_handler::<S, D>),
        )
        .route(
            "/applicant/update/status",
            axum::routing::put(update_status_handler::<S, D>),
        )
        .with_state(service)
}

pub(crate) async fn catalog_handler<S, D>(
    State(service): State<Arc<StatusChangeService<S, D>>>,
) -> Response
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    let catalog = service.catalog();
    (StatusCode::OK, axum::Json(catalog.statuses().to_vec())).into_response()
}

pub(crate) async fn history_handler<S, D>(
    State(service): State<Arc<StatusChangeService<S, D>>>,
    Path(progress_id): Path<String>,
) -> Response
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    match service.history(&ProgressId(progress_id)) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(StatusChangeError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": "progression not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn update_status_handler<S, D>(
    State(service): State<Arc<StatusChangeService<S, D>>>,
    axum::Json(request): axum::Json<StatusChangeRequest>,
) -> Response
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    match service.apply_change(request) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(
            error @ (StatusChangeError::UnknownStatus(_)
            | StatusChangeError::MissingBlacklistDetails
            | StatusChangeError::UnknownProgression(_)),
        ) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(StatusChangeError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": "applicant not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn edit_history_handler<S, D>(
    State(service): State<Arc<StatusChangeService<S, D>>>,
    Path(history_id): Path<String>,
    axum::Json(edit): axum::Json<HistoryEdit>,
) -> Response
where
    S: ProgressionStore + 'static,
    D: AssessmentDispatcher + 'static,
{
    match service.edit_record(&HistoryId(history_id), edit) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error @ StatusChangeError::UnknownStatus(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(StatusChangeError::Store(StoreError::NotFound)) => {
            let payload = json!({ "error": "history record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
