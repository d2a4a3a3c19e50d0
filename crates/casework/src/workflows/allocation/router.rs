use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::directory::{DirectoryError, UserDirectory, WorkloadLedger};
use super::domain::{Assessment, Crn, PlacementApplication, PlacementRequest};
use super::repository::{AllocationRepository, RepositoryError};
use super::service::{AllocationServiceError, CaseAllocationService};

/// Router builder exposing HTTP endpoints for allocation decisions.
pub fn allocation_router<D, R>(service: Arc<CaseAllocationService<D, R>>) -> Router
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/allocations/assessments",
            post(assessment_handler::<D, R>),
        )
        .route(
            "/api/v1/allocations/placement-requests",
            post(placement_request_handler::<D, R>),
        )
        .route(
            "/api/v1/allocations/placement-applications",
            post(placement_application_handler::<D, R>),
        )
        .route("/api/v1/allocations/:crn", get(case_history_handler::<D, R>))
        .with_state(service)
}

pub(crate) async fn assessment_handler<D, R>(
    State(service): State<Arc<CaseAllocationService<D, R>>>,
    axum::Json(assessment): axum::Json<Assessment>,
) -> Response
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    match service.allocate_assessment(assessment) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn placement_request_handler<D, R>(
    State(service): State<Arc<CaseAllocationService<D, R>>>,
    axum::Json(request): axum::Json<PlacementRequest>,
) -> Response
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    match service.allocate_placement_request(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn placement_application_handler<D, R>(
    State(service): State<Arc<CaseAllocationService<D, R>>>,
    axum::Json(application): axum::Json<PlacementApplication>,
) -> Response
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    match service.allocate_placement_application(application) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn case_history_handler<D, R>(
    State(service): State<Arc<CaseAllocationService<D, R>>>,
    Path(crn): Path<String>,
) -> Response
where
    D: UserDirectory + WorkloadLedger + 'static,
    R: AllocationRepository + 'static,
{
    let crn = Crn(crn);
    match service.decisions_for(&crn) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AllocationServiceError) -> Response {
    let status = match &error {
        AllocationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AllocationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AllocationServiceError::Repository(RepositoryError::Unavailable(_))
        | AllocationServiceError::Directory(DirectoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
