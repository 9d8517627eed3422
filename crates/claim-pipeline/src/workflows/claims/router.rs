use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use super::domain::{ApplicationDraft, ApplicationId, ApplicationView};
use super::repository::ApplicationRepository;
use super::service::{ActionRequest, ClaimPipelineService, ClaimServiceError};
use crate::workflows::http::{
    body_rejection_response, pipeline_response, repository_response, validation_response,
};
use crate::workflows::query::{ApplicationFilter, StatsOverview};

/// Router exposing application intake, stage actions and read-side views.
pub fn application_router<R>(service: Arc<ClaimPipelineService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/applications",
            get(list_handler::<R>).post(submit_handler::<R>),
        )
        .route("/applications/:application_id", get(fetch_handler::<R>))
        .route(
            "/applications/:application_id/action",
            post(action_handler::<R>),
        )
        .route("/stats/overview", get(stats_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ClaimPipelineService<R>>>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(applications) => {
            let views: Vec<ApplicationView> = filter
                .apply(applications)
                .iter()
                .map(|application| application.view())
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ClaimPipelineService<R>>>,
    payload: Result<Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    match service.submit(draft) {
        Ok(application) => (StatusCode::CREATED, Json(application.view())).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<ClaimPipelineService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn action_handler<R>(
    State(service): State<Arc<ClaimPipelineService<R>>>,
    Path(application_id): Path<String>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    match service.act(&ApplicationId(application_id), request) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<ClaimPipelineService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(applications) => {
            let overview = StatsOverview::from_applications(&applications, Utc::now());
            (StatusCode::OK, Json(overview)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

fn failure_response(error: ClaimServiceError) -> Response {
    match &error {
        ClaimServiceError::Validation(err) => validation_response(err),
        ClaimServiceError::Pipeline(err) => pipeline_response(err),
        ClaimServiceError::Repository(err) => repository_response(err),
    }
}
