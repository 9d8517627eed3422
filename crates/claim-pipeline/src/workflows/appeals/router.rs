use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{AppealDraft, AppealId, AppealKind, ReconsiderationDraft, ReplyDraft};
use super::repository::AppealRepository;
use super::service::{AppealService, AppealServiceError};
use crate::workflows::events::ReconsiderationSink;
use crate::workflows::http::{
    body_rejection_response, error_response, repository_response, split_list,
    validation_response,
};
use crate::workflows::query::{newest_first, AppealFilter, AppealInbox, ReadMarkers};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppealListQuery {
    #[serde(default)]
    target_org: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<AppealKind>,
    #[serde(default)]
    newest_first: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InboxQuery {
    org: String,
    /// Comma separated appeal ids the organization has already opened.
    #[serde(default)]
    seen: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<AppealKind>,
}

/// Router exposing appeal intake, replies and reconsideration.
pub fn appeal_router<R, S>(service: Arc<AppealService<R, S>>) -> Router
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    Router::new()
        .route(
            "/appeals",
            get(list_handler::<R, S>).post(create_handler::<R, S>),
        )
        .route("/appeals/inbox", get(inbox_handler::<R, S>))
        .route("/appeals/:appeal_id", get(fetch_handler::<R, S>))
        .route("/appeals/:appeal_id/reply", post(reply_handler::<R, S>))
        .route(
            "/appeals/:appeal_id/reconsider",
            post(reconsider_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    Query(query): Query<AppealListQuery>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    let filter = AppealFilter {
        target_org: query.target_org,
        kind: query.kind,
    };
    match service.list(&filter) {
        Ok(mut appeals) => {
            if query.newest_first {
                newest_first(&mut appeals);
            }
            (StatusCode::OK, Json(appeals)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn create_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    payload: Result<Json<AppealDraft>, JsonRejection>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    match service.create(draft) {
        Ok(appeal) => (StatusCode::CREATED, Json(appeal)).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn inbox_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    Query(query): Query<InboxQuery>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    let markers = ReadMarkers::from_ids(
        split_list(query.seen.as_deref())
            .into_iter()
            .map(AppealId),
    );
    match service.list(&AppealFilter::default()) {
        Ok(appeals) => {
            let inbox = AppealInbox::build(appeals, query.org.trim(), &markers, query.kind);
            (StatusCode::OK, Json(inbox)).into_response()
        }
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn fetch_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    Path(appeal_id): Path<String>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    match service.get(&AppealId(appeal_id)) {
        Ok(appeal) => (StatusCode::OK, Json(appeal)).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn reply_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    Path(appeal_id): Path<String>,
    payload: Result<Json<ReplyDraft>, JsonRejection>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    match service.reply(&AppealId(appeal_id), draft) {
        Ok(appeal) => (StatusCode::OK, Json(appeal)).into_response(),
        Err(err) => failure_response(err),
    }
}

pub(crate) async fn reconsider_handler<R, S>(
    State(service): State<Arc<AppealService<R, S>>>,
    Path(appeal_id): Path<String>,
    payload: Result<Json<ReconsiderationDraft>, JsonRejection>,
) -> Response
where
    R: AppealRepository + 'static,
    S: ReconsiderationSink + 'static,
{
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection_response(&rejection),
    };
    match service.reconsider(&AppealId(appeal_id), draft) {
        Ok(appeal) => (StatusCode::OK, Json(appeal)).into_response(),
        Err(err) => failure_response(err),
    }
}

fn failure_response(error: AppealServiceError) -> Response {
    match &error {
        AppealServiceError::Validation(err) => validation_response(err),
        AppealServiceError::Repository(err) => repository_response(err),
        AppealServiceError::Sink(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "reconsideration_failed",
            err.to_string(),
        ),
    }
}
