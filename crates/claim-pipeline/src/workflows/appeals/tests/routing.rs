use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::appeals::domain::ReplyDraft;
use crate::workflows::appeals::repository::AppealRepository;
use crate::workflows::appeals::router::{fetch_handler, reply_handler};
use crate::workflows::appeals::store::InMemoryAppealStore;

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn create_route_returns_created_appeal() {
    let (service, _, _) = build_service();
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/appeals",
            json!({
                "appId": "APP-000001",
                "raisedBy": "claimant",
                "raisedOrg": "NGO",
                "targetOrg": "DLC",
                "message": "Please review"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["type"], json!("appeal"));
    assert_eq!(payload["appId"], json!("APP-000001"));
    assert_eq!(payload["replies"], json!([]));
}

#[tokio::test]
async fn create_route_rejects_appeal_without_application() {
    let (service, _, _) = build_service();
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/appeals",
            json!({ "raisedBy": "claimant", "type": "appeal", "message": "Please review" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("validation_error"));
}

#[tokio::test]
async fn create_route_answers_unknown_type_with_validation_error() {
    let (service, store, _) = build_service();
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            "/appeals",
            json!({
                "appId": "APP-000001",
                "raisedBy": "claimant",
                "type": "memo",
                "message": "Please review"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["code"], json!("validation_error"));
    assert!(store.list().expect("list").is_empty());
}

#[tokio::test]
async fn reply_route_answers_wrongly_typed_body_with_validation_error() {
    let (service, _, _) = build_service();
    let appeal = service.create(complaint_draft("DLC")).expect("create");
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            &format!("/appeals/{}/reply", appeal.id),
            json!({ "by": "dlc-officer", "message": 42 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["code"], json!("validation_error"));
}

#[tokio::test]
async fn list_route_filters_and_orders_newest_first() {
    let (service, _, _) = build_service();
    let older = service.create(complaint_draft("DLC")).expect("older");
    let newer = service.create(appeal_draft("APP-1", "DLC")).expect("newer");
    service.create(complaint_draft("SDLC")).expect("elsewhere");
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(get_request("/appeals?targetOrg=DLC&newestFirst=true"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ids: Vec<_> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .filter_map(|appeal| appeal["id"].as_str())
        .collect();
    assert_eq!(ids, vec![newer.id.0.as_str(), older.id.0.as_str()]);
}

#[tokio::test]
async fn inbox_route_counts_unread_per_type() {
    let (service, _, _) = build_service();
    let seen = service.create(appeal_draft("APP-1", "DLC")).expect("appeal");
    service.create(complaint_draft("DLC")).expect("complaint");
    service.create(complaint_draft("SDLC")).expect("elsewhere");
    let router = appeal_router_with_service(service);

    let uri = format!("/appeals/inbox?org=DLC&seen={}&type=complaint", seen.id);
    let response = router
        .oneshot(get_request(&uri))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["organization"], json!("DLC"));
    assert_eq!(payload["counts"]["all"], json!(2));
    assert_eq!(payload["counts"]["unreadAll"], json!(1));
    assert_eq!(payload["counts"]["unreadAppeals"], json!(0));
    assert_eq!(payload["counts"]["unreadComplaints"], json!(1));
    let entries = payload["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], json!("complaint"));
    assert_eq!(entries[0]["unread"], json!(true));
}

#[tokio::test]
async fn reply_handler_appends_and_maps_missing_appeal() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let appeal = service.create(complaint_draft("DLC")).expect("create");

    let response = reply_handler::<InMemoryAppealStore, RecordingSink>(
        State(service.clone()),
        Path(appeal.id.0.clone()),
        Ok(axum::Json(ReplyDraft {
            by: "dlc-officer".to_string(),
            org: Some("DLC".to_string()),
            message: "Looking into it".to_string(),
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["replies"][0]["kind"], json!("reply"));
    assert_eq!(payload["replies"][0]["message"], json!("Looking into it"));

    let response = reply_handler::<InMemoryAppealStore, RecordingSink>(
        State(service.clone()),
        Path("APPEAL-404".to_string()),
        Ok(axum::Json(ReplyDraft::default())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(response).await["error"], json!("Not found"));
}

#[tokio::test]
async fn reconsider_route_records_reply_and_publishes() {
    let (service, _, sink) = build_service();
    let appeal = service.create(appeal_draft("APP-000001", "DLC")).expect("create");
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            &format!("/appeals/{}/reconsider", appeal.id),
            json!({ "by": "dlc-officer", "org": "DLC" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["replies"][0]["kind"], json!("reconsideration"));
    assert_eq!(
        payload["replies"][0]["message"],
        json!("Request reconsideration by DLC")
    );
    assert_eq!(sink.events().len(), 1);
}

#[tokio::test]
async fn reconsider_route_maps_sink_failure() {
    let (service, _, _) = build_service_with(RecordingSink::answering(None));
    let appeal = service.create(appeal_draft("APP-1", "DLC")).expect("create");
    let router = appeal_router_with_service(service);

    let response = router
        .oneshot(json_request(
            &format!("/appeals/{}/reconsider", appeal.id),
            json!({ "by": "dlc-officer" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json_body(response).await["code"],
        json!("reconsideration_failed")
    );
}

#[tokio::test]
async fn fetch_handler_returns_stored_appeal() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let appeal = service.create(complaint_draft("DLC")).expect("create");

    let response = fetch_handler::<InMemoryAppealStore, RecordingSink>(
        State(service),
        Path(appeal.id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["id"], json!(appeal.id.0));
}
