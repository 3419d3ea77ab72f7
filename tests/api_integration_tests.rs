//! Integration Tests for Gateway Endpoints
//!
//! Tests the full request/response cycle for each endpoint, with a local
//! axum server standing in for the remote API.

mod common;

use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rental_edge::{api::create_router, AppState, Config};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

use common::{spawn_upstream, Hits};

// == Upstream ==

async fn list_equipment(State(hits): State<Hits>, RawQuery(query): RawQuery) -> Json<Value> {
    let call = hits.record("list");
    Json(json!([{"id": "eq-1", "name": "Trail tent", "query": query, "call": call}]))
}

async fn get_equipment(State(hits): State<Hits>, Path(id): Path<String>) -> impl IntoResponse {
    hits.record("item");
    if id == "eq-1" {
        (StatusCode::OK, Json(json!({"id": "eq-1", "daily_rate": 35.0})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("Equipment {} not found", id)})),
        )
    }
}

async fn admin_users(State(hits): State<Hits>) -> Json<Value> {
    hits.record("admin");
    Json(json!({"secret": "admin-data"}))
}

// == Helper Functions ==

async fn create_test_app(cache_ttl_secs: u64) -> (Router, AppState, Hits) {
    let hits = Hits::default();
    let upstream = Router::new()
        .route("/equipment", get(list_equipment))
        .route("/equipment/:id", get(get_equipment))
        .route("/admin/users", get(admin_users))
        .with_state(hits.clone());
    let base_url = spawn_upstream(upstream).await;

    let config = Config {
        api_base_url: base_url.clone(),
        analytics_endpoint: format!("{}/analytics", base_url),
        cache_default_ttl: cache_ttl_secs,
        api_timeout: 2,
        ..Config::default()
    };
    let state = AppState::from_config(&config).unwrap();
    (create_router(state.clone()), state, hits)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == Equipment Endpoint Tests ==

#[tokio::test]
async fn test_equipment_list_is_cached() {
    let (app, _, hits) = create_test_app(300).await;

    let (status, first) = send(&app, "GET", "/equipment?category=tents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(first["data"][0]["query"], "category=tents");

    let (status, second) = send(&app, "GET", "/equipment?category=tents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(second["data"], first["data"]);
    assert_eq!(hits.get("list"), 1);
}

#[tokio::test]
async fn test_parameter_order_shares_cache_entry() {
    let (app, _, hits) = create_test_app(300).await;

    let (_, first) = send(&app, "GET", "/equipment?sort=price&category=tents", None).await;
    let (_, second) = send(&app, "GET", "/equipment?category=tents&sort=price", None).await;

    assert_eq!(first["key"], second["key"]);
    assert_eq!(second["cached"], true);
    assert_eq!(hits.get("list"), 1);
}

#[tokio::test]
async fn test_different_parameters_miss() {
    let (app, _, hits) = create_test_app(300).await;

    send(&app, "GET", "/equipment?category=tents", None).await;
    let (_, other) = send(&app, "GET", "/equipment?category=kayaks", None).await;

    assert_eq!(other["cached"], false);
    assert_eq!(hits.get("list"), 2);
}

#[tokio::test]
async fn test_cache_entry_expires() {
    let (app, _, hits) = create_test_app(1).await;

    send(&app, "GET", "/equipment", None).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let (_, again) = send(&app, "GET", "/equipment", None).await;

    assert_eq!(again["cached"], false);
    assert_eq!(again["data"][0]["call"], 2);
    assert_eq!(hits.get("list"), 2);
}

#[tokio::test]
async fn test_equipment_item_found_and_cached() {
    let (app, _, hits) = create_test_app(300).await;

    let (status, json) = send(&app, "GET", "/equipment/eq-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["daily_rate"], 35.0);

    let (_, json) = send(&app, "GET", "/equipment/eq-1", None).await;
    assert_eq!(json["cached"], true);
    assert_eq!(hits.get("item"), 1);
}

#[tokio::test]
async fn test_equipment_item_not_found_passes_through() {
    let (app, state, hits) = create_test_app(300).await;

    let (status, json) = send(&app, "GET", "/equipment/eq-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Equipment eq-404 not found");

    // Failures are not cached
    send(&app, "GET", "/equipment/eq-404", None).await;
    assert_eq!(hits.get("item"), 2);
    assert!(state.cache.read().await.is_empty());
}

#[tokio::test]
async fn test_equipment_id_cannot_escape_its_path() {
    let (app, state, hits) = create_test_app(300).await;

    let uris = [
        "/equipment/..%2Fadmin%2Fusers",
        "/equipment/%2E%2E",
        "/equipment/eq-1%3Fselect%3D*",
        "/equipment/eq-1%23fragment",
        "/equipment/eq-1%252F",
    ];
    for uri in uris {
        let (status, json) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(json.get("error").is_some());
    }

    assert_eq!(hits.get("admin"), 0);
    assert_eq!(hits.get("item"), 0);
    assert!(state.cache.read().await.is_empty());
}

// == Events Endpoint Tests ==

#[tokio::test]
async fn test_track_event_accepted() {
    let (app, state, _) = create_test_app(300).await;

    let (status, json) = send(
        &app,
        "POST",
        "/events",
        Some(r#"{"category":"Equipment","action":"view","label":"eq-1"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["queued"], 1);
    assert_eq!(state.events.pending(), 1);
}

#[tokio::test]
async fn test_track_event_blank_action_rejected() {
    let (app, state, _) = create_test_app(300).await;

    let (status, json) = send(
        &app,
        "POST",
        "/events",
        Some(r#"{"category":"Equipment","action":" "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
    assert_eq!(state.events.pending(), 0);
}

#[tokio::test]
async fn test_track_event_invalid_json() {
    let (app, _, _) = create_test_app(300).await;

    let (status, _) = send(&app, "POST", "/events", Some(r#"{"invalid json"#)).await;

    // Axum rejects malformed bodies before the handler runs
    assert!(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY);
}

// == Cache / Stats / Health Tests ==

#[tokio::test]
async fn test_clear_cache_endpoint() {
    let (app, _, hits) = create_test_app(300).await;
    send(&app, "GET", "/equipment", None).await;

    let (status, json) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 1);

    let (status, json) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 0);

    let (_, json) = send(&app, "GET", "/equipment", None).await;
    assert_eq!(json["cached"], false);
    assert_eq!(hits.get("list"), 2);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _, _) = create_test_app(300).await;

    send(&app, "GET", "/equipment", None).await; // miss
    send(&app, "GET", "/equipment", None).await; // hit
    send(
        &app,
        "POST",
        "/events",
        Some(r#"{"category":"Navigation","action":"page_view"}"#),
    )
    .await;

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["hit_rate"], 0.5);
    assert_eq!(json["pending_events"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _) = create_test_app(300).await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
