//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::analytics::{AnalyticsEvent, EventQueue, HttpEventSink};
use crate::cache::{generate_key, TtlCache};
use crate::client::{
    ApiClient, LogNavigator, LogNotifier, MemoryCredentialStore, QueryParams, ResponseBody,
};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ClearResponse, HealthResponse, ProxyResponse, StatsResponse, TrackResponse};

/// Application state shared across all handlers.
///
/// The one cache, event queue and API client of the process. Built once at
/// startup and handed to consumers by handle.
#[derive(Clone)]
pub struct AppState {
    /// Memoized upstream responses
    pub cache: Arc<RwLock<TtlCache<Value>>>,
    /// Analytics batching queue
    pub events: EventQueue,
    /// Remote API client
    pub client: ApiClient,
}

impl AppState {
    /// Creates a new AppState from already-built components.
    pub fn new(cache: TtlCache<Value>, events: EventQueue, client: ApiClient) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            events,
            client,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The API client and the analytics sink share one HTTP connection pool.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;

        let sink = HttpEventSink::new(http.clone(), config.analytics_endpoint.clone());
        let events = EventQueue::new(Arc::new(sink), &config.queue_config());

        let client = ApiClient::new(
            http,
            config.client_config(),
            Arc::new(MemoryCredentialStore::new(config.api_token.clone())),
            Arc::new(LogNotifier),
            Arc::new(LogNavigator),
        );

        Ok(Self::new(TtlCache::new(config.cache_ttl()), events, client))
    }

    /// Serves `key` from the cache, or fetches `path` upstream and caches the
    /// result. The cache lock is never held across the upstream call.
    async fn cached_fetch(
        &self,
        key: String,
        path: &str,
        params: &QueryParams,
        ttl: Option<Duration>,
    ) -> Result<ProxyResponse> {
        if let Some(data) = self.cache.write().await.get(&key) {
            debug!(%key, "Cache hit");
            return Ok(ProxyResponse::new(key, true, data));
        }

        let data = match self.client.get(path, params).await? {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        };

        self.cache.write().await.set(key.clone(), data.clone(), ttl);
        Ok(ProxyResponse::new(key, false, data))
    }
}

fn params_map(params: &QueryParams) -> Map<String, Value> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

/// An id becomes one segment of the upstream path, so it may not carry
/// separators, query or fragment markers, escapes, or dot segments.
fn validate_equipment_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(AppError::InvalidRequest("Equipment id cannot be empty".to_string()));
    }

    let forbidden = |c: char| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control();
    if id == "." || id == ".." || id.contains(forbidden) {
        return Err(AppError::InvalidRequest(format!("Invalid equipment id: {:?}", id)));
    }
    Ok(())
}

/// Handler for GET /equipment
///
/// Lists equipment through the cache. Query parameters are forwarded
/// upstream and form part of the cache key.
pub async fn list_equipment_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<ProxyResponse>> {
    let key = generate_key("equipment", &params_map(&params));
    let response = state.cached_fetch(key, "equipment", &params, None).await?;

    Ok(Json(response))
}

/// Handler for GET /equipment/:id
pub async fn get_equipment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProxyResponse>> {
    validate_equipment_id(&id)?;

    let mut params = Map::new();
    params.insert("id".to_string(), Value::String(id.clone()));
    let key = generate_key("equipment_item", &params);

    let path = format!("equipment/{}", id);
    let response = state
        .cached_fetch(key, &path, &QueryParams::new(), None)
        .await?;

    Ok(Json(response))
}

/// Handler for POST /events
///
/// Queues an analytics event. Delivery happens later, in batches.
pub async fn track_event_handler(
    State(state): State<AppState>,
    Json(event): Json<AnalyticsEvent>,
) -> Result<(StatusCode, Json<TrackResponse>)> {
    if let Some(error_msg) = event.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    state.events.track_event(event);

    Ok((
        StatusCode::ACCEPTED,
        Json(TrackResponse::new(state.events.pending())),
    ))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.len();
    cache.clear();

    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
///
/// Returns cache statistics and the analytics backlog.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();

    Json(StatsResponse::new(&stats, state.events.pending()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
