//! HTTP surface for the family journal service
//!
//! CRUD over families and journal entries, with one AI insight requested
//! per entry at creation time.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::JournalConfig;
use crate::error::Result;
use crate::gateway::{CompletionGateway, OpenRouterClient};
use crate::journal::insight;
use crate::journal::store::FamilyStore;
use crate::models::{EntryType, JournalEntry};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFamilyRequest {
    pub family_name: Option<String>,
    pub parent_name: Option<String>,
    pub teen_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub author: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
    pub entry_type: Option<String>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct JournalState {
    pub store: Arc<FamilyStore>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub model: String,
}

/// =============================
/// Helpers
/// =============================

fn family_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Family not found" })),
    )
}

fn fields_required() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "All fields are required" })),
    )
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Family Connect API is running"
    }))
}

/// =============================
/// Family Endpoints
/// =============================

async fn create_family(
    State(state): State<JournalState>,
    Json(req): Json<CreateFamilyRequest>,
) -> (StatusCode, Json<Value>) {
    let family_name = req.family_name.as_deref().map(str::trim).unwrap_or_default();
    let parent_name = req.parent_name.as_deref().map(str::trim).unwrap_or_default();
    let teen_name = req.teen_name.as_deref().map(str::trim).unwrap_or_default();

    if family_name.is_empty() || parent_name.is_empty() || teen_name.is_empty() {
        return fields_required();
    }

    let family = state
        .store
        .create_family(family_name, parent_name, teen_name)
        .await;
    info!("Created family '{}' ({})", family.name, family.id);

    (
        StatusCode::CREATED,
        Json(json!({
            "family": family,
            "message": "Family created successfully"
        })),
    )
}

async fn get_family(
    State(state): State<JournalState>,
    Path(family_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    // Unparseable ids cannot name a family, so they read as unknown.
    let Ok(family_id) = Uuid::parse_str(&family_id) else {
        return family_not_found();
    };

    match state.store.family(family_id).await {
        Some(family) => (StatusCode::OK, Json(json!({ "family": family }))),
        None => family_not_found(),
    }
}

/// =============================
/// Journal Endpoints
/// =============================

async fn add_entry(
    State(state): State<JournalState>,
    Path(family_id): Path<String>,
    Json(req): Json<CreateEntryRequest>,
) -> (StatusCode, Json<Value>) {
    let Ok(family_id) = Uuid::parse_str(&family_id) else {
        return family_not_found();
    };
    if state.store.family(family_id).await.is_none() {
        return family_not_found();
    }

    let author = req.author.as_deref().map(str::trim).unwrap_or_default();
    let content = req.content.as_deref().map(str::trim).unwrap_or_default();
    let mood = req.mood.as_deref().map(str::trim).unwrap_or_default();
    let entry_type = req.entry_type.as_deref().map(str::trim).unwrap_or_default();

    if author.is_empty() || content.is_empty() || mood.is_empty() || entry_type.is_empty() {
        return fields_required();
    }

    let entry_type = EntryType::parse(entry_type);
    let mut entry = JournalEntry::new(family_id, author, content, mood, entry_type);
    entry.ai_insight = Some(
        insight::generate(
            state.gateway.as_ref(),
            &state.model,
            content,
            mood,
            entry_type,
        )
        .await,
    );

    match state.store.add_entry(entry.clone()).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(json!({
                "entry": entry,
                "message": "Journal entry added successfully"
            })),
        ),
        Err(_) => family_not_found(),
    }
}

async fn get_entries(
    State(state): State<JournalState>,
    Path(family_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let Ok(family_id) = Uuid::parse_str(&family_id) else {
        return family_not_found();
    };

    match state.store.entries_for(family_id).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))),
        Err(_) => family_not_found(),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(
    store: Arc<FamilyStore>,
    gateway: Arc<dyn CompletionGateway>,
    model: String,
) -> Router {
    let state = JournalState {
        store,
        gateway,
        model,
    };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/families", post(create_family))
        .route("/api/families/:family_id", get(get_family))
        .route(
            "/api/families/:family_id/journal",
            get(get_entries).post(add_entry),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn serve(config: JournalConfig) -> Result<()> {
    let store = Arc::new(FamilyStore::new());
    let gateway: Arc<dyn CompletionGateway> = Arc::new(OpenRouterClient::new(config.openrouter));

    let router = create_router(store, gateway, config.model);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("Family Connect Server running on port {}", config.port);
    info!("Health check: http://localhost:{}/api/health", config.port);

    axum::serve(listener, router).await?;

    Ok(())
}
