//! HTTP surface for the AI therapist chat relay
//!
//! Forwards each user message to OpenRouter together with the session
//! transcript and returns the model reply. History lives in the
//! process-local [`SessionStore`] and is trimmed on every append.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ChatConfig;
use crate::error::{AppError, Result};
use crate::gateway::{CompletionGateway, GenerationParams, OpenRouterClient};
use crate::session::{Role, SessionConfig, SessionStore};

/// Seed system turn for every new session
pub const THERAPIST_PERSONA: &str = "You are a compassionate and professional AI therapist. Your role is to:
1. Listen actively and empathetically to users' concerns
2. Provide supportive responses without diagnosing or prescribing medication
3. Use evidence-based therapeutic techniques like CBT, mindfulness, and active listening
4. Encourage users to seek professional help when appropriate
5. Maintain confidentiality and create a safe space for discussion
6. Ask clarifying questions to better understand the user's situation
7. Validate feelings while offering constructive perspectives

Remember: You are not a replacement for professional therapy. Always encourage users to seek professional help for serious mental health concerns.";

const CHAT_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.7,
    max_tokens: 500,
};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ChatState {
    pub store: Arc<SessionStore>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub model: String,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "AI Therapist API is running"
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat(
    State(state): State<ChatState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<Value>) {
    let message = req.message.as_deref().map(str::trim).unwrap_or_default();
    let session_id = req.session_id.as_deref().map(str::trim).unwrap_or_default();

    if message.is_empty() || session_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message and sessionId are required" })),
        );
    }

    state.store.get_or_create(session_id).await;
    if let Err(e) = state.store.append(session_id, Role::User, message).await {
        error!("Error in chat endpoint: {}", e);
        return map_completion_error(e);
    }

    // Re-read so the gateway sees the transcript as trimmed by the append.
    let transcript = state.store.get_or_create(session_id).await;

    match state
        .gateway
        .complete(&state.model, transcript.turns(), CHAT_PARAMS)
        .await
    {
        Ok(reply) => {
            if let Err(e) = state
                .store
                .append(session_id, Role::Assistant, reply.clone())
                .await
            {
                error!("Error in chat endpoint: {}", e);
                return map_completion_error(e);
            }
            (StatusCode::OK, Json(json!({ "response": reply })))
        }
        Err(e) => {
            // The user turn stays recorded; only the reply is missing.
            error!("Error in chat endpoint: {}", e);
            map_completion_error(e)
        }
    }
}

fn map_completion_error(err: AppError) -> (StatusCode, Json<Value>) {
    match err {
        AppError::GatewayStatus { status: 401, .. } => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Authentication failed. Please check your OpenRouter API key."
            })),
        ),
        AppError::GatewayStatus { status: 429, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later."
            })),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "An error occurred while processing your request. Please try again."
            })),
        ),
    }
}

/// =============================
/// Clear Endpoint
/// =============================

async fn clear(
    State(state): State<ChatState>,
    Json(req): Json<ClearRequest>,
) -> (StatusCode, Json<Value>) {
    let session_id = req.session_id.as_deref().map(str::trim).unwrap_or_default();

    if !session_id.is_empty() && state.store.clear(session_id).await.is_ok() {
        info!("Cleared conversation for session {}", session_id);
        return (
            StatusCode::OK,
            Json(json!({ "message": "Conversation cleared" })),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid sessionId" })),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(
    store: Arc<SessionStore>,
    gateway: Arc<dyn CompletionGateway>,
    model: String,
) -> Router {
    let state = ChatState {
        store,
        gateway,
        model,
    };

    Router::new()
        .route("/api/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/clear", post(clear))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn serve(config: ChatConfig) -> Result<()> {
    let store = Arc::new(SessionStore::new(SessionConfig {
        system_prompt: THERAPIST_PERSONA.to_string(),
        max_exchange_turns: config.max_exchange_turns,
    }));
    let gateway: Arc<dyn CompletionGateway> = Arc::new(OpenRouterClient::new(config.openrouter));

    let router = create_router(store, gateway, config.model);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!("AI Therapist server is running on http://localhost:{}", config.port);

    axum::serve(listener, router).await?;

    Ok(())
}
