//! HTTP front end over a shared [`SessionRegistry`].

pub mod handlers;

use axum::{
    routing::{delete, get},
    Router,
};
use chatbox_article::SessionRegistry;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// State shared by every request.
pub struct AppState {
    pub registry: SessionRegistry,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/chat", get(handlers::chat_get).post(handlers::chat_post))
        .route("/api/chat/{session_id}", delete(handlers::close_session))
        .route("/api/articles", get(handlers::list_articles))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
