//! Route handlers and the JSON envelope they answer with.

use super::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chatbox_article::ArticleListing;
use chatbox_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Envelope of every response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// Failure answered as `{success: false, error}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        let status = match error {
            AppError::ArticleNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
}

pub async fn health() -> Json<ApiResponse<HealthData>> {
    ApiResponse::ok(HealthData { status: "healthy" })
}

/// Query string or JSON body of a chat request.
#[derive(Debug, Deserialize)]
pub struct ChatParams {
    pub article_id: Option<String>,
    pub question: Option<String>,
    /// Keeps a conversation across requests; without it every question
    /// starts fresh
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatData {
    pub response: String,
    pub article_id: String,
    pub question: String,
}

pub async fn chat_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChatParams>,
) -> Result<Json<ApiResponse<ChatData>>, ApiError> {
    chat(&state, params).await
}

pub async fn chat_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatParams>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatData>>, ApiError> {
    let Json(params) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    chat(&state, params).await
}

async fn chat(state: &AppState, params: ChatParams) -> Result<Json<ApiResponse<ChatData>>, ApiError> {
    let article_id = params
        .article_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("article_id is required"))?;

    let question = params
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("question must not be empty"))?;

    let session_id = params.session_id.as_deref().filter(|id| !id.trim().is_empty());
    let response = state
        .registry
        .ask(&article_id, session_id, &question)
        .await?;

    Ok(ApiResponse::ok(ChatData {
        response,
        article_id,
        question,
    }))
}

#[derive(Debug, Serialize)]
pub struct ArticlesData {
    pub articles: Vec<ArticleListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ArticlesData>>, ApiError> {
    let articles = state.registry.list_articles().await?;
    let message = articles.is_empty().then_some("No articles found");

    Ok(ApiResponse::ok(ArticlesData { articles, message }))
}

#[derive(Debug, Serialize)]
pub struct ClosedData {
    pub session_id: String,
    pub closed: usize,
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ClosedData>>, ApiError> {
    let closed = state.registry.reset(&session_id).await;
    if closed == 0 {
        return Err(ApiError::not_found(format!(
            "No conversation with session ID {}",
            session_id
        )));
    }

    Ok(ApiResponse::ok(ClosedData { session_id, closed }))
}
