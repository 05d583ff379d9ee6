use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{ChatRequest, ChatResponse};
use crate::error::ApiError;
use crate::state::AppState;
use argorag_retrieval::RetrievalOutcome;

/// Translate a free-text question into SQL and return matching rows.
///
/// Translation failure is a hard failure of the stage (502). Execution
/// failure is a data problem, reported as a clear textual message with
/// zero rows rather than a server error.
pub async fn submit_question(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::info!(question = %request.question, "processing question");

    let Some(sql) = state.translator.translate(&request.question).await else {
        return Err(ApiError::bad_gateway("Failed to translate the question into a query"));
    };

    tracing::debug!(%sql, "executing translated query");

    match state.retriever.execute(&sql).await {
        RetrievalOutcome::Rows(results) => Ok(Json(ChatResponse {
            response: "Here are the profiles that match your request:".to_string(),
            results,
        })),
        RetrievalOutcome::Failed { error } => Ok(Json(ChatResponse {
            response: format!(
                "I'm sorry, I couldn't process that query. Database error: {}",
                error
            ),
            results: Vec::new(),
        })),
    }
}
