//! Request and response payloads for the retrieval API.

use argorag_core::models::{DepthLevel, RowMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub results: Vec<RowMap>,
}

#[derive(Debug, Serialize)]
pub struct DepthSeriesResponse {
    pub profile_id: String,
    pub depth_series: Vec<DepthLevel>,
}
