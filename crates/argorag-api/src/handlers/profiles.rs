use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::dto::DepthSeriesResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Fetch the full depth series (PRES, TEMP, PSAL) for a profile.
pub async fn get_depth_series(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<String>,
) -> Result<Json<DepthSeriesResponse>, ApiError> {
    let series = state.depth_store.read(&profile_id)?;

    Ok(Json(DepthSeriesResponse {
        profile_id: series.profile_id,
        depth_series: series.levels,
    }))
}
