use axum::{Json, extract::State};
use breevs_server_domain::comparison::StrategyComparison;

use crate::{ServiceError, http::AppState};

#[derive(serde::Deserialize)]
pub struct JsonComparisonRequest {
    #[serde(default)]
    wallets: Vec<String>,
}

pub async fn compare(
    State(app_state): State<AppState>,
    Json(request): Json<JsonComparisonRequest>,
) -> Result<Json<StrategyComparison>, ServiceError> {
    let comparison = app_state
        .comparison_service
        .compare(&request.wallets)
        .await?;
    Ok(Json(comparison))
}
