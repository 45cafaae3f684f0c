use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use breevs_server_domain::summary::GameSummary;

use crate::{
    ServiceError,
    http::{AppState, games::parse_game_id},
};

pub async fn generate(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<JsonGameSummary>), ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let generated = app_state.summary_service.generate_summary(game_id).await?;

    let status = if generated.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(JsonGameSummary::from_summary(&generated.summary)?)))
}

pub async fn get_by_game(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonGameSummary>, ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let summary = app_state.summary_service.get_summary(game_id).await?;
    Ok(Json(JsonGameSummary::from_summary(&summary)?))
}

#[derive(serde::Deserialize)]
pub struct JsonSummaryFilter {
    wallet: Option<String>,
}

pub async fn get_all(
    State(app_state): State<AppState>,
    Query(filter): Query<JsonSummaryFilter>,
) -> Result<Json<Vec<JsonGameSummary>>, ServiceError> {
    let wallet = filter.wallet.filter(|w| !w.trim().is_empty());
    let summaries = app_state
        .summary_service
        .list_summaries(wallet.as_deref())
        .await?;

    summaries
        .iter()
        .map(JsonGameSummary::from_summary)
        .collect::<Result<Vec<_>, _>>()
        .map(Json)
}

#[derive(serde::Serialize)]
pub struct JsonGameSummary {
    id: i64,
    game: i64,
    ai_summary: String,
    total_rounds: u32,
    total_spins: u32,
    elimination_order: serde_json::Value,
    key_moments: serde_json::Value,
    statistics: serde_json::Value,
    excitement_rating: Option<u8>,
    generated_at: i64,
}

impl JsonGameSummary {
    fn from_summary(summary: &GameSummary) -> Result<Self, ServiceError> {
        Ok(Self {
            id: summary.id,
            game: summary.game_id,
            ai_summary: summary.ai_summary.clone(),
            total_rounds: summary.total_rounds,
            total_spins: summary.total_spins,
            elimination_order: serde_json::to_value(&summary.elimination_order)
                .map_err(|e| ServiceError::Internal(e.to_string()))?,
            key_moments: serde_json::to_value(&summary.key_moments)
                .map_err(|e| ServiceError::Internal(e.to_string()))?,
            statistics: serde_json::to_value(&summary.statistics)
                .map_err(|e| ServiceError::Internal(e.to_string()))?,
            excitement_rating: summary.excitement_rating,
            generated_at: summary.generated_at.timestamp(),
        })
    }
}
