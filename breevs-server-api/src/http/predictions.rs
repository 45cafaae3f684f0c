use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    ServiceError,
    http::{AppState, games::parse_game_id},
};

pub async fn predict(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let prediction = app_state.prediction_service.predict(game_id).await?;
    Ok(Json(prediction))
}
