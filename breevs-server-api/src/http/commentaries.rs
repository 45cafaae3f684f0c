use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use breevs_server_domain::commentary::{CommentaryKind, DEFAULT_COMMENTARY_LIMIT, GameCommentary};

use crate::{
    ServiceError,
    http::{AppState, games::parse_game_id},
};

pub async fn generate_live(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<JsonGameCommentary>), ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let commentary = app_state.commentary_service.generate_live(game_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(JsonGameCommentary::from_commentary(&commentary)),
    ))
}

#[derive(serde::Deserialize)]
pub struct JsonCommentaryFilter {
    #[serde(rename = "type")]
    commentary_type: Option<String>,
    limit: Option<usize>,
}

pub async fn get_all(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
    Query(filter): Query<JsonCommentaryFilter>,
) -> Result<Json<Vec<JsonGameCommentary>>, ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let kind = filter
        .commentary_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            CommentaryKind::parse(s)
                .ok_or_else(|| ServiceError::BadRequest(format!("Invalid commentary type: {}", s)))
        })
        .transpose()?;
    let limit = filter
        .limit
        .filter(|&l| l > 0)
        .unwrap_or(DEFAULT_COMMENTARY_LIMIT);

    let commentaries = app_state
        .commentary_service
        .list(game_id, kind, limit)
        .await?;

    Ok(Json(
        commentaries
            .iter()
            .map(JsonGameCommentary::from_commentary)
            .collect(),
    ))
}

#[derive(serde::Serialize)]
pub struct JsonGameCommentary {
    id: i64,
    game: i64,
    round_number: u32,
    commentary_text: String,
    commentary_type: &'static str,
    tension_level: u8,
    context_data: serde_json::Value,
    created_at: i64,
}

impl JsonGameCommentary {
    fn from_commentary(commentary: &GameCommentary) -> Self {
        Self {
            id: commentary.id,
            game: commentary.game_id,
            round_number: commentary.round_number,
            commentary_text: commentary.commentary_text.clone(),
            commentary_type: commentary.kind.as_str(),
            tension_level: commentary.tension_level,
            context_data: commentary.context_data.clone(),
            created_at: commentary.created_at.timestamp(),
        }
    }
}
