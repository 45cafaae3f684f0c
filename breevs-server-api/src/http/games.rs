use axum::{
    Json,
    extract::{Path, Query, State},
};
use breevs_core::EventKind;
use breevs_server_domain::game::{Game, GameEvent, GameQuery, Player, StatusFilter};

use crate::{ServiceError, http::AppState};

#[derive(serde::Deserialize)]
pub struct JsonGameFilter {
    status: Option<String>,
    wallet: Option<String>,
}

pub async fn get_all(
    State(app_state): State<AppState>,
    Query(filter): Query<JsonGameFilter>,
) -> Result<Json<Vec<JsonGame>>, ServiceError> {
    let status = filter
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            StatusFilter::parse(s)
                .ok_or_else(|| ServiceError::BadRequest(format!("Invalid status filter: {}", s)))
        })
        .transpose()?;

    let games = app_state
        .game_repository
        .get_games(GameQuery {
            status,
            wallet: filter.wallet.filter(|w| !w.trim().is_empty()),
        })
        .await?;

    Ok(Json(games.iter().map(JsonGame::from_game).collect()))
}

pub async fn get_by_id(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<JsonGameDetail>, ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    let Some(game) = app_state.game_repository.get_game(game_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "Game with ID {} not found",
            game_id
        )));
    };
    let players = app_state.player_repository.players_of_game(game_id).await?;

    Ok(Json(JsonGameDetail {
        game: JsonGame::from_game(&game),
        players: players.iter().map(JsonPlayer::from_player).collect(),
    }))
}

#[derive(serde::Deserialize)]
pub struct JsonEventFilter {
    #[serde(rename = "type")]
    event_type: Option<String>,
}

pub async fn get_events(
    Path(game_id): Path<String>,
    State(app_state): State<AppState>,
    Query(filter): Query<JsonEventFilter>,
) -> Result<Json<Vec<JsonGameEvent>>, ServiceError> {
    let game_id = parse_game_id(&game_id)?;
    if app_state.game_repository.get_game(game_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "Game with ID {} not found",
            game_id
        )));
    }

    let kind = filter
        .event_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            EventKind::parse(s)
                .ok_or_else(|| ServiceError::BadRequest(format!("Invalid event type: {}", s)))
        })
        .transpose()?;

    let events = app_state
        .event_repository
        .events_of_game(game_id, kind)
        .await?;

    Ok(Json(events.iter().map(JsonGameEvent::from_event).collect()))
}

pub(crate) fn parse_game_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse()
        .map_err(|e| ServiceError::BadRequest(format!("Invalid game ID: {}", e)))
}

#[derive(serde::Serialize)]
pub struct JsonGame {
    id: i64,
    created_at: i64,
    current_round: u32,
    prize_pool: String,
    stake_amount: String,
    status: &'static str,
    winner_address: Option<String>,
    is_completed: bool,
}

impl JsonGame {
    fn from_game(game: &Game) -> Self {
        use breevs_server_domain::game::GamePhase;
        let status = match &game.phase {
            GamePhase::Open => "open",
            GamePhase::InProgress => "in_progress",
            GamePhase::Completed { .. } => "completed",
        };
        Self {
            id: game.id,
            created_at: game.created_at.timestamp(),
            current_round: game.current_round,
            prize_pool: game.prize_pool.to_string(),
            stake_amount: game.stake_amount.to_string(),
            status,
            winner_address: game.phase.winner().map(str::to_string),
            is_completed: game.phase.is_completed(),
        }
    }
}

#[derive(serde::Serialize)]
pub struct JsonGameDetail {
    #[serde(flatten)]
    game: JsonGame,
    players: Vec<JsonPlayer>,
}

#[derive(serde::Serialize)]
pub struct JsonPlayer {
    wallet_address: String,
    joined_at: i64,
    eliminated: bool,
    eliminated_round: Option<u32>,
    used_risk_mode: bool,
}

impl JsonPlayer {
    fn from_player(player: &Player) -> Self {
        Self {
            wallet_address: player.wallet_address.clone(),
            joined_at: player.joined_at.timestamp(),
            eliminated: player.is_eliminated(),
            eliminated_round: player.eliminated_round,
            used_risk_mode: player.used_risk_mode,
        }
    }
}

#[derive(serde::Serialize)]
pub struct JsonGameEvent {
    id: i64,
    event_type: &'static str,
    player_address: Option<String>,
    round: Option<u32>,
    event_data: serde_json::Value,
    block_height: u64,
}

impl JsonGameEvent {
    fn from_event(event: &GameEvent) -> Self {
        Self {
            id: event.id,
            event_type: event.kind.as_str(),
            player_address: event.player_address.clone(),
            round: event.round,
            event_data: event.data.clone(),
            block_height: event.block_height,
        }
    }
}
