use std::sync::Arc;

use breevs_core::{EventKind, EventRecord, PlayerSnapshot};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::RepoError;

pub type GameId = i64;
pub type WalletAddress = String;

/// Where a game is in its on-chain lifecycle. The winner only exists on
/// a completed game, so an inconsistent "completed without winner" or
/// "winner on a running game" state cannot be represented.
#[derive(Clone, Debug, PartialEq)]
pub enum GamePhase {
    Open,
    InProgress,
    Completed { winner: WalletAddress },
}

impl GamePhase {
    pub fn is_completed(&self) -> bool {
        matches!(self, GamePhase::Completed { .. })
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            GamePhase::Completed { winner } => Some(winner),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub created_at: DateTime<Utc>,
    pub current_round: u32,
    pub prize_pool: Decimal,
    pub stake_amount: Decimal,
    pub phase: GamePhase,
}

/// One row per wallet; game membership goes through the games relation.
/// Elimination state is carried by the round: `Some(r)` means the player
/// went out in round r.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub wallet_address: WalletAddress,
    pub joined_at: DateTime<Utc>,
    pub eliminated_round: Option<u32>,
    pub used_risk_mode: bool,
}

impl Player {
    pub fn is_eliminated(&self) -> bool {
        self.eliminated_round.is_some()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            wallet_address: self.wallet_address.clone(),
            eliminated_round: self.eliminated_round,
            used_risk_mode: self.used_risk_mode,
        }
    }
}

/// An event synced from the chain. Append-only; `block_height` orders
/// the stream.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEvent {
    pub id: i64,
    pub game_id: GameId,
    pub kind: EventKind,
    pub player_address: Option<WalletAddress>,
    pub round: Option<u32>,
    pub data: serde_json::Value,
    pub block_height: u64,
}

impl GameEvent {
    pub fn record(&self) -> EventRecord {
        EventRecord {
            kind: self.kind,
            player: self.player_address.clone(),
            round: self.round,
            block_height: self.block_height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Open,
    InProgress,
    Completed,
}

impl StatusFilter {
    /// Accepts both the readable names and the chain's numeric
    /// discriminants (0/1/2).
    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s.trim().to_lowercase().as_str() {
            "open" | "active" | "0" => Some(StatusFilter::Open),
            "in_progress" | "1" => Some(StatusFilter::InProgress),
            "completed" | "ended" | "2" => Some(StatusFilter::Completed),
            _ => None,
        }
    }

    pub fn matches(&self, phase: &GamePhase) -> bool {
        matches!(
            (self, phase),
            (StatusFilter::Open, GamePhase::Open)
                | (StatusFilter::InProgress, GamePhase::InProgress)
                | (StatusFilter::Completed, GamePhase::Completed { .. })
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct GameQuery {
    pub status: Option<StatusFilter>,
    pub wallet: Option<WalletAddress>,
}

pub type ArcGameRepository = Arc<Box<dyn GameRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait GameRepository {
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, RepoError>;
    /// Newest first.
    async fn get_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError>;
    async fn games_of_wallet(&self, wallet: &str) -> Result<Vec<Game>, RepoError>;
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// Join order.
    async fn players_of_game(&self, game_id: GameId) -> Result<Vec<Player>, RepoError>;
    async fn get_player(&self, wallet: &str) -> Result<Option<Player>, RepoError>;
}

pub type ArcEventRepository = Arc<Box<dyn EventRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait EventRepository {
    /// Ascending by block height, optionally restricted to one kind.
    async fn events_of_game(
        &self,
        game_id: GameId,
        kind: Option<EventKind>,
    ) -> Result<Vec<GameEvent>, RepoError>;
    /// Descending by block height, at most `limit` entries.
    async fn recent_events(&self, game_id: GameId, limit: usize)
    -> Result<Vec<GameEvent>, RepoError>;
}

#[derive(Clone, Default)]
pub struct MockGameRepository {
    games: Arc<DashMap<GameId, Game>>,
    wallet_games: Arc<DashMap<WalletAddress, Vec<GameId>>>,
}

impl MockGameRepository {
    pub fn insert(&self, game: Game) {
        self.games.insert(game.id, game);
    }

    pub fn insert_participant(&self, wallet: &str, game_id: GameId) {
        self.wallet_games
            .entry(wallet.to_string())
            .or_default()
            .push(game_id);
    }
}

#[async_trait::async_trait]
impl GameRepository for MockGameRepository {
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, RepoError> {
        Ok(self.games.get(&id).map(|g| g.clone()))
    }

    async fn get_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let mut games: Vec<Game> = self
            .games
            .iter()
            .map(|g| g.clone())
            .filter(|g| {
                query
                    .status
                    .as_ref()
                    .map_or(true, |status| status.matches(&g.phase))
            })
            .collect();
        games.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(games)
    }

    async fn games_of_wallet(&self, wallet: &str) -> Result<Vec<Game>, RepoError> {
        let ids = self
            .wallet_games
            .get(wallet)
            .map(|ids| ids.clone())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| self.games.get(id).map(|g| g.clone()))
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockPlayerRepository {
    game_players: Arc<DashMap<GameId, Vec<Player>>>,
    players: Arc<DashMap<WalletAddress, Player>>,
}

impl MockPlayerRepository {
    pub fn insert(&self, game_id: GameId, player: Player) {
        self.players
            .insert(player.wallet_address.clone(), player.clone());
        self.game_players.entry(game_id).or_default().push(player);
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockPlayerRepository {
    async fn players_of_game(&self, game_id: GameId) -> Result<Vec<Player>, RepoError> {
        Ok(self
            .game_players
            .get(&game_id)
            .map(|p| p.clone())
            .unwrap_or_default())
    }

    async fn get_player(&self, wallet: &str) -> Result<Option<Player>, RepoError> {
        Ok(self.players.get(wallet).map(|p| p.clone()))
    }
}

#[derive(Clone, Default)]
pub struct MockEventRepository {
    events: Arc<DashMap<GameId, Vec<GameEvent>>>,
}

impl MockEventRepository {
    pub fn insert(&self, event: GameEvent) {
        self.events.entry(event.game_id).or_default().push(event);
    }
}

#[async_trait::async_trait]
impl EventRepository for MockEventRepository {
    async fn events_of_game(
        &self,
        game_id: GameId,
        kind: Option<EventKind>,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let mut events: Vec<GameEvent> = self
            .events
            .get(&game_id)
            .map(|e| e.clone())
            .unwrap_or_default()
            .into_iter()
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .collect();
        events.sort_by_key(|e| e.block_height);
        Ok(events)
    }

    async fn recent_events(
        &self,
        game_id: GameId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let mut events = self.events_of_game(game_id, None).await?;
        events.reverse();
        events.truncate(limit);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(StatusFilter::parse("completed"), Some(StatusFilter::Completed));
        assert_eq!(StatusFilter::parse("2"), Some(StatusFilter::Completed));
        assert_eq!(StatusFilter::parse("0"), Some(StatusFilter::Open));
        assert_eq!(StatusFilter::parse(" In_Progress "), Some(StatusFilter::InProgress));
        assert_eq!(StatusFilter::parse("paused"), None);
    }

    #[test]
    fn test_phase_winner_coupling() {
        let phase = GamePhase::Completed {
            winner: "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7".to_string(),
        };
        assert!(phase.is_completed());
        assert_eq!(
            phase.winner(),
            Some("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7")
        );
        assert_eq!(GamePhase::InProgress.winner(), None);
        assert!(!GamePhase::Open.is_completed());
    }
}
