use std::sync::{Arc, Mutex};

use breevs_core::{
    EventRecord, PlayerSnapshot,
    prompt::{CommentaryContext, RECENT_EVENT_CAP, short_address},
    recent_eliminations, tension_level,
};
use chrono::{DateTime, Utc};

use crate::{
    RepoError, ServiceError, ServiceResult,
    game::{ArcEventRepository, ArcGameRepository, ArcPlayerRepository, GameId},
    textgen::ArcTextGenerator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryKind {
    Live,
    Prediction,
    Analysis,
    Highlight,
}

impl CommentaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentaryKind::Live => "live",
            CommentaryKind::Prediction => "prediction",
            CommentaryKind::Analysis => "analysis",
            CommentaryKind::Highlight => "highlight",
        }
    }

    pub fn parse(s: &str) -> Option<CommentaryKind> {
        match s {
            "live" => Some(CommentaryKind::Live),
            "prediction" => Some(CommentaryKind::Prediction),
            "analysis" => Some(CommentaryKind::Analysis),
            "highlight" => Some(CommentaryKind::Highlight),
            _ => None,
        }
    }
}

/// A short AI-generated remark about one round of a game. Append-only.
#[derive(Clone, Debug, PartialEq)]
pub struct GameCommentary {
    pub id: i64,
    pub game_id: GameId,
    pub round_number: u32,
    pub commentary_text: String,
    pub kind: CommentaryKind,
    pub tension_level: u8,
    pub context_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewGameCommentary {
    pub game_id: GameId,
    pub round_number: u32,
    pub commentary_text: String,
    pub kind: CommentaryKind,
    pub tension_level: u8,
    pub context_data: serde_json::Value,
}

pub type ArcCommentaryRepository = Arc<Box<dyn CommentaryRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait CommentaryRepository {
    async fn create(&self, commentary: NewGameCommentary) -> Result<GameCommentary, RepoError>;
    /// Newest first, at most `limit` entries.
    async fn list(
        &self,
        game_id: GameId,
        kind: Option<CommentaryKind>,
        limit: usize,
    ) -> Result<Vec<GameCommentary>, RepoError>;
}

pub const DEFAULT_COMMENTARY_LIMIT: usize = 10;

pub type ArcCommentaryService = Arc<Box<dyn CommentaryService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait CommentaryService {
    async fn generate_live(&self, game_id: GameId) -> ServiceResult<GameCommentary>;
    async fn list(
        &self,
        game_id: GameId,
        kind: Option<CommentaryKind>,
        limit: usize,
    ) -> ServiceResult<Vec<GameCommentary>>;
}

pub struct CommentaryServiceImpl {
    game_repository: ArcGameRepository,
    player_repository: ArcPlayerRepository,
    event_repository: ArcEventRepository,
    commentary_repository: ArcCommentaryRepository,
    text_generator: ArcTextGenerator,
}

impl CommentaryServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        player_repository: ArcPlayerRepository,
        event_repository: ArcEventRepository,
        commentary_repository: ArcCommentaryRepository,
        text_generator: ArcTextGenerator,
    ) -> Self {
        Self {
            game_repository,
            player_repository,
            event_repository,
            commentary_repository,
            text_generator,
        }
    }
}

#[async_trait::async_trait]
impl CommentaryService for CommentaryServiceImpl {
    async fn generate_live(&self, game_id: GameId) -> ServiceResult<GameCommentary> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found(format!("Game {} not found", game_id));
        };
        if game.phase.is_completed() {
            return ServiceError::bad_request("Cannot generate commentary for completed game");
        }

        let players = self.player_repository.players_of_game(game_id).await?;
        let recent = self
            .event_repository
            .recent_events(game_id, RECENT_EVENT_CAP)
            .await?;

        let roster: Vec<PlayerSnapshot> = players.iter().map(|p| p.snapshot()).collect();
        let recent_records: Vec<EventRecord> = recent.iter().map(|e| e.record()).collect();
        let active_players = roster.iter().filter(|p| !p.is_eliminated()).count();

        let tension = tension_level(
            roster.len(),
            active_players,
            game.current_round,
            recent_eliminations(&recent_records),
        );

        let context = CommentaryContext {
            game_id: game.id,
            current_round: game.current_round,
            active_players,
            total_players: roster.len(),
            prize_pool: &game.prize_pool,
            tension_level: tension,
            recent_events: &recent_records,
            roster: &roster,
        };

        let commentary_text = self
            .text_generator
            .generate(&context.prompt())
            .await
            .map_err(|e| {
                ServiceError::Unavailable(format!("Failed to generate commentary: {}", e))
            })?;

        let recent_actions: Vec<serde_json::Value> = recent_records
            .iter()
            .map(|e| {
                serde_json::json!({
                    "type": e.kind.display_name(),
                    "round": e.round,
                    "player": e.player.as_deref().map(|p| short_address(p, 8)),
                })
            })
            .collect();

        let commentary = self
            .commentary_repository
            .create(NewGameCommentary {
                game_id,
                round_number: game.current_round,
                commentary_text,
                kind: CommentaryKind::Live,
                tension_level: tension,
                context_data: serde_json::json!({
                    "active_players": active_players,
                    "recent_events": recent_actions,
                    "prize_pool": game.prize_pool.to_string(),
                }),
            })
            .await?;

        log::info!(
            "Generated live commentary for game {} round {}",
            game_id,
            game.current_round
        );
        Ok(commentary)
    }

    async fn list(
        &self,
        game_id: GameId,
        kind: Option<CommentaryKind>,
        limit: usize,
    ) -> ServiceResult<Vec<GameCommentary>> {
        Ok(self.commentary_repository.list(game_id, kind, limit).await?)
    }
}

#[derive(Clone, Default)]
pub struct MockCommentaryRepository {
    commentaries: Arc<Mutex<Vec<GameCommentary>>>,
}

impl MockCommentaryRepository {
    pub fn all(&self) -> Vec<GameCommentary> {
        self.commentaries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommentaryRepository for MockCommentaryRepository {
    async fn create(&self, commentary: NewGameCommentary) -> Result<GameCommentary, RepoError> {
        let mut commentaries = self.commentaries.lock().unwrap();
        let record = GameCommentary {
            id: commentaries.len() as i64 + 1,
            game_id: commentary.game_id,
            round_number: commentary.round_number,
            commentary_text: commentary.commentary_text,
            kind: commentary.kind,
            tension_level: commentary.tension_level,
            context_data: commentary.context_data,
            created_at: Utc::now(),
        };
        commentaries.push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        game_id: GameId,
        kind: Option<CommentaryKind>,
        limit: usize,
    ) -> Result<Vec<GameCommentary>, RepoError> {
        let commentaries = self.commentaries.lock().unwrap();
        let mut result: Vec<GameCommentary> = commentaries
            .iter()
            .filter(|c| c.game_id == game_id && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        result.reverse();
        result.truncate(limit);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use breevs_core::EventKind;
    use rust_decimal::Decimal;

    use crate::{
        game::{
            Game, GameEvent, GamePhase, MockEventRepository, MockGameRepository,
            MockPlayerRepository, Player,
        },
        textgen::MockTextGenerator,
    };

    use super::*;

    const WALLET_A: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";
    const WALLET_B: &str = "SP1K8DHA2Y6B13JFPVYMP10C9RYRW6W0M6A2FQC9M";

    struct Fixture {
        service: CommentaryServiceImpl,
        games: MockGameRepository,
        players: MockPlayerRepository,
        events: MockEventRepository,
        commentaries: MockCommentaryRepository,
        generator: MockTextGenerator,
    }

    fn fixture(generator: MockTextGenerator) -> Fixture {
        let games = MockGameRepository::default();
        let players = MockPlayerRepository::default();
        let events = MockEventRepository::default();
        let commentaries = MockCommentaryRepository::default();
        let service = CommentaryServiceImpl::new(
            Arc::new(Box::new(games.clone())),
            Arc::new(Box::new(players.clone())),
            Arc::new(Box::new(events.clone())),
            Arc::new(Box::new(commentaries.clone())),
            Arc::new(Box::new(generator.clone())),
        );
        Fixture {
            service,
            games,
            players,
            events,
            commentaries,
            generator,
        }
    }

    fn running_game(id: GameId, round: u32) -> Game {
        Game {
            id,
            created_at: Utc::now(),
            current_round: round,
            prize_pool: Decimal::new(100, 0),
            stake_amount: Decimal::new(50, 0),
            phase: GamePhase::InProgress,
        }
    }

    fn player(wallet: &str, eliminated_round: Option<u32>, risk: bool) -> Player {
        Player {
            wallet_address: wallet.to_string(),
            joined_at: Utc::now(),
            eliminated_round,
            used_risk_mode: risk,
        }
    }

    fn event(game_id: GameId, kind: EventKind, round: u32, block_height: u64) -> GameEvent {
        GameEvent {
            id: block_height as i64,
            game_id,
            kind,
            player_address: Some(WALLET_A.to_string()),
            round: Some(round),
            data: serde_json::json!({ "round": round }),
            block_height,
        }
    }

    #[tokio::test]
    async fn test_generate_live_commentary() {
        let f = fixture(MockTextGenerator::with_response("The room holds its breath!"));
        f.games.insert(running_game(1, 5));
        f.players.insert(1, player(WALLET_A, None, true));
        f.players.insert(1, player(WALLET_B, Some(4), false));
        f.events.insert(event(1, EventKind::PlayerSurvived, 4, 20));
        f.events.insert(event(1, EventKind::PlayerEliminated, 4, 21));

        let commentary = f.service.generate_live(1).await.unwrap();
        assert_eq!(commentary.commentary_text, "The room holds its breath!");
        assert_eq!(commentary.kind, CommentaryKind::Live);
        assert_eq!(commentary.round_number, 5);
        // 1 of 2 active: 2.5; round 5: 1.5; one recent elimination: 1 -> 5.
        assert_eq!(commentary.tension_level, 5);
        assert_eq!(commentary.context_data["active_players"], 1);
        assert_eq!(
            commentary.context_data["prize_pool"],
            serde_json::json!("100")
        );
        assert_eq!(f.commentaries.all().len(), 1);

        let prompts = f.generator.prompts();
        assert!(prompts[0].contains("live sports commentator"));
        assert!(prompts[0].contains("- Players Remaining: 1 of 2"));
    }

    #[tokio::test]
    async fn test_commentary_rejected_for_completed_game() {
        let f = fixture(MockTextGenerator::default());
        let mut game = running_game(2, 6);
        game.phase = GamePhase::Completed {
            winner: WALLET_A.to_string(),
        };
        f.games.insert(game);

        let result = f.service.generate_live(2).await;
        assert!(matches!(result, Err(ServiceError::BadRequest(..))));
        assert_eq!(f.generator.call_count(), 0);
        assert!(f.commentaries.all().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_writes_nothing() {
        let f = fixture(MockTextGenerator::failing());
        f.games.insert(running_game(3, 2));
        f.players.insert(3, player(WALLET_A, None, false));

        let result = f.service.generate_live(3).await;
        assert!(matches!(result, Err(ServiceError::Unavailable(..))));
        assert!(f.commentaries.all().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_kind_filter_and_limit() {
        let f = fixture(MockTextGenerator::default());
        for i in 0..3 {
            f.commentaries
                .create(NewGameCommentary {
                    game_id: 4,
                    round_number: i,
                    commentary_text: format!("remark {}", i),
                    kind: CommentaryKind::Live,
                    tension_level: 3,
                    context_data: serde_json::json!({}),
                })
                .await
                .unwrap();
        }
        f.commentaries
            .create(NewGameCommentary {
                game_id: 4,
                round_number: 3,
                commentary_text: "prediction".to_string(),
                kind: CommentaryKind::Prediction,
                tension_level: 3,
                context_data: serde_json::json!({}),
            })
            .await
            .unwrap();

        let live = f
            .service
            .list(4, Some(CommentaryKind::Live), 2)
            .await
            .unwrap();
        assert_eq!(live.len(), 2);
        // Newest first.
        assert_eq!(live[0].commentary_text, "remark 2");
        assert!(live.iter().all(|c| c.kind == CommentaryKind::Live));

        let all = f.service.list(4, None, 10).await.unwrap();
        assert_eq!(all.len(), 4);
    }
}
