use std::sync::Arc;

use breevs_core::{
    EliminationRecord, EventRecord, GameStatistics, KeyMoment, PlayerSnapshot,
    prompt::SummaryContext,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    RepoError, ServiceError, ServiceResult,
    game::{ArcEventRepository, ArcGameRepository, ArcPlayerRepository, GameId},
    textgen::ArcTextGenerator,
};

/// The immutable AI-generated record of a finished game. One per game,
/// enforced by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
    pub id: i64,
    pub game_id: GameId,
    pub ai_summary: String,
    pub total_rounds: u32,
    pub total_spins: u32,
    pub elimination_order: Vec<EliminationRecord>,
    pub key_moments: Vec<KeyMoment>,
    pub statistics: GameStatistics,
    pub excitement_rating: Option<u8>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewGameSummary {
    pub game_id: GameId,
    pub ai_summary: String,
    pub total_rounds: u32,
    pub total_spins: u32,
    pub elimination_order: Vec<EliminationRecord>,
    pub key_moments: Vec<KeyMoment>,
    pub statistics: GameStatistics,
    pub excitement_rating: Option<u8>,
}

pub type ArcSummaryRepository = Arc<Box<dyn SummaryRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait SummaryRepository {
    /// Fails with [`RepoError::Conflict`] when the game already has a
    /// summary.
    async fn create(&self, summary: NewGameSummary) -> Result<GameSummary, RepoError>;
    async fn get_by_game(&self, game_id: GameId) -> Result<Option<GameSummary>, RepoError>;
    /// Newest first; optionally restricted to games a wallet played in.
    async fn list(&self, wallet: Option<&str>) -> Result<Vec<GameSummary>, RepoError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedSummary {
    pub summary: GameSummary,
    /// False when an existing record was returned instead of generating.
    pub created: bool,
}

pub type ArcSummaryService = Arc<Box<dyn SummaryService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait SummaryService {
    async fn generate_summary(&self, game_id: GameId) -> ServiceResult<GeneratedSummary>;
    async fn get_summary(&self, game_id: GameId) -> ServiceResult<GameSummary>;
    async fn list_summaries(&self, wallet: Option<&str>) -> ServiceResult<Vec<GameSummary>>;
}

pub struct SummaryServiceImpl {
    game_repository: ArcGameRepository,
    player_repository: ArcPlayerRepository,
    event_repository: ArcEventRepository,
    summary_repository: ArcSummaryRepository,
    text_generator: ArcTextGenerator,
    // One-per-game generation lock, so concurrent requests inside this
    // process do not both pay for an external call. The store's unique
    // constraint covers racing processes.
    generation_locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl SummaryServiceImpl {
    pub fn new(
        game_repository: ArcGameRepository,
        player_repository: ArcPlayerRepository,
        event_repository: ArcEventRepository,
        summary_repository: ArcSummaryRepository,
        text_generator: ArcTextGenerator,
    ) -> Self {
        Self {
            game_repository,
            player_repository,
            event_repository,
            summary_repository,
            text_generator,
            generation_locks: DashMap::new(),
        }
    }

    fn generation_lock(&self, game_id: GameId) -> Arc<Mutex<()>> {
        self.generation_locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait::async_trait]
impl SummaryService for SummaryServiceImpl {
    async fn generate_summary(&self, game_id: GameId) -> ServiceResult<GeneratedSummary> {
        let Some(game) = self.game_repository.get_game(game_id).await? else {
            return ServiceError::not_found(format!("Game {} not found", game_id));
        };
        let Some(winner) = game.phase.winner().map(str::to_string) else {
            return ServiceError::bad_request("Game must be completed to generate summary");
        };

        let lock = self.generation_lock(game_id);
        let _guard = lock.lock().await;

        if let Some(existing) = self.summary_repository.get_by_game(game_id).await? {
            return Ok(GeneratedSummary {
                summary: existing,
                created: false,
            });
        }

        let players = self.player_repository.players_of_game(game_id).await?;
        let events = self.event_repository.events_of_game(game_id, None).await?;

        let snapshots: Vec<PlayerSnapshot> = players.iter().map(|p| p.snapshot()).collect();
        let records: Vec<EventRecord> = events.iter().map(|e| e.record()).collect();

        let mut eliminated: Vec<&PlayerSnapshot> =
            snapshots.iter().filter(|p| p.is_eliminated()).collect();
        eliminated.sort_by_key(|p| p.eliminated_round);
        let elimination_order: Vec<EliminationRecord> = eliminated
            .iter()
            .map(|p| EliminationRecord {
                address: p.wallet_address.clone(),
                round: p.eliminated_round.unwrap_or(0),
            })
            .collect();

        let total_spins = breevs_core::total_spins(&records);

        let context = SummaryContext {
            game_id: game.id,
            stake_amount: &game.stake_amount,
            prize_pool: &game.prize_pool,
            players: &snapshots,
            winner: Some(&winner),
            current_round: game.current_round,
            total_spins,
            events: &records,
            elimination_order: &elimination_order,
        };

        let ai_summary = self
            .text_generator
            .generate(&context.prompt())
            .await
            .map_err(|e| {
                ServiceError::Unavailable(format!("Failed to generate summary: {}", e))
            })?;

        let key_moments = breevs_core::extract_key_moments(&records);
        let statistics =
            breevs_core::game_statistics(&records, &snapshots, game.current_round, &game.prize_pool);
        let excitement_rating = breevs_core::excitement_rating(
            game.current_round,
            snapshots.len(),
            &key_moments,
            total_spins,
        );

        let summary = self
            .summary_repository
            .create(NewGameSummary {
                game_id,
                ai_summary,
                total_rounds: game.current_round,
                total_spins: total_spins as u32,
                elimination_order,
                key_moments,
                statistics,
                excitement_rating: Some(excitement_rating),
            })
            .await?;

        log::info!("Generated summary for game {}", game_id);
        Ok(GeneratedSummary {
            summary,
            created: true,
        })
    }

    async fn get_summary(&self, game_id: GameId) -> ServiceResult<GameSummary> {
        match self.summary_repository.get_by_game(game_id).await? {
            Some(summary) => Ok(summary),
            None => ServiceError::not_found(format!(
                "No summary found for game {}. Generate one first.",
                game_id
            )),
        }
    }

    async fn list_summaries(&self, wallet: Option<&str>) -> ServiceResult<Vec<GameSummary>> {
        Ok(self.summary_repository.list(wallet).await?)
    }
}

#[derive(Clone, Default)]
pub struct MockSummaryRepository {
    summaries: Arc<DashMap<GameId, GameSummary>>,
}

impl MockSummaryRepository {
    pub fn insert(&self, summary: GameSummary) {
        self.summaries.insert(summary.game_id, summary);
    }
}

#[async_trait::async_trait]
impl SummaryRepository for MockSummaryRepository {
    async fn create(&self, summary: NewGameSummary) -> Result<GameSummary, RepoError> {
        if self.summaries.contains_key(&summary.game_id) {
            return Err(RepoError::Conflict(format!(
                "summary for game {} already exists",
                summary.game_id
            )));
        }
        let record = GameSummary {
            id: self.summaries.len() as i64 + 1,
            game_id: summary.game_id,
            ai_summary: summary.ai_summary,
            total_rounds: summary.total_rounds,
            total_spins: summary.total_spins,
            elimination_order: summary.elimination_order,
            key_moments: summary.key_moments,
            statistics: summary.statistics,
            excitement_rating: summary.excitement_rating,
            generated_at: Utc::now(),
        };
        self.summaries.insert(record.game_id, record.clone());
        Ok(record)
    }

    async fn get_by_game(&self, game_id: GameId) -> Result<Option<GameSummary>, RepoError> {
        Ok(self.summaries.get(&game_id).map(|s| s.clone()))
    }

    async fn list(&self, _wallet: Option<&str>) -> Result<Vec<GameSummary>, RepoError> {
        let mut summaries: Vec<GameSummary> =
            self.summaries.iter().map(|s| s.clone()).collect();
        summaries.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(summaries)
    }
}
