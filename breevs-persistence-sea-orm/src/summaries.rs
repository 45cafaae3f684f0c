use breevs_core::{EliminationRecord, GameStatistics, KeyMoment};
use breevs_server_domain::{
    RepoError,
    game::GameId,
    summary::{GameSummary, NewGameSummary, SummaryRepository},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::{create_db_pool, entity::game_summary, games::game_ids_of_wallet};

pub struct SummaryRepositoryImpl {
    db: DatabaseConnection,
}

impl SummaryRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_summary(model: game_summary::Model) -> Result<GameSummary, RepoError> {
        let elimination_order: Vec<EliminationRecord> =
            serde_json::from_value(model.elimination_order)
                .map_err(|e| RepoError::Storage(e.to_string()))?;
        let key_moments: Vec<KeyMoment> = serde_json::from_value(model.key_moments)
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        let statistics: GameStatistics = serde_json::from_value(model.statistics)
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        Ok(GameSummary {
            id: model.id,
            game_id: model.game_id,
            ai_summary: model.ai_summary,
            total_rounds: model.total_rounds as u32,
            total_spins: model.total_spins as u32,
            elimination_order,
            key_moments,
            statistics,
            excitement_rating: model.excitement_rating.map(|r| r as u8),
            generated_at: model.generated_at,
        })
    }

    fn insert_error(game_id: GameId, err: DbErr) -> RepoError {
        // MySQL reports a violated unique index as a duplicate entry;
        // that is the concurrent-generation race, not a storage fault.
        let msg = err.to_string();
        if matches!(err, DbErr::RecordNotInserted) || msg.contains("Duplicate entry") {
            RepoError::Conflict(format!("summary for game {} already exists", game_id))
        } else {
            RepoError::Storage(msg)
        }
    }
}

#[async_trait::async_trait]
impl SummaryRepository for SummaryRepositoryImpl {
    async fn create(&self, summary: NewGameSummary) -> Result<GameSummary, RepoError> {
        let game_id = summary.game_id;
        let new_summary = game_summary::ActiveModel {
            id: Default::default(), // Auto-increment
            game_id: Set(summary.game_id),
            ai_summary: Set(summary.ai_summary),
            total_rounds: Set(summary.total_rounds as i32),
            total_spins: Set(summary.total_spins as i32),
            elimination_order: Set(serde_json::to_value(&summary.elimination_order)
                .map_err(|e| RepoError::Storage(e.to_string()))?),
            key_moments: Set(serde_json::to_value(&summary.key_moments)
                .map_err(|e| RepoError::Storage(e.to_string()))?),
            statistics: Set(serde_json::to_value(&summary.statistics)
                .map_err(|e| RepoError::Storage(e.to_string()))?),
            excitement_rating: Set(summary.excitement_rating.map(|r| r as i32)),
            generated_at: Set(chrono::Utc::now()),
        };

        let model = new_summary
            .insert(&self.db)
            .await
            .map_err(|e| Self::insert_error(game_id, e))?;

        Self::model_to_summary(model)
    }

    async fn get_by_game(&self, game_id: GameId) -> Result<Option<GameSummary>, RepoError> {
        let model = game_summary::Entity::find()
            .filter(game_summary::Column::GameId.eq(game_id))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        model.map(Self::model_to_summary).transpose()
    }

    async fn list(&self, wallet: Option<&str>) -> Result<Vec<GameSummary>, RepoError> {
        let mut select = game_summary::Entity::find();
        if let Some(wallet) = wallet {
            let ids = game_ids_of_wallet(&self.db, wallet).await?;
            select = select.filter(game_summary::Column::GameId.is_in(ids));
        }
        let models = select
            .order_by_desc(game_summary::Column::GeneratedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        models.into_iter().map(Self::model_to_summary).collect()
    }
}
