use breevs_server_domain::{
    RepoError,
    game::{Game, GameId, GamePhase, GameQuery, GameRepository, StatusFilter},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{create_db_pool, entity::game, entity::game_player};

pub struct GameRepositoryImpl {
    db: DatabaseConnection,
}

const STATUS_OPEN: i32 = 0;
const STATUS_IN_PROGRESS: i32 = 1;
const STATUS_ENDED: i32 = 2;

impl GameRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn status_discriminant(status: StatusFilter) -> i32 {
        match status {
            StatusFilter::Open => STATUS_OPEN,
            StatusFilter::InProgress => STATUS_IN_PROGRESS,
            StatusFilter::Completed => STATUS_ENDED,
        }
    }

    fn model_to_game(model: game::Model) -> Result<Game, RepoError> {
        let phase = match (model.status, model.winner_address) {
            (STATUS_OPEN, _) => GamePhase::Open,
            (STATUS_IN_PROGRESS, _) => GamePhase::InProgress,
            (STATUS_ENDED, Some(winner)) => GamePhase::Completed { winner },
            (STATUS_ENDED, None) => {
                return Err(RepoError::Storage(format!(
                    "game {} is ended but has no winner",
                    model.id
                )));
            }
            (status, _) => {
                return Err(RepoError::Storage(format!(
                    "game {} has unknown status {}",
                    model.id, status
                )));
            }
        };
        Ok(Game {
            id: model.id,
            created_at: model.created_at,
            current_round: model.current_round as u32,
            prize_pool: model.prize_pool,
            stake_amount: model.stake_amount,
            phase,
        })
    }
}

/// Ids of every game a wallet has joined, via the join table.
pub(crate) async fn game_ids_of_wallet(
    db: &DatabaseConnection,
    wallet: &str,
) -> Result<Vec<GameId>, RepoError> {
    let memberships = game_player::Entity::find()
        .filter(game_player::Column::WalletAddress.eq(wallet))
        .all(db)
        .await
        .map_err(|e| RepoError::Storage(e.to_string()))?;
    Ok(memberships.into_iter().map(|m| m.game_id).collect())
}

#[async_trait::async_trait]
impl GameRepository for GameRepositoryImpl {
    async fn get_game(&self, id: GameId) -> Result<Option<Game>, RepoError> {
        let model = game::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        model.map(Self::model_to_game).transpose()
    }

    async fn get_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let mut select = game::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(game::Column::Status.eq(Self::status_discriminant(status)));
        }
        if let Some(wallet) = &query.wallet {
            let ids = game_ids_of_wallet(&self.db, wallet).await?;
            select = select.filter(game::Column::Id.is_in(ids));
        }

        let models = select
            .order_by_desc(game::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        models.into_iter().map(Self::model_to_game).collect()
    }

    async fn games_of_wallet(&self, wallet: &str) -> Result<Vec<Game>, RepoError> {
        self.get_games(GameQuery {
            status: None,
            wallet: Some(wallet.to_string()),
        })
        .await
    }
}
