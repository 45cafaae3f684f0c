use breevs_server_domain::{
    RepoError,
    game::{GameId, Player, PlayerRepository},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::{create_db_pool, entity::game_player, entity::player};

pub struct PlayerRepositoryImpl {
    db: DatabaseConnection,
}

impl PlayerRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_player(model: player::Model) -> Player {
        Player {
            wallet_address: model.wallet_address,
            joined_at: model.joined_at,
            eliminated_round: model.eliminated_round.map(|r| r as u32),
            used_risk_mode: model.used_risk_mode,
        }
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn players_of_game(&self, game_id: GameId) -> Result<Vec<Player>, RepoError> {
        let memberships = game_player::Entity::find()
            .filter(game_player::Column::GameId.eq(game_id))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        let wallets: Vec<String> = memberships.into_iter().map(|m| m.wallet_address).collect();

        let models = player::Entity::find()
            .filter(player::Column::WalletAddress.is_in(wallets))
            .order_by_asc(player::Column::JoinedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        Ok(models.into_iter().map(Self::model_to_player).collect())
    }

    async fn get_player(&self, wallet: &str) -> Result<Option<Player>, RepoError> {
        let model = player::Entity::find_by_id(wallet.to_string())
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;
        Ok(model.map(Self::model_to_player))
    }
}
