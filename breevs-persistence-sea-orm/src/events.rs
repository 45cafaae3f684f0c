use breevs_core::EventKind;
use breevs_server_domain::{
    RepoError,
    game::{EventRepository, GameEvent, GameId},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{create_db_pool, entity::game_event};

pub struct EventRepositoryImpl {
    db: DatabaseConnection,
}

impl EventRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_event(model: game_event::Model) -> Result<GameEvent, RepoError> {
        let kind = EventKind::parse(&model.event_type).ok_or_else(|| {
            RepoError::Storage(format!(
                "event {} has unknown type '{}'",
                model.id, model.event_type
            ))
        })?;
        // The sync collaborator records the round inside the raw payload.
        let round = model
            .event_data
            .get("round")
            .and_then(|v| v.as_u64())
            .map(|r| r as u32);
        Ok(GameEvent {
            id: model.id,
            game_id: model.game_id,
            kind,
            player_address: model.player_address,
            round,
            data: model.event_data,
            block_height: model.block_height as u64,
        })
    }
}

#[async_trait::async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn events_of_game(
        &self,
        game_id: GameId,
        kind: Option<EventKind>,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let mut select = game_event::Entity::find()
            .filter(game_event::Column::GameId.eq(game_id));
        if let Some(kind) = kind {
            select = select.filter(game_event::Column::EventType.eq(kind.as_str()));
        }
        let models = select
            .order_by_asc(game_event::Column::BlockHeight)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        models.into_iter().map(Self::model_to_event).collect()
    }

    async fn recent_events(
        &self,
        game_id: GameId,
        limit: usize,
    ) -> Result<Vec<GameEvent>, RepoError> {
        let models = game_event::Entity::find()
            .filter(game_event::Column::GameId.eq(game_id))
            .order_by_desc(game_event::Column::BlockHeight)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        models.into_iter().map(Self::model_to_event).collect()
    }
}
