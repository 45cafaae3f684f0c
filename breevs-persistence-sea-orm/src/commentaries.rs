use breevs_server_domain::{
    RepoError,
    commentary::{CommentaryKind, CommentaryRepository, GameCommentary, NewGameCommentary},
    game::GameId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{create_db_pool, entity::game_commentary};

pub struct CommentaryRepositoryImpl {
    db: DatabaseConnection,
}

impl CommentaryRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    fn model_to_commentary(model: game_commentary::Model) -> Result<GameCommentary, RepoError> {
        let kind = CommentaryKind::parse(&model.commentary_type).ok_or_else(|| {
            RepoError::Storage(format!(
                "commentary {} has unknown type '{}'",
                model.id, model.commentary_type
            ))
        })?;
        Ok(GameCommentary {
            id: model.id,
            game_id: model.game_id,
            round_number: model.round_number as u32,
            commentary_text: model.commentary_text,
            kind,
            tension_level: model.tension_level as u8,
            context_data: model.context_data,
            created_at: model.created_at,
        })
    }
}

#[async_trait::async_trait]
impl CommentaryRepository for CommentaryRepositoryImpl {
    async fn create(&self, commentary: NewGameCommentary) -> Result<GameCommentary, RepoError> {
        let new_commentary = game_commentary::ActiveModel {
            id: Default::default(), // Auto-increment
            game_id: Set(commentary.game_id),
            round_number: Set(commentary.round_number as i32),
            commentary_text: Set(commentary.commentary_text),
            commentary_type: Set(commentary.kind.as_str().to_string()),
            tension_level: Set(commentary.tension_level as i32),
            context_data: Set(commentary.context_data),
            created_at: Set(chrono::Utc::now()),
        };

        let model = new_commentary
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        Self::model_to_commentary(model)
    }

    async fn list(
        &self,
        game_id: GameId,
        kind: Option<CommentaryKind>,
        limit: usize,
    ) -> Result<Vec<GameCommentary>, RepoError> {
        let mut select = game_commentary::Entity::find()
            .filter(game_commentary::Column::GameId.eq(game_id));
        if let Some(kind) = kind {
            select = select.filter(game_commentary::Column::CommentaryType.eq(kind.as_str()));
        }
        let models = select
            .order_by_desc(game_commentary::Column::CreatedAt)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Storage(e.to_string()))?;

        models.into_iter().map(Self::model_to_commentary).collect()
    }
}
