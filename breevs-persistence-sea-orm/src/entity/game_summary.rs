use chrono::Utc;
use sea_orm::entity::prelude::*;

/// One immutable summary per game; the unique index on `game_id` is the
/// backstop against concurrent generation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    #[sea_orm(unique)]
    pub game_id: i64,
    #[sea_orm(column_type = "Text")]
    pub ai_summary: String,
    pub total_rounds: i32,
    pub total_spins: i32,
    pub elimination_order: Json,
    pub key_moments: Json,
    pub statistics: Json,
    pub excitement_rating: Option<i32>,
    pub generated_at: chrono::DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
