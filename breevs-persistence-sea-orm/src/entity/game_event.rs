use sea_orm::entity::prelude::*;

/// Append-only chain event log. `block_height` orders the stream;
/// `event_data` is the raw payload and carries the round number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "game_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i64,
    pub game_id: i64,
    pub event_type: String,
    pub player_address: Option<String>,
    pub event_data: Json,
    pub block_height: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
