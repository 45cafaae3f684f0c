use chrono::Utc;
use sea_orm::entity::prelude::*;

/// Game status discriminant as recorded from the chain:
/// 0 = open, 1 = in progress, 2 = ended. `winner_address` is only ever
/// set on ended games.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    // Chain game id, assigned by the contract.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub created_at: chrono::DateTime<Utc>,
    pub current_round: i32,
    pub prize_pool: Decimal,
    pub stake_amount: Decimal,
    pub status: i32,
    pub winner_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
