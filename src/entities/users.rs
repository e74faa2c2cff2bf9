use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户账户，balance 单位为分
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub balance: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blind_boxes::Entity")]
    BlindBoxes,
}

impl Related<super::blind_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlindBoxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
