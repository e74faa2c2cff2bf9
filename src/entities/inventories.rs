use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// 用户库存: (user, item) 唯一, 重复抽中时 quantity 累加
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub acquired_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blind_box_items::Entity",
        from = "Column::ItemId",
        to = "super::blind_box_items::Column::Id"
    )]
    Item,
}

impl Related<super::blind_box_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
