use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 盲盒分类
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "snake_case")]
pub enum BoxCategory {
    /// 生活用品
    #[sea_orm(string_value = "daily_goods")]
    DailyGoods,
    /// 电子产品
    #[sea_orm(string_value = "electronics")]
    Electronics,
    /// 娱乐玩具
    #[sea_orm(string_value = "toys")]
    Toys,
    /// 文创用品
    #[sea_orm(string_value = "stationery")]
    Stationery,
}

impl std::fmt::Display for BoxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoxCategory::DailyGoods => write!(f, "daily_goods"),
            BoxCategory::Electronics => write!(f, "electronics"),
            BoxCategory::Toys => write!(f, "toys"),
            BoxCategory::Stationery => write!(f, "stationery"),
        }
    }
}

/// 盲盒商品
/// - price: 单价(分)
/// - stock: 剩余库存, 每次购买减 1
/// - creator_id: 卖家, 购买时收入记入该用户
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "blind_boxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    pub is_active: bool,
    pub category: BoxCategory,
    pub creator_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::blind_box_items::Entity")]
    Items,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::blind_box_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
