use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

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
pub enum Rarity {
    #[sea_orm(string_value = "common")]
    Common,
    #[sea_orm(string_value = "rare")]
    Rare,
    #[sea_orm(string_value = "epic")]
    Epic,
    #[sea_orm(string_value = "legendary")]
    Legendary,
}

impl Rarity {
    /// 稀有度排序权重 (越大越稀有)
    pub fn rank(&self) -> i32 {
        match self {
            Rarity::Common => 0,
            Rarity::Rare => 1,
            Rarity::Epic => 2,
            Rarity::Legendary => 3,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Rare => write!(f, "rare"),
            Rarity::Epic => write!(f, "epic"),
            Rarity::Legendary => write!(f, "legendary"),
        }
    }
}

/// 盲盒物品 (抽奖池中的一个结果)
/// 概念说明:
/// - probability_bp: 权重 (basis points) 1% = 100bp, 100% = 10000bp
/// - quantity: 展示用数量，抽中时不扣减
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "blind_box_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub blind_box_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image_url: String,
    pub probability_bp: i32,
    pub rarity: Rarity,
    pub is_available: bool,
    pub quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blind_boxes::Entity",
        from = "Column::BlindBoxId",
        to = "super::blind_boxes::Column::Id",
        on_delete = "Cascade"
    )]
    BlindBox,
    #[sea_orm(has_many = "super::inventories::Entity")]
    Inventories,
}

impl Related<super::blind_boxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlindBox.def()
    }
}

impl Related<super::inventories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
