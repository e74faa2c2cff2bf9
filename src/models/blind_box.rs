use crate::engine::weight_to_percent;
use crate::entities::{BoxCategory, Rarity, blind_box_entity, box_item_entity};
use crate::models::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBoxItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    /// 概率 (%)，0-100，最多两位小数
    pub probability: f64,
    pub rarity: Rarity,
    pub quantity: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBoxItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// 概率 (%)
    pub probability: Option<f64>,
    pub rarity: Option<Rarity>,
    pub quantity: Option<i32>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBlindBoxRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 价格 (分)
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    pub category: BoxCategory,
    pub is_active: Option<bool>,
    pub items: Vec<CreateBoxItemRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateBlindBoxRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<BoxCategory>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoxItemResponse {
    pub id: i64,
    pub blind_box_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// 概率 (%)
    pub probability: f64,
    pub rarity: Rarity,
    pub is_available: bool,
    pub quantity: i32,
}

impl From<box_item_entity::Model> for BoxItemResponse {
    fn from(m: box_item_entity::Model) -> Self {
        Self {
            id: m.id,
            blind_box_id: m.blind_box_id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            probability: weight_to_percent(m.probability_bp),
            rarity: m.rarity,
            is_available: m.is_available,
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlindBoxResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    pub is_active: bool,
    pub category: BoxCategory,
    pub creator: Option<UserSummary>,
    pub items: Vec<BoxItemResponse>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlindBoxResponse {
    pub fn new(
        m: blind_box_entity::Model,
        creator: Option<UserSummary>,
        items: Vec<box_item_entity::Model>,
    ) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            image_url: m.image_url,
            stock: m.stock,
            is_active: m.is_active,
            category: m.category,
            creator,
            items: items.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BoxSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BlindBoxSearchQuery {
    pub keyword: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub rarity: Option<Rarity>,
    pub sort: Option<BoxSort>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub order: crate::models::OrderResponse,
    pub inventory: crate::models::InventoryEntryResponse,
    pub item: BoxItemResponse,
}
