use crate::entities::{OrderType, order_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_type: OrderType,
    pub user_id: i64,
    pub blind_box_id: i64,
    pub blind_box_name: Option<String>,
    pub item_id: i64,
    pub item_name: Option<String>,
    /// 金额 (分)
    pub amount: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_type: m.order_type,
            user_id: m.user_id,
            blind_box_id: m.blind_box_id,
            blind_box_name: None,
            item_id: m.item_id,
            item_name: None,
            amount: m.amount,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OrderQuery {
    pub blind_box_id: Option<i64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
