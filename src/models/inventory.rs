use crate::entities::{Rarity, box_item_entity, inventory_entity};
use crate::models::BoxItemResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryEntryResponse {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub acquired_at: Option<DateTime<Utc>>,
}

impl From<inventory_entity::Model> for InventoryEntryResponse {
    fn from(m: inventory_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            item_id: m.item_id,
            quantity: m.quantity,
            acquired_at: m.acquired_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemResponse {
    pub id: i64,
    pub quantity: i64,
    pub acquired_at: Option<DateTime<Utc>>,
    pub item: BoxItemResponse,
}

impl From<(inventory_entity::Model, box_item_entity::Model)> for InventoryItemResponse {
    fn from((entry, item): (inventory_entity::Model, box_item_entity::Model)) -> Self {
        Self {
            id: entry.id,
            quantity: entry.quantity,
            acquired_at: entry.acquired_at,
            item: item.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InventorySort {
    #[default]
    Newest,
    Oldest,
    Rarity,
}

/// rarity 为 `all` 或缺省时不过滤
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct InventoryQuery {
    pub rarity: Option<String>,
    pub sort: Option<InventorySort>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl InventoryQuery {
    pub fn rarity_filter(&self) -> Result<Option<Rarity>, String> {
        match self.rarity.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some("common") => Ok(Some(Rarity::Common)),
            Some("rare") => Ok(Some(Rarity::Rare)),
            Some("epic") => Ok(Some(Rarity::Epic)),
            Some("legendary") => Ok(Some(Rarity::Legendary)),
            Some(other) => Err(format!("Unknown rarity: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_filter_treats_all_as_none() {
        let mut q = InventoryQuery::default();
        assert_eq!(q.rarity_filter().unwrap(), None);
        q.rarity = Some("all".into());
        assert_eq!(q.rarity_filter().unwrap(), None);
        q.rarity = Some("epic".into());
        assert_eq!(q.rarity_filter().unwrap(), Some(Rarity::Epic));
        q.rarity = Some("mythic".into());
        assert!(q.rarity_filter().is_err());
    }
}
