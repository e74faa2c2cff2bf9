use crate::entities::{Rarity, box_item_entity as items, inventory_entity as inventory};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

#[derive(Clone)]
pub struct InventoryService {
    pool: DatabaseConnection,
}

/// legendary > epic > rare > common
fn rarity_rank() -> SimpleExpr {
    let column = items::Column::Rarity;
    Expr::case(column.eq(Rarity::Legendary), Rarity::Legendary.rank())
        .case(column.eq(Rarity::Epic), Rarity::Epic.rank())
        .case(column.eq(Rarity::Rare), Rarity::Rare.rank())
        .finally(Rarity::Common.rank())
        .into()
}

impl InventoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取用户库存（分页）
    pub async fn list_inventory(
        &self,
        user_id: i64,
        query: &InventoryQuery,
    ) -> AppResult<PaginatedResponse<InventoryItemResponse>> {
        let rarity = query.rarity_filter().map_err(AppError::ValidationError)?;
        let params = PaginationParams::new(query.page, query.limit);

        let mut base_query = inventory::Entity::find()
            .join(JoinType::InnerJoin, inventory::Relation::Item.def())
            .filter(inventory::Column::UserId.eq(user_id));
        if let Some(rarity) = rarity {
            base_query = base_query.filter(items::Column::Rarity.eq(rarity));
        }

        let total = base_query.clone().count(&self.pool).await?;

        let ordered = match query.sort.unwrap_or_default() {
            InventorySort::Newest => base_query
                .order_by_desc(inventory::Column::AcquiredAt)
                .order_by_desc(inventory::Column::Id),
            InventorySort::Oldest => base_query
                .order_by_asc(inventory::Column::AcquiredAt)
                .order_by_asc(inventory::Column::Id),
            InventorySort::Rarity => base_query
                .order_by(rarity_rank(), Order::Desc)
                .order_by_desc(inventory::Column::AcquiredAt)
                .order_by_desc(inventory::Column::Id),
        };

        let rows = ordered
            .select_also(items::Entity)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        log::debug!(
            "Inventory for user {}: page {} / limit {}, {} of {}",
            user_id,
            params.get_page(),
            params.get_limit(),
            rows.len(),
            total
        );

        let entries = rows
            .into_iter()
            .filter_map(|(entry, item)| item.map(|item| (entry, item).into()))
            .collect();

        Ok(PaginatedResponse::new(entries, &params, total))
    }
}
