use super::store::{
    BoxSnapshot, CatalogStore, InventoryStore, LedgerStore, NewOrder, OrderStore, StoreBackend,
    UnitOfWork,
};
use crate::entities::{
    blind_box_entity as boxes, box_item_entity as items, inventory_entity as inventory,
    order_entity as orders, user_entity as users,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 基于 sea-orm 事务的存储实现
#[derive(Clone)]
pub struct SeaStore {
    pool: DatabaseConnection,
}

impl SeaStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

pub struct SeaUnit {
    txn: DatabaseTransaction,
}

#[async_trait]
impl StoreBackend for SeaStore {
    type Unit = SeaUnit;

    async fn begin(&self) -> AppResult<SeaUnit> {
        Ok(SeaUnit {
            txn: self.pool.begin().await?,
        })
    }
}

#[async_trait]
impl CatalogStore for SeaUnit {
    async fn find_box(&mut self, box_id: i64) -> AppResult<Option<BoxSnapshot>> {
        let Some(blind_box) = boxes::Entity::find_by_id(box_id).one(&self.txn).await? else {
            return Ok(None);
        };
        let items = items::Entity::find()
            .filter(items::Column::BlindBoxId.eq(box_id))
            .order_by_asc(items::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(Some(BoxSnapshot { blind_box, items }))
    }

    async fn take_one_from_stock(&mut self, box_id: i64) -> AppResult<bool> {
        // 乐观扣减: update where stock > 0
        let res = boxes::Entity::update_many()
            .col_expr(boxes::Column::Stock, Expr::col(boxes::Column::Stock).sub(1))
            .col_expr(boxes::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(boxes::Column::Id.eq(box_id))
            .filter(boxes::Column::Stock.gt(0))
            .exec(&self.txn)
            .await?;
        Ok(res.rows_affected == 1)
    }
}

#[async_trait]
impl LedgerStore for SeaUnit {
    async fn find_account(&mut self, user_id: i64) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find_by_id(user_id).one(&self.txn).await?)
    }

    async fn debit(&mut self, user_id: i64, amount: i64) -> AppResult<bool> {
        let res = users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::col(users::Column::Balance).sub(amount))
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::Balance.gte(amount))
            .exec(&self.txn)
            .await?;
        Ok(res.rows_affected == 1)
    }

    async fn credit(&mut self, user_id: i64, amount: i64) -> AppResult<()> {
        let res = users::Entity::update_many()
            .col_expr(users::Column::Balance, Expr::col(users::Column::Balance).add(amount))
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.txn)
            .await?;
        if res.rows_affected != 1 {
            return Err(AppError::NotFound(format!("User {user_id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for SeaUnit {
    async fn add_item(&mut self, user_id: i64, item_id: i64) -> AppResult<inventory::Model> {
        let existing = inventory::Entity::find()
            .filter(inventory::Column::UserId.eq(user_id))
            .filter(inventory::Column::ItemId.eq(item_id))
            .one(&self.txn)
            .await?;

        if let Some(entry) = existing {
            inventory::Entity::update_many()
                .col_expr(
                    inventory::Column::Quantity,
                    Expr::col(inventory::Column::Quantity).add(1),
                )
                .filter(inventory::Column::Id.eq(entry.id))
                .exec(&self.txn)
                .await?;
            let updated = inventory::Entity::find_by_id(entry.id)
                .one(&self.txn)
                .await?
                .ok_or_else(|| AppError::InternalError("Inventory entry vanished".to_string()))?;
            return Ok(updated);
        }

        let created = inventory::ActiveModel {
            user_id: Set(user_id),
            item_id: Set(item_id),
            quantity: Set(1),
            acquired_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(created)
    }
}

#[async_trait]
impl OrderStore for SeaUnit {
    async fn append_order(&mut self, order: NewOrder) -> AppResult<orders::Model> {
        let model = orders::ActiveModel {
            order_type: Set(order.order_type),
            user_id: Set(order.user_id),
            blind_box_id: Set(order.blind_box_id),
            item_id: Set(order.item_id),
            amount: Set(order.amount),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.txn)
        .await?;
        Ok(model)
    }
}

#[async_trait]
impl UnitOfWork for SeaUnit {
    async fn commit(self) -> AppResult<()> {
        self.txn.commit().await?;
        Ok(())
    }
}
