//! 购买流程依赖的存储端口
//!
//! 一次购买在一个工作单元 (`UnitOfWork`) 内完成，`commit` 之前丢弃即回滚。

use crate::entities::{
    OrderType, blind_box_entity as boxes, box_item_entity as items, inventory_entity as inventory,
    order_entity as orders, user_entity as users,
};
use crate::error::AppResult;
use async_trait::async_trait;

/// 盲盒及其物品池 (按 id 升序)
#[derive(Debug, Clone)]
pub struct BoxSnapshot {
    pub blind_box: boxes::Model,
    pub items: Vec<items::Model>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_type: OrderType,
    pub user_id: i64,
    pub blind_box_id: i64,
    pub item_id: i64,
    pub amount: i64,
}

#[async_trait]
pub trait CatalogStore: Send {
    async fn find_box(&mut self, box_id: i64) -> AppResult<Option<BoxSnapshot>>;

    /// 库存大于 0 时减 1，返回是否成功
    async fn take_one_from_stock(&mut self, box_id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait LedgerStore: Send {
    async fn find_account(&mut self, user_id: i64) -> AppResult<Option<users::Model>>;

    /// 余额充足时扣款，返回是否成功
    async fn debit(&mut self, user_id: i64, amount: i64) -> AppResult<bool>;

    async fn credit(&mut self, user_id: i64, amount: i64) -> AppResult<()>;
}

#[async_trait]
pub trait InventoryStore: Send {
    /// 已持有则数量 +1，否则新建数量为 1 的记录
    async fn add_item(&mut self, user_id: i64, item_id: i64) -> AppResult<inventory::Model>;
}

#[async_trait]
pub trait OrderStore: Send {
    async fn append_order(&mut self, order: NewOrder) -> AppResult<orders::Model>;
}

#[async_trait]
pub trait UnitOfWork: CatalogStore + LedgerStore + InventoryStore + OrderStore + Sized {
    async fn commit(self) -> AppResult<()>;
}

#[async_trait]
pub trait StoreBackend: Send + Sync {
    type Unit: UnitOfWork;

    async fn begin(&self) -> AppResult<Self::Unit>;
}
