//! 内存版存储，仅用于测试购买流程

use super::store::{
    BoxSnapshot, CatalogStore, InventoryStore, LedgerStore, NewOrder, OrderStore, StoreBackend,
    UnitOfWork,
};
use crate::entities::{
    BoxCategory, Rarity, blind_box_entity as boxes, box_item_entity as items,
    inventory_entity as inventory, order_entity as orders, user_entity as users,
};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: BTreeMap<i64, users::Model>,
    pub boxes: BTreeMap<i64, boxes::Model>,
    pub items: BTreeMap<i64, items::Model>,
    pub inventory: BTreeMap<i64, inventory::Model>,
    pub orders: Vec<orders::Model>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn balance(&self, user_id: i64) -> i64 {
        self.users.get(&user_id).map(|u| u.balance).unwrap_or_default()
    }

    pub fn stock(&self, box_id: i64) -> i64 {
        self.boxes.get(&box_id).map(|b| b.stock).unwrap_or_default()
    }

    pub fn held(&self, user_id: i64, item_id: i64) -> i64 {
        self.inventory
            .values()
            .find(|e| e.user_id == user_id && e.item_id == item_id)
            .map(|e| e.quantity)
            .unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn snapshot(&self) -> MemoryState {
        self.state.lock().unwrap().clone()
    }

    pub fn add_user(&self, id: i64, balance: i64) {
        self.state.lock().unwrap().users.insert(
            id,
            users::Model {
                id,
                username: format!("user{id}"),
                email: format!("user{id}@example.com"),
                password_hash: String::new(),
                balance,
                created_at: None,
                updated_at: None,
            },
        );
    }

    pub fn add_box(&self, id: i64, price: i64, stock: i64, creator_id: Option<i64>) {
        self.state.lock().unwrap().boxes.insert(
            id,
            boxes::Model {
                id,
                name: format!("box{id}"),
                description: String::new(),
                price,
                image_url: None,
                stock,
                is_active: true,
                category: BoxCategory::Toys,
                creator_id,
                created_at: None,
                updated_at: None,
            },
        );
    }

    pub fn set_active(&self, box_id: i64, active: bool) {
        if let Some(b) = self.state.lock().unwrap().boxes.get_mut(&box_id) {
            b.is_active = active;
        }
    }

    pub fn add_item(&self, id: i64, box_id: i64, probability_bp: i32) {
        self.state.lock().unwrap().items.insert(
            id,
            items::Model {
                id,
                blind_box_id: box_id,
                name: format!("item{id}"),
                description: String::new(),
                image_url: String::new(),
                probability_bp,
                rarity: Rarity::Common,
                is_available: true,
                quantity: 1,
                created_at: None,
                updated_at: None,
            },
        );
    }
}

/// 开启时复制一份状态，提交时整体替换
pub struct MemoryUnit {
    shared: Arc<Mutex<MemoryState>>,
    staged: MemoryState,
}

#[async_trait]
impl StoreBackend for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> AppResult<MemoryUnit> {
        Ok(MemoryUnit {
            shared: self.state.clone(),
            staged: self.snapshot(),
        })
    }
}

#[async_trait]
impl CatalogStore for MemoryUnit {
    async fn find_box(&mut self, box_id: i64) -> AppResult<Option<BoxSnapshot>> {
        let Some(blind_box) = self.staged.boxes.get(&box_id).cloned() else {
            return Ok(None);
        };
        let items = self
            .staged
            .items
            .values()
            .filter(|i| i.blind_box_id == box_id)
            .cloned()
            .collect();
        Ok(Some(BoxSnapshot { blind_box, items }))
    }

    async fn take_one_from_stock(&mut self, box_id: i64) -> AppResult<bool> {
        match self.staged.boxes.get_mut(&box_id) {
            Some(b) if b.stock > 0 => {
                b.stock -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryUnit {
    async fn find_account(&mut self, user_id: i64) -> AppResult<Option<users::Model>> {
        Ok(self.staged.users.get(&user_id).cloned())
    }

    async fn debit(&mut self, user_id: i64, amount: i64) -> AppResult<bool> {
        match self.staged.users.get_mut(&user_id) {
            Some(u) if u.balance >= amount => {
                u.balance -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn credit(&mut self, user_id: i64, amount: i64) -> AppResult<()> {
        let user = self
            .staged
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
        user.balance += amount;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for MemoryUnit {
    async fn add_item(&mut self, user_id: i64, item_id: i64) -> AppResult<inventory::Model> {
        if let Some(entry) = self
            .staged
            .inventory
            .values_mut()
            .find(|e| e.user_id == user_id && e.item_id == item_id)
        {
            entry.quantity += 1;
            return Ok(entry.clone());
        }
        let id = self.staged.next_id();
        let entry = inventory::Model {
            id,
            user_id,
            item_id,
            quantity: 1,
            acquired_at: None,
        };
        self.staged.inventory.insert(id, entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl OrderStore for MemoryUnit {
    async fn append_order(&mut self, order: NewOrder) -> AppResult<orders::Model> {
        let model = orders::Model {
            id: self.staged.next_id(),
            order_type: order.order_type,
            user_id: order.user_id,
            blind_box_id: order.blind_box_id,
            item_id: order.item_id,
            amount: order.amount,
            created_at: None,
        };
        self.staged.orders.push(model.clone());
        Ok(model)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn commit(self) -> AppResult<()> {
        *self.shared.lock().unwrap() = self.staged;
        Ok(())
    }
}
