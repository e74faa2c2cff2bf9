use crate::engine::{self, PurchaseReceipt, Roller, SeaStore, ThreadRoller};
use crate::error::AppResult;
use crate::models::{OrderResponse, PurchaseResponse};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct PurchaseService {
    store: SeaStore,
    roller: Arc<dyn Roller>,
}

impl PurchaseService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self::with_roller(pool, Arc::new(ThreadRoller))
    }

    pub fn with_roller(pool: DatabaseConnection, roller: Arc<dyn Roller>) -> Self {
        Self {
            store: SeaStore::new(pool),
            roller,
        }
    }

    /// 购买盲盒并抽取一个物品
    ///
    /// 扣款、入账、扣库存、两条订单与库存变更在同一事务内完成。
    pub async fn purchase(&self, buyer_id: i64, blind_box_id: i64) -> AppResult<PurchaseResponse> {
        log::info!("Purchase started: user={buyer_id} blind_box={blind_box_id}");

        match engine::purchase(&self.store, self.roller.as_ref(), buyer_id, blind_box_id).await {
            Ok(receipt) => {
                log::info!(
                    "Purchase completed: user={} blind_box={} item={} amount={}",
                    buyer_id,
                    blind_box_id,
                    receipt.item().id,
                    receipt.effects.amount
                );
                Ok(Self::to_response(receipt))
            }
            Err(e) => {
                log::warn!("Purchase rejected: user={buyer_id} blind_box={blind_box_id}: {e}");
                Err(e)
            }
        }
    }

    fn to_response(receipt: PurchaseReceipt) -> PurchaseResponse {
        let item = receipt.effects.item;
        let mut order = OrderResponse::from(receipt.expense_order);
        order.item_name = Some(item.name.clone());

        PurchaseResponse {
            order,
            inventory: receipt.inventory.into(),
            item: item.into(),
        }
    }
}
