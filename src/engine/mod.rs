//! 盲盒购买 / 抽取引擎
//!
//! 流程: 在一个工作单元内读取买家与盲盒快照 -> `plan_purchase` 校验并抽取
//! -> `apply_purchase_effects` 落库 -> 提交。任一步失败时工作单元被丢弃，
//! 不产生任何变更。

pub mod draw;
pub mod effects;
#[cfg(test)]
pub(crate) mod memory;
pub mod sea_store;
pub mod store;

pub use draw::{
    FULL_WEIGHT, Roller, SeededRoller, ThreadRoller, Weighted, ensure_within_budget,
    percent_to_weight, pick, total_weight, weight_to_percent,
};
pub use effects::{PurchaseEffects, PurchaseReceipt, apply_purchase_effects, plan_purchase};
pub use sea_store::SeaStore;
pub use store::{
    BoxSnapshot, CatalogStore, InventoryStore, LedgerStore, NewOrder, OrderStore, StoreBackend,
    UnitOfWork,
};

use crate::error::AppResult;

pub async fn purchase<B: StoreBackend>(
    backend: &B,
    roller: &dyn Roller,
    buyer_id: i64,
    blind_box_id: i64,
) -> AppResult<PurchaseReceipt> {
    let mut unit = backend.begin().await?;

    let buyer = unit.find_account(buyer_id).await?;
    let snapshot = unit.find_box(blind_box_id).await?;
    let effects = plan_purchase(buyer.as_ref(), snapshot.as_ref(), roller)?;

    let receipt = apply_purchase_effects(&mut unit, effects).await?;
    unit.commit().await?;
    Ok(receipt)
}
