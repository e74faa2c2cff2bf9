use super::draw::{Roller, pick, total_weight};
use super::store::{BoxSnapshot, NewOrder, UnitOfWork};
use crate::entities::{
    OrderType, box_item_entity as items, inventory_entity as inventory, order_entity as orders,
    user_entity as users,
};
use crate::error::{AppError, AppResult};

/// 一次购买需要落库的全部变更，由 `plan_purchase` 生成后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEffects {
    pub buyer_id: i64,
    pub seller_id: i64,
    pub blind_box_id: i64,
    pub item: items::Model,
    pub amount: i64,
}

impl PurchaseEffects {
    fn order(&self, order_type: OrderType, user_id: i64) -> NewOrder {
        NewOrder {
            order_type,
            user_id,
            blind_box_id: self.blind_box_id,
            item_id: self.item.id,
            amount: self.amount,
        }
    }

    pub fn expense_order(&self) -> NewOrder {
        self.order(OrderType::Expense, self.buyer_id)
    }

    pub fn income_order(&self) -> NewOrder {
        self.order(OrderType::Income, self.seller_id)
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub effects: PurchaseEffects,
    pub expense_order: orders::Model,
    pub income_order: orders::Model,
    pub inventory: inventory::Model,
}

impl PurchaseReceipt {
    pub fn item(&self) -> &items::Model {
        &self.effects.item
    }
}

/// 校验购买前置条件并完成抽取，不产生任何副作用
///
/// 前置条件依次为: 买家存在、盲盒存在、库存 > 0、盲盒上架且有卖家和物品、
/// 概率之和 > 0、余额充足。
pub fn plan_purchase(
    buyer: Option<&users::Model>,
    snapshot: Option<&BoxSnapshot>,
    roller: &dyn Roller,
) -> AppResult<PurchaseEffects> {
    let buyer = buyer.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let snapshot = snapshot.ok_or_else(|| AppError::NotFound("Blind box not found".to_string()))?;
    let blind_box = &snapshot.blind_box;

    if blind_box.stock <= 0 {
        return Err(AppError::InsufficientStock);
    }
    if !blind_box.is_active {
        return Err(AppError::InvalidState(
            "Blind box is not on sale".to_string(),
        ));
    }
    let seller_id = blind_box
        .creator_id
        .ok_or_else(|| AppError::InvalidState("Blind box has no seller".to_string()))?;
    if snapshot.items.is_empty() {
        return Err(AppError::InvalidState("Blind box has no items".to_string()));
    }
    if total_weight(&snapshot.items) <= 0 {
        return Err(AppError::InvalidState(
            "Blind box item probabilities sum to zero".to_string(),
        ));
    }
    if buyer.balance < blind_box.price {
        return Err(AppError::InsufficientFunds);
    }

    let item = pick(&snapshot.items, roller)
        .ok_or_else(|| AppError::InvalidState("Blind box has no drawable items".to_string()))?;

    Ok(PurchaseEffects {
        buyer_id: buyer.id,
        seller_id,
        blind_box_id: blind_box.id,
        item: item.clone(),
        amount: blind_box.price,
    })
}

/// 在同一工作单元内落库全部变更，调用方负责提交
pub async fn apply_purchase_effects<U: UnitOfWork>(
    unit: &mut U,
    effects: PurchaseEffects,
) -> AppResult<PurchaseReceipt> {
    if !unit.take_one_from_stock(effects.blind_box_id).await? {
        return Err(AppError::InsufficientStock);
    }
    if !unit.debit(effects.buyer_id, effects.amount).await? {
        return Err(AppError::InsufficientFunds);
    }
    unit.credit(effects.seller_id, effects.amount).await?;

    let expense_order = unit.append_order(effects.expense_order()).await?;
    let income_order = unit.append_order(effects.income_order()).await?;
    let inventory = unit.add_item(effects.buyer_id, effects.item.id).await?;

    Ok(PurchaseReceipt {
        effects,
        expense_order,
        income_order,
        inventory,
    })
}
