use crate::config::ShopConfig;
use crate::entities::{
    OrderType, blind_box_entity as boxes, inventory_entity as inventory, order_entity as orders,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect, TransactionTrait,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    max_top_up: i64,
}

#[derive(Debug, FromQueryResult)]
struct SumRow {
    total: Option<i64>,
}

// postgres 的 SUM(bigint) 返回 numeric
fn sum_as_bigint<C: ColumnTrait>(col: C) -> SimpleExpr {
    Expr::expr(col.sum()).cast_as(Alias::new("BIGINT"))
}

impl UserService {
    pub fn new(pool: DatabaseConnection, shop: &ShopConfig) -> Self {
        Self {
            pool,
            max_top_up: shop.max_top_up,
        }
    }

    /// 获取用户个人资料和统计信息
    pub async fn get_user_profile(
        &self,
        user_id: i64,
    ) -> AppResult<(UserResponse, UserStatistics)> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let statistics = self.get_user_statistics(user_id).await?;
        Ok((UserResponse::from(user), statistics))
    }

    async fn get_user_statistics(&self, user_id: i64) -> AppResult<UserStatistics> {
        let boxes_created = boxes::Entity::find()
            .filter(boxes::Column::CreatorId.eq(user_id))
            .count(&self.pool)
            .await?;

        let distinct_items_owned = inventory::Entity::find()
            .filter(inventory::Column::UserId.eq(user_id))
            .count(&self.pool)
            .await?;

        let total_items_owned = inventory::Entity::find()
            .filter(inventory::Column::UserId.eq(user_id))
            .select_only()
            .column_as(sum_as_bigint(inventory::Column::Quantity), "total")
            .into_model::<SumRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(0);

        let total_spent = self.sum_orders(user_id, OrderType::Expense).await?;
        let total_earned = self.sum_orders(user_id, OrderType::Income).await?;

        Ok(UserStatistics {
            boxes_created,
            distinct_items_owned,
            total_items_owned,
            total_spent,
            total_earned,
        })
    }

    async fn sum_orders(&self, user_id: i64, order_type: OrderType) -> AppResult<i64> {
        Ok(orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::OrderType.eq(order_type))
            .select_only()
            .column_as(sum_as_bigint(orders::Column::Amount), "total")
            .into_model::<SumRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.total)
            .unwrap_or(0))
    }

    /// 充值 / 扣减余额，金额单位为分
    pub async fn adjust_balance(
        &self,
        user_id: i64,
        request: BalanceRequest,
    ) -> AppResult<BalanceResponse> {
        if request.amount <= 0 || request.amount > self.max_top_up {
            return Err(AppError::ValidationError(format!(
                "Amount must be between 1 and {} cents",
                self.max_top_up
            )));
        }

        let txn = self.pool.begin().await?;

        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(users::Column::Id.eq(user_id));
        update = match request.action {
            BalanceAction::Add => update.col_expr(
                users::Column::Balance,
                Expr::col(users::Column::Balance).add(request.amount),
            ),
            BalanceAction::Deduct => update
                .col_expr(
                    users::Column::Balance,
                    Expr::col(users::Column::Balance).sub(request.amount),
                )
                .filter(users::Column::Balance.gte(request.amount)),
        };

        let res = update.exec(&txn).await?;
        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if res.rows_affected != 1 {
            return Err(AppError::InsufficientFunds);
        }

        txn.commit().await?;

        log::info!(
            "Balance {:?} for user {}: {} cents, now {}",
            request.action,
            user_id,
            request.amount,
            user.balance
        );
        Ok(BalanceResponse {
            balance: user.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PurchaseService;
    use crate::test_utils::{create_test_box, create_test_user, setup_test_db};

    fn request(amount: i64, action: BalanceAction) -> BalanceRequest {
        BalanceRequest { amount, action }
    }

    #[tokio::test]
    async fn top_up_and_deduct() {
        let db = setup_test_db().await.unwrap();
        let user = create_test_user(&db, "alice", 100).await.unwrap();
        let svc = UserService::new(db, &ShopConfig::default());

        let resp = svc
            .adjust_balance(user.id, request(50, BalanceAction::Add))
            .await
            .unwrap();
        assert_eq!(resp.balance, 150);

        let resp = svc
            .adjust_balance(user.id, request(150, BalanceAction::Deduct))
            .await
            .unwrap();
        assert_eq!(resp.balance, 0);

        let err = svc
            .adjust_balance(user.id, request(1, BalanceAction::Deduct))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds));
    }

    #[tokio::test]
    async fn amount_limits_are_enforced() {
        let db = setup_test_db().await.unwrap();
        let user = create_test_user(&db, "alice", 0).await.unwrap();
        let svc = UserService::new(db, &ShopConfig::default());

        for amount in [0, -5, 1_000_001] {
            let err = svc
                .adjust_balance(user.id, request(amount, BalanceAction::Add))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }

        let err = svc
            .adjust_balance(9999, request(10, BalanceAction::Add))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn profile_statistics_reflect_purchases() {
        let db = setup_test_db().await.unwrap();
        let buyer = create_test_user(&db, "buyer", 100).await.unwrap();
        let seller = create_test_user(&db, "seller", 0).await.unwrap();
        let (blind_box, _) = create_test_box(&db, seller.id, 30, 5, &[10_000])
            .await
            .unwrap();

        let purchases = PurchaseService::new(db.clone());
        purchases.purchase(buyer.id, blind_box.id).await.unwrap();
        purchases.purchase(buyer.id, blind_box.id).await.unwrap();

        let svc = UserService::new(db, &ShopConfig::default());
        let (user, stats) = svc.get_user_profile(buyer.id).await.unwrap();
        assert_eq!(user.balance, 40);
        assert_eq!(stats.distinct_items_owned, 1);
        assert_eq!(stats.total_items_owned, 2);
        assert_eq!(stats.total_spent, 60);

        let (_, seller_stats) = svc.get_user_profile(seller.id).await.unwrap();
        assert_eq!(seller_stats.boxes_created, 1);
        assert_eq!(seller_stats.total_earned, 60);
    }
}
