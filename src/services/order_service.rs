use crate::entities::{blind_box_entity as boxes, box_item_entity as items, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 当前用户的收支订单 (最新在前)
    pub async fn get_user_orders(
        &self,
        user_id: i64,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.limit);

        let mut base_query = orders::Entity::find().filter(orders::Column::UserId.eq(user_id));
        if let Some(blind_box_id) = query.blind_box_id {
            base_query = base_query.filter(orders::Column::BlindBoxId.eq(blind_box_id));
        }

        let total = base_query.clone().count(&self.pool).await?;

        let models = base_query
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            self.with_names(models).await?,
            &params,
            total,
        ))
    }

    pub async fn get_order(&self, user_id: i64, order_id: i64) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        self.with_names(vec![order])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Order lookup failed".to_string()))
    }

    async fn with_names(&self, models: Vec<orders::Model>) -> AppResult<Vec<OrderResponse>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let box_ids: Vec<i64> = models.iter().map(|o| o.blind_box_id).collect();
        let item_ids: Vec<i64> = models.iter().map(|o| o.item_id).collect();

        let box_names: HashMap<i64, String> = boxes::Entity::find()
            .filter(boxes::Column::Id.is_in(box_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|b| (b.id, b.name))
            .collect();
        let item_names: HashMap<i64, String> = items::Entity::find()
            .filter(items::Column::Id.is_in(item_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let blind_box_name = box_names.get(&m.blind_box_id).cloned();
                let item_name = item_names.get(&m.item_id).cloned();
                let mut resp = OrderResponse::from(m);
                resp.blind_box_name = blind_box_name;
                resp.item_name = item_name;
                resp
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderType;
    use crate::services::PurchaseService;
    use crate::test_utils::{create_test_box, create_test_user, setup_test_db};

    #[tokio::test]
    async fn orders_carry_names_and_respect_ownership() {
        let db = setup_test_db().await.unwrap();
        let buyer = create_test_user(&db, "buyer", 1_000).await.unwrap();
        let seller = create_test_user(&db, "seller", 0).await.unwrap();
        let (box_a, items_a) = create_test_box(&db, seller.id, 10, 5, &[10_000])
            .await
            .unwrap();
        let (box_b, _) = create_test_box(&db, seller.id, 20, 5, &[10_000])
            .await
            .unwrap();

        let purchases = PurchaseService::new(db.clone());
        purchases.purchase(buyer.id, box_a.id).await.unwrap();
        purchases.purchase(buyer.id, box_b.id).await.unwrap();

        let svc = OrderService::new(db);

        let mine = svc
            .get_user_orders(buyer.id, &OrderQuery::default())
            .await
            .unwrap();
        assert_eq!(mine.pagination.total, 2);
        assert!(mine.items.iter().all(|o| o.order_type == OrderType::Expense));

        let filtered = svc
            .get_user_orders(
                buyer.id,
                &OrderQuery {
                    blind_box_id: Some(box_a.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.items.len(), 1);
        let order = &filtered.items[0];
        assert_eq!(order.blind_box_name.as_deref(), Some(box_a.name.as_str()));
        assert_eq!(order.item_name.as_deref(), Some(items_a[0].name.as_str()));

        let income = svc
            .get_user_orders(seller.id, &OrderQuery::default())
            .await
            .unwrap();
        assert_eq!(income.items.len(), 2);
        assert!(income.items.iter().all(|o| o.order_type == OrderType::Income));

        let detail = svc.get_order(buyer.id, order.id).await.unwrap();
        assert_eq!(detail.amount, 10);
        let err = svc.get_order(seller.id, order.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
