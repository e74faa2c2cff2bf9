use crate::engine::{ensure_within_budget, percent_to_weight, total_weight};
use crate::entities::{
    blind_box_entity as boxes, box_item_entity as items, inventory_entity as inventory,
    order_entity as orders, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::validate_length;
use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
    TransactionTrait,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct BlindBoxService {
    pool: DatabaseConnection,
}

fn validate_price(price: i64) -> AppResult<()> {
    if price <= 0 {
        return Err(AppError::ValidationError(
            "Price must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::ValidationError(
            "Stock must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::ValidationError(
            "Quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// 关键字按字面匹配，转义 LIKE 通配符
fn like_contains(keyword: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

impl BlindBoxService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建盲盒及其初始物品池
    ///
    /// 物品概率逐个累加校验，总和不得超过 100%。
    pub async fn create_blind_box(
        &self,
        creator_id: i64,
        request: CreateBlindBoxRequest,
    ) -> AppResult<BlindBoxResponse> {
        validate_length("Name", &request.name, 1, 100)?;
        validate_price(request.price)?;
        validate_stock(request.stock)?;
        if request.items.is_empty() {
            return Err(AppError::ValidationError(
                "A blind box needs at least one item".to_string(),
            ));
        }
        let mut allocated = 0i64;
        let mut weights = Vec::with_capacity(request.items.len());
        for item in &request.items {
            validate_length("Item name", &item.name, 1, 100)?;
            validate_quantity(item.quantity.unwrap_or(1))?;
            let weight = percent_to_weight(item.probability)?;
            ensure_within_budget(allocated, i64::from(weight))?;
            allocated += i64::from(weight);
            weights.push(weight);
        }

        let txn = self.pool.begin().await?;
        let now = Utc::now();

        let blind_box = boxes::ActiveModel {
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            price: Set(request.price),
            image_url: Set(request.image_url),
            stock: Set(request.stock),
            is_active: Set(request.is_active.unwrap_or(true)),
            category: Set(request.category),
            creator_id: Set(Some(creator_id)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (item, weight) in request.items.into_iter().zip(weights) {
            Self::insert_item(&txn, blind_box.id, item, weight).await?;
        }

        txn.commit().await?;

        log::info!(
            "Blind box created: id={} creator={} total_probability_bp={}",
            blind_box.id,
            creator_id,
            allocated
        );
        self.get_blind_box(blind_box.id).await
    }

    /// 部分更新，仅限创建者
    pub async fn update_blind_box(
        &self,
        user_id: i64,
        blind_box_id: i64,
        request: UpdateBlindBoxRequest,
    ) -> AppResult<BlindBoxResponse> {
        let blind_box = self.find_owned(user_id, blind_box_id).await?;

        let mut am = blind_box.into_active_model();
        if let Some(name) = request.name {
            validate_length("Name", &name, 1, 100)?;
            am.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            am.description = Set(description);
        }
        if let Some(price) = request.price {
            validate_price(price)?;
            am.price = Set(price);
        }
        if let Some(image_url) = request.image_url {
            am.image_url = Set(Some(image_url));
        }
        if let Some(stock) = request.stock {
            validate_stock(stock)?;
            am.stock = Set(stock);
        }
        if let Some(category) = request.category {
            am.category = Set(category);
        }
        if let Some(is_active) = request.is_active {
            am.is_active = Set(is_active);
        }
        am.updated_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;

        log::info!("Blind box updated: id={blind_box_id} by user={user_id}");
        self.get_blind_box(blind_box_id).await
    }

    /// 删除盲盒 (仅限创建者)，已有订单引用时拒绝
    pub async fn delete_blind_box(&self, user_id: i64, blind_box_id: i64) -> AppResult<()> {
        self.find_owned(user_id, blind_box_id).await?;

        let order_count = orders::Entity::find()
            .filter(orders::Column::BlindBoxId.eq(blind_box_id))
            .count(&self.pool)
            .await?;
        if order_count > 0 {
            return Err(AppError::InvalidState(
                "Blind box has orders and cannot be deleted".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        items::Entity::delete_many()
            .filter(items::Column::BlindBoxId.eq(blind_box_id))
            .exec(&txn)
            .await?;
        boxes::Entity::delete_by_id(blind_box_id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Blind box deleted: id={blind_box_id} by user={user_id}");
        Ok(())
    }

    /// 上架中的盲盒 (最新在前)
    pub async fn list_active(&self) -> AppResult<Vec<BlindBoxResponse>> {
        let list = boxes::Entity::find()
            .filter(boxes::Column::IsActive.eq(true))
            .order_by_desc(boxes::Column::CreatedAt)
            .order_by_desc(boxes::Column::Id)
            .all(&self.pool)
            .await?;
        self.hydrate(list).await
    }

    pub async fn search(
        &self,
        query: &BlindBoxSearchQuery,
    ) -> AppResult<PaginatedResponse<BlindBoxResponse>> {
        let params = PaginationParams::new(query.page, query.limit);

        let mut cond = Condition::all().add(boxes::Column::IsActive.eq(true));
        if let Some(keyword) = query.keyword.as_deref().map(str::trim)
            && !keyword.is_empty()
        {
            cond = cond.add(
                Condition::any()
                    .add(
                        Expr::col((boxes::Entity, boxes::Column::Name))
                            .like(like_contains(keyword)),
                    )
                    .add(
                        Expr::col((boxes::Entity, boxes::Column::Description))
                            .like(like_contains(keyword)),
                    ),
            );
        }
        if let (Some(min), Some(max)) = (query.min_price, query.max_price)
            && min > max
        {
            return Err(AppError::ValidationError(
                "min_price must not exceed max_price".to_string(),
            ));
        }
        if let Some(min) = query.min_price {
            cond = cond.add(boxes::Column::Price.gte(min));
        }
        if let Some(max) = query.max_price {
            cond = cond.add(boxes::Column::Price.lte(max));
        }
        if let Some(rarity) = query.rarity {
            // 盲盒内包含该稀有度的物品
            let with_rarity = items::Entity::find()
                .select_only()
                .column(items::Column::BlindBoxId)
                .filter(items::Column::Rarity.eq(rarity))
                .into_query();
            cond = cond.add(boxes::Column::Id.in_subquery(with_rarity));
        }

        let base_query = boxes::Entity::find().filter(cond);
        let total = base_query.clone().count(&self.pool).await?;

        let ordered = match query.sort.unwrap_or_default() {
            BoxSort::Newest => base_query
                .order_by_desc(boxes::Column::CreatedAt)
                .order_by_desc(boxes::Column::Id),
            BoxSort::PriceAsc => base_query
                .order_by_asc(boxes::Column::Price)
                .order_by_asc(boxes::Column::Id),
            BoxSort::PriceDesc => base_query
                .order_by_desc(boxes::Column::Price)
                .order_by_asc(boxes::Column::Id),
        };

        let list = ordered
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            self.hydrate(list).await?,
            &params,
            total,
        ))
    }

    pub async fn get_blind_box(&self, blind_box_id: i64) -> AppResult<BlindBoxResponse> {
        let blind_box = boxes::Entity::find_by_id(blind_box_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Blind box not found".to_string()))?;
        self.hydrate(vec![blind_box])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError("Blind box hydration failed".to_string()))
    }

    /// 当前用户创建的盲盒 (含下架)
    pub async fn list_by_creator(&self, user_id: i64) -> AppResult<Vec<BlindBoxResponse>> {
        let list = boxes::Entity::find()
            .filter(boxes::Column::CreatorId.eq(user_id))
            .order_by_desc(boxes::Column::CreatedAt)
            .order_by_desc(boxes::Column::Id)
            .all(&self.pool)
            .await?;
        self.hydrate(list).await
    }

    pub async fn list_items(&self, blind_box_id: i64) -> AppResult<Vec<BoxItemResponse>> {
        self.find_box(blind_box_id).await?;
        let list = items::Entity::find()
            .filter(items::Column::BlindBoxId.eq(blind_box_id))
            .order_by_asc(items::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 新增物品，校验同一盲盒内概率之和不超过 100%
    pub async fn add_item(
        &self,
        user_id: i64,
        blind_box_id: i64,
        request: CreateBoxItemRequest,
    ) -> AppResult<BoxItemResponse> {
        validate_length("Item name", &request.name, 1, 100)?;
        validate_quantity(request.quantity.unwrap_or(1))?;
        let weight = percent_to_weight(request.probability)?;

        let txn = self.pool.begin().await?;
        let blind_box = boxes::Entity::find_by_id(blind_box_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Blind box not found".to_string()))?;
        Self::ensure_owner(&blind_box, user_id)?;

        let existing = Self::items_of(&txn, blind_box_id).await?;
        if let Err(e) = ensure_within_budget(total_weight(&existing), i64::from(weight)) {
            log::warn!("Item rejected for blind box {blind_box_id}: {e}");
            return Err(e);
        }

        let item = Self::insert_item(&txn, blind_box_id, request, weight).await?;
        txn.commit().await?;

        log::info!("Item {} added to blind box {}", item.id, blind_box_id);
        Ok(item.into())
    }

    /// 修改物品，概率校验时不计自身原有概率
    pub async fn update_item(
        &self,
        user_id: i64,
        blind_box_id: i64,
        item_id: i64,
        request: UpdateBoxItemRequest,
    ) -> AppResult<BoxItemResponse> {
        let txn = self.pool.begin().await?;
        let blind_box = boxes::Entity::find_by_id(blind_box_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Blind box not found".to_string()))?;
        Self::ensure_owner(&blind_box, user_id)?;

        let pool = Self::items_of(&txn, blind_box_id).await?;
        let (mine, others): (Vec<_>, Vec<_>) = pool.into_iter().partition(|i| i.id == item_id);
        let item = mine
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        let mut am = item.into_active_model();
        if let Some(percent) = request.probability {
            let weight = percent_to_weight(percent)?;
            if let Err(e) = ensure_within_budget(total_weight(&others), i64::from(weight)) {
                log::warn!("Item {item_id} update rejected: {e}");
                return Err(e);
            }
            am.probability_bp = Set(weight);
        }
        if let Some(name) = request.name {
            validate_length("Item name", &name, 1, 100)?;
            am.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            am.description = Set(description);
        }
        if let Some(image_url) = request.image_url {
            am.image_url = Set(image_url);
        }
        if let Some(rarity) = request.rarity {
            am.rarity = Set(rarity);
        }
        if let Some(quantity) = request.quantity {
            validate_quantity(quantity)?;
            am.quantity = Set(quantity);
        }
        if let Some(is_available) = request.is_available {
            am.is_available = Set(is_available);
        }
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;
        txn.commit().await?;

        Ok(updated.into())
    }

    /// 删除物品，已被抽中 (存在库存记录) 时拒绝
    pub async fn delete_item(&self, user_id: i64, blind_box_id: i64, item_id: i64) -> AppResult<()> {
        self.find_owned(user_id, blind_box_id).await?;

        let item = items::Entity::find_by_id(item_id)
            .filter(items::Column::BlindBoxId.eq(blind_box_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        let held = inventory::Entity::find()
            .filter(inventory::Column::ItemId.eq(item.id))
            .count(&self.pool)
            .await?;
        if held > 0 {
            return Err(AppError::InvalidState(
                "Item is held by users and cannot be deleted".to_string(),
            ));
        }

        items::Entity::delete_by_id(item.id).exec(&self.pool).await?;
        log::info!("Item {item_id} removed from blind box {blind_box_id}");
        Ok(())
    }

    // -----------------------------
    // 内部辅助方法
    // -----------------------------

    async fn find_box(&self, blind_box_id: i64) -> AppResult<boxes::Model> {
        boxes::Entity::find_by_id(blind_box_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Blind box not found".to_string()))
    }

    async fn find_owned(&self, user_id: i64, blind_box_id: i64) -> AppResult<boxes::Model> {
        let blind_box = self.find_box(blind_box_id).await?;
        Self::ensure_owner(&blind_box, user_id)?;
        Ok(blind_box)
    }

    fn ensure_owner(blind_box: &boxes::Model, user_id: i64) -> AppResult<()> {
        if blind_box.creator_id != Some(user_id) {
            return Err(AppError::Forbidden(
                "Only the creator can modify this blind box".to_string(),
            ));
        }
        Ok(())
    }

    async fn items_of<C: ConnectionTrait>(
        conn: &C,
        blind_box_id: i64,
    ) -> AppResult<Vec<items::Model>> {
        Ok(items::Entity::find()
            .filter(items::Column::BlindBoxId.eq(blind_box_id))
            .order_by_asc(items::Column::Id)
            .all(conn)
            .await?)
    }

    async fn insert_item<C: ConnectionTrait>(
        conn: &C,
        blind_box_id: i64,
        request: CreateBoxItemRequest,
        probability_bp: i32,
    ) -> AppResult<items::Model> {
        let now = Utc::now();
        Ok(items::ActiveModel {
            blind_box_id: Set(blind_box_id),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            image_url: Set(request.image_url),
            probability_bp: Set(probability_bp),
            rarity: Set(request.rarity),
            is_available: Set(request.is_available.unwrap_or(true)),
            quantity: Set(request.quantity.unwrap_or(1)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(conn)
        .await?)
    }

    /// 批量补全创建者与物品信息
    async fn hydrate(&self, list: Vec<boxes::Model>) -> AppResult<Vec<BlindBoxResponse>> {
        if list.is_empty() {
            return Ok(Vec::new());
        }
        let box_ids: Vec<i64> = list.iter().map(|b| b.id).collect();
        let creator_ids: Vec<i64> = list.iter().filter_map(|b| b.creator_id).collect();

        let mut items_by_box: HashMap<i64, Vec<items::Model>> = HashMap::new();
        for item in items::Entity::find()
            .filter(items::Column::BlindBoxId.is_in(box_ids))
            .order_by_asc(items::Column::Id)
            .all(&self.pool)
            .await?
        {
            items_by_box.entry(item.blind_box_id).or_default().push(item);
        }

        let creators: HashMap<i64, UserSummary> = users::Entity::find()
            .filter(users::Column::Id.is_in(creator_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(list
            .into_iter()
            .map(|b| {
                let creator = b.creator_id.and_then(|id| creators.get(&id).cloned());
                let pool = items_by_box.remove(&b.id).unwrap_or_default();
                BlindBoxResponse::new(b, creator, pool)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BoxCategory, Rarity};
    use crate::services::PurchaseService;
    use crate::test_utils::{create_test_box, create_test_user, setup_test_db};

    fn item(name: &str, probability: f64, rarity: Rarity) -> CreateBoxItemRequest {
        CreateBoxItemRequest {
            name: name.to_string(),
            description: String::new(),
            image_url: String::new(),
            probability,
            rarity,
            quantity: None,
            is_available: None,
        }
    }

    fn create_request(name: &str, price: i64, items: Vec<CreateBoxItemRequest>) -> CreateBlindBoxRequest {
        CreateBlindBoxRequest {
            name: name.to_string(),
            description: format!("{name} description"),
            price,
            image_url: None,
            stock: 10,
            category: BoxCategory::Toys,
            is_active: None,
            items,
        }
    }

    #[tokio::test]
    async fn create_returns_box_with_items_and_creator() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let svc = BlindBoxService::new(db);

        let created = svc
            .create_blind_box(
                owner.id,
                create_request(
                    "Cats",
                    990,
                    vec![item("Tabby", 30.0, Rarity::Common), item("Sphynx", 70.0, Rarity::Rare)],
                ),
            )
            .await
            .unwrap();

        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].name, "Tabby");
        assert_eq!(created.creator.unwrap().username, "owner");
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn create_rejects_pool_over_full_probability() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let svc = BlindBoxService::new(db.clone());

        let err = svc
            .create_blind_box(
                owner.id,
                create_request(
                    "Greedy",
                    100,
                    vec![item("A", 60.0, Rarity::Common), item("B", 50.0, Rarity::Rare)],
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(boxes::Entity::find().count(&db).await.unwrap(), 0);

        let err = svc
            .create_blind_box(owner.id, create_request("Empty", 100, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn adding_item_over_budget_is_not_persisted() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let (blind_box, _) = create_test_box(&db, owner.id, 100, 5, &[6_000, 3_000])
            .await
            .unwrap();
        let svc = BlindBoxService::new(db.clone());

        let err = svc
            .add_item(owner.id, blind_box.id, item("Too much", 10.01, Rarity::Epic))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.list_items(blind_box.id).await.unwrap().len(), 2);

        let added = svc
            .add_item(owner.id, blind_box.id, item("Exact", 10.0, Rarity::Epic))
            .await
            .unwrap();
        assert_eq!(added.probability, 10.0);
        assert_eq!(svc.list_items(blind_box.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn updating_item_excludes_its_own_weight() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let (blind_box, pool) = create_test_box(&db, owner.id, 100, 5, &[4_000, 6_000])
            .await
            .unwrap();
        let svc = BlindBoxService::new(db);

        let update = |weight| UpdateBoxItemRequest {
            probability: Some(weight),
            ..Default::default()
        };

        let ok = svc
            .update_item(owner.id, blind_box.id, pool[0].id, update(40.0))
            .await
            .unwrap();
        assert_eq!(ok.probability, 40.0);

        let err = svc
            .update_item(owner.id, blind_box.id, pool[0].id, update(40.01))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let items = svc.list_items(blind_box.id).await.unwrap();
        assert_eq!(items[0].probability, 40.0);
    }

    #[tokio::test]
    async fn item_probability_is_given_in_percent() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let (blind_box, _) = create_test_box(&db, owner.id, 100, 5, &[5_000])
            .await
            .unwrap();
        let svc = BlindBoxService::new(db.clone());

        let added = svc
            .add_item(owner.id, blind_box.id, item("Half", 30.5, Rarity::Rare))
            .await
            .unwrap();
        assert_eq!(added.probability, 30.5);
        let stored = items::Entity::find_by_id(added.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.probability_bp, 3_050);

        let err = svc
            .add_item(owner.id, blind_box.id, item("Over", 100.01, Rarity::Epic))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let json = serde_json::to_value(&added).unwrap();
        assert_eq!(json["probability"], 30.5);
        assert!(json.get("probability_bp").is_none());
    }

    #[tokio::test]
    async fn only_creator_may_modify() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let intruder = create_test_user(&db, "intruder", 0).await.unwrap();
        let (blind_box, pool) = create_test_box(&db, owner.id, 100, 5, &[5_000])
            .await
            .unwrap();
        let svc = BlindBoxService::new(db);

        let err = svc
            .update_blind_box(
                intruder.id,
                blind_box.id,
                UpdateBlindBoxRequest {
                    price: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = svc
            .delete_item(intruder.id, blind_box.id, pool[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = svc.delete_blind_box(intruder.id, blind_box.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn sold_box_and_drawn_item_cannot_be_deleted() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let buyer = create_test_user(&db, "buyer", 1_000).await.unwrap();
        let (blind_box, pool) = create_test_box(&db, owner.id, 100, 5, &[10_000])
            .await
            .unwrap();
        PurchaseService::new(db.clone())
            .purchase(buyer.id, blind_box.id)
            .await
            .unwrap();
        let svc = BlindBoxService::new(db);

        let err = svc
            .delete_item(owner.id, blind_box.id, pool[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = svc.delete_blind_box(owner.id, blind_box.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unsold_box_can_be_deleted() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let (blind_box, _) = create_test_box(&db, owner.id, 100, 5, &[5_000, 5_000])
            .await
            .unwrap();
        let svc = BlindBoxService::new(db.clone());

        svc.delete_blind_box(owner.id, blind_box.id).await.unwrap();
        let err = svc.get_blind_box(blind_box.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(items::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_filters_and_sorts() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let svc = BlindBoxService::new(db);

        svc.create_blind_box(
            owner.id,
            create_request("Cheap Cats", 100, vec![item("A", 100.0, Rarity::Common)]),
        )
        .await
        .unwrap();
        svc.create_blind_box(
            owner.id,
            create_request("Fancy Cats", 900, vec![item("B", 5.0, Rarity::Legendary)]),
        )
        .await
        .unwrap();
        svc.create_blind_box(
            owner.id,
            create_request("Dogs", 500, vec![item("C", 100.0, Rarity::Rare)]),
        )
        .await
        .unwrap();

        let by_keyword = svc
            .search(&BlindBoxSearchQuery {
                keyword: Some("Cats".into()),
                sort: Some(BoxSort::PriceDesc),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_keyword.pagination.total, 2);
        assert_eq!(by_keyword.items[0].name, "Fancy Cats");

        let by_price = svc
            .search(&BlindBoxSearchQuery {
                min_price: Some(200),
                max_price: Some(600),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_price.items.len(), 1);
        assert_eq!(by_price.items[0].name, "Dogs");

        let by_rarity = svc
            .search(&BlindBoxSearchQuery {
                rarity: Some(Rarity::Legendary),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_rarity.items.len(), 1);
        assert_eq!(by_rarity.items[0].name, "Fancy Cats");

        let paged = svc
            .search(&BlindBoxSearchQuery {
                sort: Some(BoxSort::PriceAsc),
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(paged.pagination.total_pages, 2);
        assert_eq!(paged.items.len(), 1);
        assert_eq!(paged.items[0].name, "Fancy Cats");
    }

    #[tokio::test]
    async fn search_keyword_wildcards_match_literally() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let svc = BlindBoxService::new(db);

        for name in ["50% Off", "500 Pack", "Dogs"] {
            svc.create_blind_box(
                owner.id,
                create_request(name, 100, vec![item("A", 100.0, Rarity::Common)]),
            )
            .await
            .unwrap();
        }

        let search = |keyword: &str| BlindBoxSearchQuery {
            keyword: Some(keyword.to_string()),
            ..Default::default()
        };

        let percent = svc.search(&search("%")).await.unwrap();
        assert_eq!(percent.pagination.total, 1);
        assert_eq!(percent.items[0].name, "50% Off");

        let prefix = svc.search(&search("50%")).await.unwrap();
        assert_eq!(prefix.pagination.total, 1);
        assert_eq!(prefix.items[0].name, "50% Off");

        let underscore = svc.search(&search("_")).await.unwrap();
        assert_eq!(underscore.pagination.total, 0);
    }

    #[tokio::test]
    async fn inactive_boxes_are_hidden_from_listing_but_not_from_owner() {
        let db = setup_test_db().await.unwrap();
        let owner = create_test_user(&db, "owner", 0).await.unwrap();
        let svc = BlindBoxService::new(db);

        let mut hidden = create_request("Hidden", 100, vec![item("A", 100.0, Rarity::Common)]);
        hidden.is_active = Some(false);
        svc.create_blind_box(owner.id, hidden).await.unwrap();

        assert!(svc.list_active().await.unwrap().is_empty());
        assert_eq!(svc.list_by_creator(owner.id).await.unwrap().len(), 1);
    }
}
