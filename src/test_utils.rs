//! 测试辅助: 内存 SQLite + 迁移，以及常用数据构造

use crate::entities::{
    BoxCategory, Rarity, blind_box_entity as boxes, box_item_entity as items,
    user_entity as users,
};
use crate::error::AppResult;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

/// 创建带完整表结构的内存数据库
pub async fn setup_test_db() -> AppResult<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// 直接落库的用户 (不经过 bcrypt)
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    balance: i64,
) -> AppResult<users::Model> {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("not-a-real-hash".to_string()),
        balance: Set(balance),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(user)
}

/// 创建上架中的盲盒，weights 依次作为物品概率 (bp)
pub async fn create_test_box(
    db: &DatabaseConnection,
    creator_id: i64,
    price: i64,
    stock: i64,
    weights: &[i32],
) -> AppResult<(boxes::Model, Vec<items::Model>)> {
    let blind_box = boxes::ActiveModel {
        name: Set(format!("Box by {creator_id}")),
        description: Set("test box".to_string()),
        price: Set(price),
        image_url: Set(None),
        stock: Set(stock),
        is_active: Set(true),
        category: Set(BoxCategory::Toys),
        creator_id: Set(Some(creator_id)),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut pool = Vec::with_capacity(weights.len());
    for (i, weight) in weights.iter().enumerate() {
        let item = items::ActiveModel {
            blind_box_id: Set(blind_box.id),
            name: Set(format!("Item {i}")),
            description: Set(String::new()),
            image_url: Set(String::new()),
            probability_bp: Set(*weight),
            rarity: Set(Rarity::Common),
            is_available: Set(true),
            quantity: Set(1),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        pool.push(item);
    }

    Ok((blind_box, pool))
}
