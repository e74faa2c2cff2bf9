use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_users::Users;
use super::m20250601_000002_create_blind_boxes::{BlindBoxItems, BlindBoxes};

/// 用户库存 (同一用户同一物品只有一行, 重复抽中累加 quantity)
#[derive(DeriveIden)]
pub(crate) enum Inventories {
    Table,
    Id,
    UserId,
    ItemId,
    Quantity,
    AcquiredAt,
}

/// 订单流水 (expense: 买家支出, income: 卖家收入), 只追加不修改
#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderType,
    UserId,
    BlindBoxId,
    ItemId,
    Amount,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inventories::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Inventories::ItemId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Inventories::Quantity)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Inventories::AcquiredAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_user")
                            .from(Inventories::Table, Inventories::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_item")
                            .from(Inventories::Table, Inventories::ItemId)
                            .to(BlindBoxItems::Table, BlindBoxItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventories_user_item_unique")
                    .table(Inventories::Table)
                    .col(Inventories::UserId)
                    .col(Inventories::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 外键不加 ON DELETE CASCADE，保证历史订单仍然存在
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::OrderType).string_len(20).not_null())
                    .col(ColumnDef::new(Orders::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::BlindBoxId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_blind_box")
                            .from(Orders::Table, Orders::BlindBoxId)
                            .to(BlindBoxes::Table, BlindBoxes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_item")
                            .from(Orders::Table, Orders::ItemId)
                            .to(BlindBoxItems::Table, BlindBoxItems::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_user")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Inventories::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
