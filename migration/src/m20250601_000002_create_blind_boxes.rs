use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_users::Users;

/// 盲盒 (价格单位: 分)
#[derive(DeriveIden)]
pub(crate) enum BlindBoxes {
    Table,
    Id,
    Name,
    Description,
    Price,
    ImageUrl,
    Stock,
    IsActive,
    Category,
    CreatorId,
    CreatedAt,
    UpdatedAt,
}

/// 盲盒物品池
#[derive(DeriveIden)]
pub(crate) enum BlindBoxItems {
    Table,
    Id,
    BlindBoxId,
    Name,
    Description,
    ImageUrl,
    ProbabilityBp,
    Rarity,
    IsAvailable,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 概率使用 basis points (bp)，100% = 10000bp；
/// 同一盲盒下所有物品的概率之和不超过 10000 由应用层校验。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlindBoxes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlindBoxes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlindBoxes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BlindBoxes::Description).text().not_null())
                    .col(ColumnDef::new(BlindBoxes::Price).big_integer().not_null())
                    .col(ColumnDef::new(BlindBoxes::ImageUrl).string_len(255).null())
                    .col(
                        ColumnDef::new(BlindBoxes::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BlindBoxes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(BlindBoxes::Category).string_len(20).not_null())
                    .col(ColumnDef::new(BlindBoxes::CreatorId).big_integer().null())
                    .col(
                        ColumnDef::new(BlindBoxes::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlindBoxes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blind_boxes_creator")
                            .from(BlindBoxes::Table, BlindBoxes::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_blind_boxes_creator")
                    .table(BlindBoxes::Table)
                    .col(BlindBoxes::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlindBoxItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlindBoxItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlindBoxItems::BlindBoxId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BlindBoxItems::Name).string_len(100).not_null())
                    .col(ColumnDef::new(BlindBoxItems::Description).text().not_null())
                    .col(
                        ColumnDef::new(BlindBoxItems::ImageUrl)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlindBoxItems::ProbabilityBp)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BlindBoxItems::Rarity).string_len(20).not_null())
                    .col(
                        ColumnDef::new(BlindBoxItems::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BlindBoxItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(BlindBoxItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BlindBoxItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blind_box_items_box")
                            .from(BlindBoxItems::Table, BlindBoxItems::BlindBoxId)
                            .to(BlindBoxes::Table, BlindBoxes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_blind_box_items_box")
                    .table(BlindBoxItems::Table)
                    .col(BlindBoxItems::BlindBoxId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：物品 -> 盲盒
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(BlindBoxItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(BlindBoxes::Table).to_owned())
            .await?;

        Ok(())
    }
}
