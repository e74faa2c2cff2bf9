use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_users::Users;
use super::m20250601_000003_create_inventories_and_orders::Inventories;

/// 玩家秀帖子
#[derive(DeriveIden)]
enum Shows {
    Table,
    Id,
    Title,
    Content,
    ImageUrl,
    UserId,
    InventoryId,
    CreatedAt,
}

/// 帖子评论
#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    Content,
    UserId,
    ShowId,
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
                    .table(Shows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shows::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shows::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Shows::Content).text().not_null())
                    .col(ColumnDef::new(Shows::ImageUrl).string_len(255).null())
                    .col(ColumnDef::new(Shows::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Shows::InventoryId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Shows::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_user")
                            .from(Shows::Table, Shows::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shows_inventory")
                            .from(Shows::Table, Shows::InventoryId)
                            .to(Inventories::Table, Inventories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(ColumnDef::new(Comments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::ShowId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_show")
                            .from(Comments::Table, Comments::ShowId)
                            .to(Shows::Table, Shows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_show")
                    .table(Comments::Table)
                    .col(Comments::ShowId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：评论 -> 帖子
        manager
            .drop_table(Table::drop().if_exists().table(Comments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Shows::Table).to_owned())
            .await?;

        Ok(())
    }
}
