use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_draws::Draws;

/// Participants (registrants of one draw)
#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    DrawId,
    FullName,
    Phone,
    Email,
    LuckyNumber,
    IpAddress,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 每个抽奖内:
/// - email 唯一
/// - phone 唯一
/// - lucky_number 唯一 (并发注册时由索引兜底)
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::DrawId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Participants::FullName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Participants::Email).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Participants::LuckyNumber)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::IpAddress).string_len(45).null())
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_draw_id")
                            .from(Participants::Table, Participants::DrawId)
                            .to(Draws::Table, Draws::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_draw_email")
                    .table(Participants::Table)
                    .col(Participants::DrawId)
                    .col(Participants::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_draw_phone")
                    .table(Participants::Table)
                    .col(Participants::DrawId)
                    .col(Participants::Phone)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_draw_lucky_number")
                    .table(Participants::Table)
                    .col(Participants::DrawId)
                    .col(Participants::LuckyNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Participants::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
