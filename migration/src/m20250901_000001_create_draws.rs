use sea_orm_migration::prelude::*;

/// Draws (scheduled prize giveaways)
#[derive(DeriveIden)]
pub enum Draws {
    Table,
    Id,
    PrizeName,
    DrawAt,
    WinnerId,
    WinningNumber,
    WinnerEmailContent,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `winner_id` deliberately carries no foreign key: draws and participants
/// reference each other, and the winner always belongs to the draw's own
/// participant set, which is removed together with the draw.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Draws::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Draws::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Draws::PrizeName).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Draws::DrawAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Draws::WinnerId).big_integer().null())
                    .col(ColumnDef::new(Draws::WinningNumber).string_len(10).null())
                    .col(ColumnDef::new(Draws::WinnerEmailContent).text().null())
                    .col(
                        ColumnDef::new(Draws::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draws_draw_at")
                    .table(Draws::Table)
                    .col(Draws::DrawAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Draws::Table).if_exists().to_owned())
            .await
    }
}
