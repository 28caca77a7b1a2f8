use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::GameId).integer().not_null())
                    .col(ColumnDef::new(Rating::UserId).integer().not_null())
                    .col(ColumnDef::new(Rating::Rating).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_game_id")
                            .from(Rating::Table, Rating::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user_id")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One rating per user per game
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_game_user")
                    .table(Rating::Table)
                    .col(Rating::GameId)
                    .col(Rating::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rating {
    Table,
    Id,
    GameId,
    UserId,
    Rating,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
