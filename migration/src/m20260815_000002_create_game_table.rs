use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Game::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Game::UserId).integer().not_null())
                    .col(ColumnDef::new(Game::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Game::Description).string_len(150).not_null())
                    .col(ColumnDef::new(Game::Designer).string_len(50).not_null())
                    .col(ColumnDef::new(Game::ReleaseYear).integer().not_null())
                    .col(ColumnDef::new(Game::NumberOfPlayer).integer().not_null())
                    .col(ColumnDef::new(Game::GameDuration).integer().not_null())
                    .col(ColumnDef::new(Game::AgeRange).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_user_id")
                            .from(Game::Table, Game::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on title for the search endpoint
        manager
            .create_index(
                Index::create()
                    .name("idx_game_title")
                    .table(Game::Table)
                    .col(Game::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Designer,
    ReleaseYear,
    NumberOfPlayer,
    GameDuration,
    AgeRange,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
