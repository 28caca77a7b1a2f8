use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Categories are not writable through the public API, so the lookup table is
/// seeded here. "Board game" deliberately lands at id 1.
#[rustfmt::skip]
const CATEGORIES: &[(i32, &str)] = &[
    (1, "Board game"),
    (2, "Card game"),
    (3, "Strategy"),
    (4, "Cooperative"),
    (5, "Party game"),
    (6, "Dice game"),
    (7, "Role-playing"),
    (8, "Deck building"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (id, label) in CATEGORIES {
            let sql = if backend == sea_orm::DatabaseBackend::Postgres {
                format!(
                    "INSERT INTO category (id, label) VALUES ({id}, '{label}') \
                     ON CONFLICT (id) DO NOTHING"
                )
            } else {
                format!("INSERT OR IGNORE INTO category (id, label) VALUES ({id}, '{label}')")
            };
            db.execute(sea_orm::Statement::from_string(backend, sql))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Category::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category {
    Table,
}
