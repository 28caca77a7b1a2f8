pub use sea_orm_migration::prelude::*;

mod m20260815_000001_create_user_table;
mod m20260815_000002_create_game_table;
mod m20260815_000003_create_category_table;
mod m20260815_000004_create_game_category_table;
mod m20260815_000005_create_rating_table;
mod m20260815_000006_create_review_table;
mod m20260815_000007_create_image_table;
mod m20260815_000008_seed_categories;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_user_table::Migration),
            Box::new(m20260815_000002_create_game_table::Migration),
            Box::new(m20260815_000003_create_category_table::Migration),
            Box::new(m20260815_000004_create_game_category_table::Migration),
            Box::new(m20260815_000005_create_rating_table::Migration),
            Box::new(m20260815_000006_create_review_table::Migration),
            Box::new(m20260815_000007_create_image_table::Migration),
            Box::new(m20260815_000008_seed_categories::Migration),
        ]
    }
}
