pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_blind_boxes;
mod m20250601_000003_create_inventories_and_orders;
mod m20250602_000001_create_shows;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_blind_boxes::Migration),
            Box::new(m20250601_000003_create_inventories_and_orders::Migration),
            Box::new(m20250602_000001_create_shows::Migration),
        ]
    }
}
