pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_core_tables;
mod m20240601_000002_create_inscription_tables;
mod m20240601_000003_create_token_tables;
mod m20240601_000004_create_bridge_tables;
mod m20240601_000005_create_marketplace_tables;
mod m20240601_000006_create_launchpad_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_core_tables::Migration),
            Box::new(m20240601_000002_create_inscription_tables::Migration),
            Box::new(m20240601_000003_create_token_tables::Migration),
            Box::new(m20240601_000004_create_bridge_tables::Migration),
            Box::new(m20240601_000005_create_marketplace_tables::Migration),
            Box::new(m20240601_000006_create_launchpad_tables::Migration),
        ]
    }
}
