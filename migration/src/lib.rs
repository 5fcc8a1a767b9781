pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20240805_000001_metric_tables;
mod m20240812_000001_metric_unique_keys;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240805_000001_metric_tables::Migration),
            Box::new(m20240812_000001_metric_unique_keys::Migration),
        ]
    }
}
