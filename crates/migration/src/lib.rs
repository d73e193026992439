pub use sea_orm_migration::prelude::*;

mod m20240105_000000_init;
mod m20240220_000000_pending_reconciliations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240105_000000_init::Migration),
            Box::new(m20240220_000000_pending_reconciliations::Migration),
        ]
    }
}
