//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_accounts;
mod m20250301_000002_create_stations;
mod m20250301_000003_create_bookings;
mod m20250301_000004_create_wallets;
mod m20250301_000005_create_wallet_transactions;
mod m20250301_000006_create_reviews;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_accounts::Migration),
            Box::new(m20250301_000002_create_stations::Migration),
            Box::new(m20250301_000003_create_bookings::Migration),
            Box::new(m20250301_000004_create_wallets::Migration),
            Box::new(m20250301_000005_create_wallet_transactions::Migration),
            Box::new(m20250301_000006_create_reviews::Migration),
        ]
    }
}
