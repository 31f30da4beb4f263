//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::account::AccountRepository;
use crate::domain::booking::BookingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::review::ReviewRepository;
use crate::domain::station::StationRepository;
use crate::domain::wallet::WalletRepository;

use super::account_repository::SeaOrmAccountRepository;
use super::booking_repository::SeaOrmBookingRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::station_repository::SeaOrmStationRepository;
use super::wallet_repository::SeaOrmWalletRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let station = repos.stations().find_by_id("st-1").await?;
/// let wallet = repos.wallets().find_by_account("acct-1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    accounts: SeaOrmAccountRepository,
    stations: SeaOrmStationRepository,
    bookings: SeaOrmBookingRepository,
    wallets: SeaOrmWalletRepository,
    reviews: SeaOrmReviewRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: SeaOrmAccountRepository::new(db.clone()),
            stations: SeaOrmStationRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            wallets: SeaOrmWalletRepository::new(db.clone()),
            reviews: SeaOrmReviewRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn accounts(&self) -> &dyn AccountRepository {
        &self.accounts
    }

    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn wallets(&self) -> &dyn WalletRepository {
        &self.wallets
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }
}
