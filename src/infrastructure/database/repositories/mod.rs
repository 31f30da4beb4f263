//! SeaORM repository implementations

mod account_repository;
mod booking_repository;
mod repository_provider;
mod review_repository;
mod station_repository;
mod wallet_repository;

pub use account_repository::SeaOrmAccountRepository;
pub use booking_repository::SeaOrmBookingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use review_repository::SeaOrmReviewRepository;
pub use station_repository::SeaOrmStationRepository;
pub use wallet_repository::SeaOrmWalletRepository;

use crate::domain::DomainError;

/// Map a database error onto the domain taxonomy.
///
/// Unique-constraint violations become `Conflict`; everything else is a
/// storage failure.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint") || message.contains("unique constraint") {
        DomainError::Conflict(message)
    } else {
        DomainError::Storage(message)
    }
}
