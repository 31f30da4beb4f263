//! Domain layer: entities, repository traits and access rules

pub mod access;
pub mod account;
pub mod booking;
pub mod error;
pub mod repositories;
pub mod review;
pub mod station;
pub mod wallet;

// Re-export commonly used types
pub use account::{Account, AccountRole};
pub use booking::{
    Booking, BookingStatus, Payment, PaymentMethod, PaymentStatus, TimeSlot, VehicleInfo,
};
pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use review::{CategoryRatings, Review};
pub use station::{ChargerSpec, ChargerType, PriceUnit, Rating, Station, StationStatus};
pub use wallet::{TransactionKind, Wallet, WalletTransaction};
