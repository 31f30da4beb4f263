//! # ChargeHub Marketplace Core
//!
//! Booking and wallet settlement core for an EV-charging-station
//! marketplace: users reserve charging slots, pay from an internal wallet,
//! and review stations after completed sessions; providers manage stations;
//! admins read aggregate metrics.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, repository traits and access rules
//! - **application**: Business logic (wallet ledger, availability checking,
//!   booking state machine, review aggregation)
//! - **infrastructure**: External concerns (database, in-memory storage, crypto)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Cross-cutting helpers (keyed locks)

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::storage::InMemoryRepositoryProvider;

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};
