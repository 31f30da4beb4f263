//! Wallet aggregate

pub mod model;
pub mod repository;

pub use model::{balance_from_log, TransactionKind, Wallet, WalletTransaction};
pub use repository::WalletRepository;
