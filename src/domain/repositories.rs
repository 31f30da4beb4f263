//! Repository provider
//!
//! Unified access to all per-aggregate repositories. Consumers request only
//! the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let station = repos.stations().find_by_id("st-1").await?;
//!     let wallet = repos.wallets().find_by_account("acct-1").await?;
//! }
//! ```

use crate::domain::account::AccountRepository;
use crate::domain::booking::BookingRepository;
use crate::domain::review::ReviewRepository;
use crate::domain::station::StationRepository;
use crate::domain::wallet::WalletRepository;

pub trait RepositoryProvider: Send + Sync {
    fn accounts(&self) -> &dyn AccountRepository;
    fn stations(&self) -> &dyn StationRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn wallets(&self) -> &dyn WalletRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
}
