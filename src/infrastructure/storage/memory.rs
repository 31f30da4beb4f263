//! In-memory repository implementations
//!
//! DashMap-backed provider for development and testing. Concurrency-safe
//! for single-key operations; multi-step sequences (check-then-debit,
//! check-then-book) are serialized by the services via `KeyedLocks`.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::account::{Account, AccountRepository};
use crate::domain::booking::{Booking, BookingRepository, BookingStatus};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::review::{Review, ReviewRepository};
use crate::domain::station::{Station, StationRepository};
use crate::domain::wallet::{TransactionKind, Wallet, WalletRepository, WalletTransaction};
use crate::domain::{DomainError, DomainResult};

/// All repositories backed by process-local maps.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    accounts: InMemoryAccountRepository,
    stations: InMemoryStationRepository,
    bookings: InMemoryBookingRepository,
    wallets: InMemoryWalletRepository,
    reviews: InMemoryReviewRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

// ── Accounts ────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryAccountRepository {
    accounts: DashMap<String, Account>,
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: Account) -> DomainResult<()> {
        let email_taken = self
            .accounts
            .iter()
            .any(|e| e.value().email == account.email);
        if email_taken {
            return Err(DomainError::Conflict(format!(
                "email {} already registered",
                account.email
            )));
        }
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>> {
        Ok(self.accounts.get(id).map(|a| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let email = email.to_lowercase();
        Ok(self
            .accounts
            .iter()
            .find(|e| e.value().email == email)
            .map(|e| e.value().clone()))
    }

    async fn update(&self, account: Account) -> DomainResult<()> {
        if !self.accounts.contains_key(&account.id) {
            return Err(DomainError::NotFound {
                entity: "Account",
                field: "id",
                value: account.id,
            });
        }
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Account>> {
        Ok(self.accounts.iter().map(|e| e.value().clone()).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.accounts.len() as u64)
    }
}

// ── Stations ────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryStationRepository {
    stations: DashMap<String, Station>,
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, station: Station) -> DomainResult<()> {
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Station>> {
        Ok(self.stations.get(id).map(|s| s.clone()))
    }

    async fn update(&self, station: Station) -> DomainResult<()> {
        if !self.stations.contains_key(&station.id) {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station.id,
            });
        }
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    async fn update_rating(&self, id: &str, average: f64, count: u32) -> DomainResult<()> {
        let Some(mut station) = self.stations.get_mut(id) else {
            return Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: id.to_string(),
            });
        };
        station.rating.average = average;
        station.rating.count = count;
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        Ok(self.stations.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_by_provider(&self, provider_id: &str) -> DomainResult<Vec<Station>> {
        Ok(self
            .stations
            .iter()
            .filter(|e| e.value().provider_id == provider_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.stations.len() as u64)
    }
}

// ── Bookings ────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryBookingRepository {
    bookings: DashMap<String, Booking>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> DomainResult<()> {
        self.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|b| b.clone()))
    }

    async fn update(&self, booking: Booking) -> DomainResult<()> {
        if !self.bookings.contains_key(&booking.id) {
            return Err(DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking.id,
            });
        }
        self.bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn find_blocking_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().station_id == station_id && e.value().status.blocks_slot())
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().station_id == station_id)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Booking>> {
        Ok(self.bookings.iter().map(|e| e.value().clone()).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.bookings.len() as u64)
    }

    async fn count_by_status(&self, status: BookingStatus) -> DomainResult<u64> {
        Ok(self
            .bookings
            .iter()
            .filter(|e| e.value().status == status)
            .count() as u64)
    }
}

// ── Wallets ─────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryWalletRepository {
    wallets: DashMap<String, Wallet>,
    /// wallet_id → append-only log
    transactions: DashMap<String, Vec<WalletTransaction>>,
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn save(&self, wallet: Wallet) -> DomainResult<()> {
        let exists = self
            .wallets
            .iter()
            .any(|e| e.value().account_id == wallet.account_id);
        if exists {
            return Err(DomainError::Conflict(format!(
                "wallet for account {} already exists",
                wallet.account_id
            )));
        }
        self.transactions.entry(wallet.id.clone()).or_default();
        self.wallets.insert(wallet.id.clone(), wallet);
        Ok(())
    }

    async fn find_by_account(&self, account_id: &str) -> DomainResult<Option<Wallet>> {
        Ok(self
            .wallets
            .iter()
            .find(|e| e.value().account_id == account_id)
            .map(|e| e.value().clone()))
    }

    async fn apply(
        &self,
        wallet_id: &str,
        new_balance: i64,
        transaction: WalletTransaction,
    ) -> DomainResult<()> {
        let Some(mut wallet) = self.wallets.get_mut(wallet_id) else {
            return Err(DomainError::NotFound {
                entity: "Wallet",
                field: "id",
                value: wallet_id.to_string(),
            });
        };

        let mut log = self.transactions.entry(wallet_id.to_string()).or_default();
        let duplicate = log
            .iter()
            .any(|t| t.reference == transaction.reference && t.kind == transaction.kind);
        if duplicate {
            return Err(DomainError::Conflict(format!(
                "duplicate {} transaction for reference {}",
                transaction.kind, transaction.reference
            )));
        }

        log.push(transaction);
        wallet.balance = new_balance;
        wallet.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn transactions_for(&self, wallet_id: &str) -> DomainResult<Vec<WalletTransaction>> {
        Ok(self
            .transactions
            .get(wallet_id)
            .map(|log| log.clone())
            .unwrap_or_default())
    }

    async fn find_transaction(
        &self,
        wallet_id: &str,
        reference: &str,
        kind: TransactionKind,
    ) -> DomainResult<Option<WalletTransaction>> {
        Ok(self.transactions.get(wallet_id).and_then(|log| {
            log.iter()
                .find(|t| t.reference == reference && t.kind == kind)
                .cloned()
        }))
    }
}

// ── Reviews ─────────────────────────────────────────────────────

#[derive(Default)]
struct InMemoryReviewRepository {
    reviews: DashMap<String, Review>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn save(&self, review: Review) -> DomainResult<()> {
        let duplicate = self.reviews.iter().any(|e| {
            e.value().user_id == review.user_id && e.value().booking_id == review.booking_id
        });
        if duplicate {
            return Err(DomainError::DuplicateReview);
        }
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn find_by_user_and_booking(
        &self,
        user_id: &str,
        booking_id: &str,
    ) -> DomainResult<Option<Review>> {
        Ok(self
            .reviews
            .iter()
            .find(|e| e.value().user_id == user_id && e.value().booking_id == booking_id)
            .map(|e| e.value().clone()))
    }

    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Review>> {
        Ok(self
            .reviews
            .iter()
            .filter(|e| e.value().station_id == station_id)
            .map(|e| e.value().clone())
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountRole;

    #[tokio::test]
    async fn account_email_is_unique() {
        let repos = InMemoryRepositoryProvider::new();
        let a = Account::new("A", "a@x.io", "h", "1", AccountRole::User);
        let b = Account::new("B", "a@x.io", "h", "2", AccountRole::User);
        repos.accounts().save(a).await.unwrap();
        assert!(matches!(
            repos.accounts().save(b).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn wallet_apply_rejects_duplicate_reference() {
        let repos = InMemoryRepositoryProvider::new();
        let wallet = Wallet::new("acct-1");
        let wallet_id = wallet.id.clone();
        repos.wallets().save(wallet).await.unwrap();

        let tx = WalletTransaction::new(&wallet_id, TransactionKind::Credit, 100, "top-up", "R1");
        repos.wallets().apply(&wallet_id, 100, tx).await.unwrap();

        let dup = WalletTransaction::new(&wallet_id, TransactionKind::Credit, 100, "top-up", "R1");
        assert!(matches!(
            repos.wallets().apply(&wallet_id, 200, dup).await,
            Err(DomainError::Conflict(_))
        ));

        // Same reference with the other kind is a different key
        let refund = WalletTransaction::new(&wallet_id, TransactionKind::Debit, 40, "pay", "R1");
        repos.wallets().apply(&wallet_id, 60, refund).await.unwrap();

        let log = repos.wallets().transactions_for(&wallet_id).await.unwrap();
        assert_eq!(log.len(), 2);

        // Lookup by dedup key distinguishes the kinds
        let credit = repos
            .wallets()
            .find_transaction(&wallet_id, "R1", TransactionKind::Credit)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credit.amount, 100);
        let missing = repos
            .wallets()
            .find_transaction(&wallet_id, "R2", TransactionKind::Debit)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn one_wallet_per_account() {
        let repos = InMemoryRepositoryProvider::new();
        repos.wallets().save(Wallet::new("acct-1")).await.unwrap();
        assert!(matches!(
            repos.wallets().save(Wallet::new("acct-1")).await,
            Err(DomainError::Conflict(_))
        ));
    }
}
