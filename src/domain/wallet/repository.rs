//! Wallet repository interface

use async_trait::async_trait;

use super::model::{TransactionKind, Wallet, WalletTransaction};
use crate::domain::DomainResult;

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Save a new wallet
    async fn save(&self, wallet: Wallet) -> DomainResult<()>;

    /// Find a wallet by its owning account
    async fn find_by_account(&self, account_id: &str) -> DomainResult<Option<Wallet>>;

    /// Atomically set the new balance and append one ledger entry.
    ///
    /// Both writes land together or not at all. Fails with `Conflict` when
    /// an entry with the same (wallet, reference, kind) already exists.
    async fn apply(
        &self,
        wallet_id: &str,
        new_balance: i64,
        transaction: WalletTransaction,
    ) -> DomainResult<()>;

    /// Full transaction log for a wallet (unordered; callers sort)
    async fn transactions_for(&self, wallet_id: &str) -> DomainResult<Vec<WalletTransaction>>;

    /// Look up a ledger entry by its dedup key (wallet, reference, kind)
    async fn find_transaction(
        &self,
        wallet_id: &str,
        reference: &str,
        kind: TransactionKind,
    ) -> DomainResult<Option<WalletTransaction>>;
}
