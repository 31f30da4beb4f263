//! Wallet ledger service
//!
//! Owns every balance mutation. A per-wallet keyed lock serializes
//! check-then-mutate sequences, so two concurrent debits whose sum exceeds
//! the balance can never both succeed. Every mutation appends exactly one
//! ledger entry; the balance is always recomputable from the log.

use std::sync::Arc;

use tracing::info;

use crate::domain::wallet::{TransactionKind, Wallet, WalletTransaction};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::KeyedLocks;

use super::paginate;

/// Result of a simulated top-up
#[derive(Debug, Clone)]
pub struct TopupReceipt {
    /// Generated gateway-style transaction reference
    pub transaction_id: String,
    pub amount: i64,
    pub new_balance: i64,
}

/// Service for wallet operations
pub struct WalletService {
    repos: Arc<dyn RepositoryProvider>,
    locks: KeyedLocks,
}

impl WalletService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            locks: KeyedLocks::new(),
        }
    }

    /// Fetch the account's wallet, creating an empty one if absent.
    ///
    /// Registration normally creates the wallet, but the call may have
    /// raced or failed; creation here is idempotent.
    pub async fn get_or_create(&self, account_id: &str) -> DomainResult<Wallet> {
        if let Some(wallet) = self.repos.wallets().find_by_account(account_id).await? {
            return Ok(wallet);
        }

        let wallet = Wallet::new(account_id);
        match self.repos.wallets().save(wallet.clone()).await {
            Ok(()) => {
                info!(account_id, wallet_id = %wallet.id, "Wallet created");
                Ok(wallet)
            }
            // Lost a creation race; the other writer's wallet wins.
            Err(DomainError::Conflict(_)) => self
                .repos
                .wallets()
                .find_by_account(account_id)
                .await?
                .ok_or_else(|| {
                    DomainError::Storage("wallet vanished after creation conflict".to_string())
                }),
            Err(e) => Err(e),
        }
    }

    /// Append a credit and raise the balance. Never fails for a validated
    /// positive amount, except on a duplicate (reference, kind) pair.
    pub async fn credit(
        &self,
        account_id: &str,
        amount: i64,
        description: &str,
        reference: &str,
    ) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::Validation("amount must be positive".to_string()));
        }

        let _guard = self.locks.acquire(account_id).await;

        let wallet = self.get_or_create(account_id).await?;
        let new_balance = wallet.balance + amount;
        let tx = WalletTransaction::new(
            &wallet.id,
            TransactionKind::Credit,
            amount,
            description,
            reference,
        );
        self.repos.wallets().apply(&wallet.id, new_balance, tx).await?;

        metrics::counter!("wallet_credits_total").increment(1);
        info!(account_id, amount, new_balance, reference, "Wallet credited");
        Ok(new_balance)
    }

    /// Append a debit and lower the balance; fails with `InsufficientFunds`
    /// when the balance does not cover the amount.
    pub async fn debit(
        &self,
        account_id: &str,
        amount: i64,
        description: &str,
        reference: &str,
    ) -> DomainResult<i64> {
        if amount <= 0 {
            return Err(DomainError::Validation("amount must be positive".to_string()));
        }

        let _guard = self.locks.acquire(account_id).await;

        let wallet = self.get_or_create(account_id).await?;
        if wallet.balance < amount {
            return Err(DomainError::InsufficientFunds {
                required: amount,
                available: wallet.balance,
            });
        }

        let new_balance = wallet.balance - amount;
        let tx = WalletTransaction::new(
            &wallet.id,
            TransactionKind::Debit,
            amount,
            description,
            reference,
        );
        self.repos.wallets().apply(&wallet.id, new_balance, tx).await?;

        metrics::counter!("wallet_debits_total").increment(1);
        info!(account_id, amount, new_balance, reference, "Wallet debited");
        Ok(new_balance)
    }

    /// Simulated payment-gateway top-up.
    pub async fn topup(
        &self,
        account_id: &str,
        amount: i64,
        payment_method: &str,
    ) -> DomainResult<TopupReceipt> {
        let transaction_id = format!("TXN-{}", uuid::Uuid::new_v4());
        let description = format!("Wallet top-up via {}", payment_method);
        let new_balance = self
            .credit(account_id, amount, &description, &transaction_id)
            .await?;

        Ok(TopupReceipt {
            transaction_id,
            amount,
            new_balance,
        })
    }

    /// Generic debit for non-booking payments; generates a reference when
    /// the caller does not supply one.
    pub async fn pay(
        &self,
        account_id: &str,
        amount: i64,
        description: Option<&str>,
        reference: Option<&str>,
    ) -> DomainResult<i64> {
        let generated;
        let reference = match reference {
            Some(r) => r,
            None => {
                generated = format!("PAY-{}", uuid::Uuid::new_v4());
                &generated
            }
        };
        self.debit(account_id, amount, description.unwrap_or("Payment"), reference)
            .await
    }

    /// Newest-first page of the ledger, with the current balance.
    pub async fn transactions(
        &self,
        account_id: &str,
        kind: Option<TransactionKind>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<WalletTransaction>, u64, i64)> {
        let wallet = self.get_or_create(account_id).await?;
        let mut log = self.repos.wallets().transactions_for(&wallet.id).await?;

        if let Some(kind) = kind {
            log.retain(|t| t.kind == kind);
        }
        log.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (items, total) = paginate(log, page, limit);
        Ok((items, total, wallet.balance))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wallet::balance_from_log;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> WalletService {
        WalletService::new(Arc::new(InMemoryRepositoryProvider::new()))
    }

    async fn ledger_invariant_holds(svc: &WalletService, account_id: &str) {
        let wallet = svc.get_or_create(account_id).await.unwrap();
        let log = svc.repos.wallets().transactions_for(&wallet.id).await.unwrap();
        assert_eq!(wallet.balance, balance_from_log(&log));
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let svc = service();
        let first = svc.get_or_create("acct-1").await.unwrap();
        let second = svc.get_or_create("acct-1").await.unwrap();
        assert_eq!(first.id, second.id);

        let log = svc.repos.wallets().transactions_for(&first.id).await.unwrap();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn credit_then_debit_updates_balance_and_log() {
        let svc = service();
        assert_eq!(svc.credit("acct-1", 1000, "top-up", "R1").await.unwrap(), 1000);
        assert_eq!(svc.debit("acct-1", 300, "booking", "bk-1").await.unwrap(), 700);
        ledger_invariant_holds(&svc, "acct-1").await;
    }

    #[tokio::test]
    async fn debit_beyond_balance_fails() {
        let svc = service();
        svc.credit("acct-1", 200, "top-up", "R1").await.unwrap();

        let err = svc.debit("acct-1", 300, "booking", "bk-1").await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientFunds {
                required: 300,
                available: 200
            }
        ));
        // Reject path must leave no trace in the ledger.
        let (log, total, balance) = svc.transactions("acct-1", None, 1, 50).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(log.len(), 1);
        assert_eq!(balance, 200);
    }

    #[tokio::test]
    async fn non_positive_amounts_rejected() {
        let svc = service();
        assert!(svc.credit("acct-1", 0, "d", "r").await.is_err());
        assert!(svc.debit("acct-1", -5, "d", "r").await.is_err());
    }

    #[tokio::test]
    async fn concurrent_debits_cannot_overdraw() {
        let svc = Arc::new(service());
        svc.credit("acct-1", 500, "top-up", "R1").await.unwrap();

        let a = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.debit("acct-1", 400, "first", "bk-a").await })
        };
        let b = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.debit("acct-1", 400, "second", "bk-b").await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let wallet = svc.get_or_create("acct-1").await.unwrap();
        assert_eq!(wallet.balance, 100);
        ledger_invariant_holds(&svc, "acct-1").await;
    }

    #[tokio::test]
    async fn duplicate_reference_does_not_double_charge() {
        let svc = service();
        svc.credit("acct-1", 1000, "top-up", "R1").await.unwrap();
        svc.debit("acct-1", 100, "pay", "order-7").await.unwrap();

        // A retried call with the same reference is rejected, not re-applied.
        let err = svc.debit("acct-1", 100, "pay", "order-7").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let wallet = svc.get_or_create("acct-1").await.unwrap();
        assert_eq!(wallet.balance, 900);
    }

    #[tokio::test]
    async fn topup_generates_unique_references() {
        let svc = service();
        let first = svc.topup("acct-1", 250, "card").await.unwrap();
        let second = svc.topup("acct-1", 250, "card").await.unwrap();
        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(second.new_balance, 500);
    }

    #[tokio::test]
    async fn transactions_are_newest_first_and_filterable() {
        let svc = service();
        svc.credit("acct-1", 1000, "top-up", "R1").await.unwrap();
        svc.debit("acct-1", 100, "pay", "P1").await.unwrap();
        svc.credit("acct-1", 50, "top-up", "R2").await.unwrap();

        let (all, total, balance) = svc.transactions("acct-1", None, 1, 50).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(balance, 950);
        let pairwise_sorted = all.windows(2).all(|w| w[0].created_at >= w[1].created_at);
        assert!(pairwise_sorted);

        let (debits, total, _) = svc
            .transactions("acct-1", Some(TransactionKind::Debit), 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(debits[0].reference, "P1");
    }
}
