//! SeaORM implementation of WalletRepository
//!
//! `apply` runs balance update + ledger append inside one database
//! transaction; the unique ledger index turns retried references into a
//! `Conflict` instead of a double charge.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::domain::wallet::{
    TransactionKind, Wallet, WalletRepository, WalletTransaction,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{wallet, wallet_transaction};

use super::db_err;

pub struct SeaOrmWalletRepository {
    db: DatabaseConnection,
}

impl SeaOrmWalletRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn wallet_to_domain(m: wallet::Model) -> Wallet {
    Wallet {
        id: m.id,
        account_id: m.account_id,
        balance: m.balance,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn tx_to_domain(m: wallet_transaction::Model) -> DomainResult<WalletTransaction> {
    let kind = TransactionKind::parse(&m.kind).ok_or_else(|| {
        DomainError::Storage(format!("corrupt kind '{}' for transaction {}", m.kind, m.id))
    })?;
    Ok(WalletTransaction {
        id: m.id,
        wallet_id: m.wallet_id,
        kind,
        amount: m.amount,
        description: m.description,
        reference: m.reference,
        created_at: m.created_at,
    })
}

fn tx_to_active_model(t: WalletTransaction) -> wallet_transaction::ActiveModel {
    wallet_transaction::ActiveModel {
        id: Set(t.id),
        wallet_id: Set(t.wallet_id),
        kind: Set(t.kind.as_str().to_string()),
        amount: Set(t.amount),
        description: Set(t.description),
        reference: Set(t.reference),
        created_at: Set(t.created_at),
    }
}

// ── WalletRepository impl ───────────────────────────────────────

#[async_trait]
impl WalletRepository for SeaOrmWalletRepository {
    async fn save(&self, w: Wallet) -> DomainResult<()> {
        let account_id = w.account_id.clone();
        let model = wallet::ActiveModel {
            id: Set(w.id),
            account_id: Set(w.account_id),
            balance: Set(w.balance),
            created_at: Set(w.created_at),
            updated_at: Set(w.updated_at),
        };
        model.insert(&self.db).await.map_err(|e| match db_err(e) {
            DomainError::Conflict(_) => DomainError::Conflict(format!(
                "wallet for account {} already exists",
                account_id
            )),
            other => other,
        })?;
        Ok(())
    }

    async fn find_by_account(&self, account_id: &str) -> DomainResult<Option<Wallet>> {
        let model = wallet::Entity::find()
            .filter(wallet::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(wallet_to_domain))
    }

    async fn apply(
        &self,
        wallet_id: &str,
        new_balance: i64,
        transaction: WalletTransaction,
    ) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = wallet::Entity::find_by_id(wallet_id)
            .one(&txn)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Wallet",
                field: "id",
                value: wallet_id.to_string(),
            });
        };

        let reference = transaction.reference.clone();
        let kind = transaction.kind;
        tx_to_active_model(transaction)
            .insert(&txn)
            .await
            .map_err(|e| match db_err(e) {
                DomainError::Conflict(_) => DomainError::Conflict(format!(
                    "duplicate {} transaction for reference {}",
                    kind, reference
                )),
                other => other,
            })?;

        let mut active: wallet::ActiveModel = existing.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn transactions_for(&self, wallet_id: &str) -> DomainResult<Vec<WalletTransaction>> {
        let models = wallet_transaction::Entity::find()
            .filter(wallet_transaction::Column::WalletId.eq(wallet_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(tx_to_domain).collect()
    }

    async fn find_transaction(
        &self,
        wallet_id: &str,
        reference: &str,
        kind: TransactionKind,
    ) -> DomainResult<Option<WalletTransaction>> {
        let model = wallet_transaction::Entity::find()
            .filter(wallet_transaction::Column::WalletId.eq(wallet_id))
            .filter(wallet_transaction::Column::Reference.eq(reference))
            .filter(wallet_transaction::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(tx_to_domain).transpose()
    }
}
