//! Wallet domain entity
//!
//! The wallet owns an append-only transaction log; entries are only ever
//! appended, never mutated or deleted. The stored balance must equal
//! `sum(credits) − sum(debits)` over the log at all times.

use chrono::{DateTime, Utc};

/// Ledger entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only ledger entry
#[derive(Debug, Clone)]
pub struct WalletTransaction {
    pub id: String,
    pub wallet_id: String,
    pub kind: TransactionKind,
    /// Always positive, in minor currency units
    pub amount: i64,
    pub description: String,
    /// Free-form correlation key (booking ID, top-up ID, …); unique per
    /// (wallet, reference, kind) so retried calls cannot double-apply
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        wallet_id: impl Into<String>,
        kind: TransactionKind,
        amount: i64,
        description: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            wallet_id: wallet_id.into(),
            kind,
            amount,
            description: description.into(),
            reference: reference.into(),
            created_at: Utc::now(),
        }
    }

    /// Signed effect of this entry on the balance
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

/// Stored-value wallet, 1:1 with an account
#[derive(Debug, Clone)]
pub struct Wallet {
    pub id: String,
    pub account_id: String,
    /// Minor currency units, never negative
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Fresh wallet with zero balance
    pub fn new(account_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.into(),
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Recompute a balance from a transaction log (consistency checks)
pub fn balance_from_log(transactions: &[WalletTransaction]) -> i64 {
    transactions.iter().map(WalletTransaction::signed_amount).sum()
}

// ── Tests ──────────────────────────────────────────────────────
