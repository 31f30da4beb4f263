//! Wallet DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::wallet::WalletTransaction;

/// Ledger entry in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionDto {
    pub id: String,
    /// "credit" or "debit"
    pub kind: String,
    /// Minor currency units, always positive
    pub amount: i64,
    pub description: String,
    pub reference: String,
    pub created_at: String,
}

impl TransactionDto {
    pub fn from_domain(t: WalletTransaction) -> Self {
        Self {
            id: t.id,
            kind: t.kind.as_str().to_string(),
            amount: t.amount,
            description: t.description,
            reference: t.reference,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Wallet snapshot with its most recent transactions
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletDto {
    pub id: String,
    /// Minor currency units
    pub balance: i64,
    pub transactions: Vec<TransactionDto>,
}

/// Request to top up the wallet (simulated payment gateway)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TopupRequest {
    /// Minor currency units
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    /// Display label only, e.g. "card"
    pub payment_method: Option<String>,
}

/// Top-up result
#[derive(Debug, Serialize, ToSchema)]
pub struct TopupResponse {
    pub transaction_id: String,
    pub amount: i64,
    pub new_balance: i64,
}

/// Request for a generic wallet payment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PayRequest {
    /// Minor currency units
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    pub description: Option<String>,
    /// Dedup key; generated when absent
    pub reference: Option<String>,
}

/// Payment result
#[derive(Debug, Serialize, ToSchema)]
pub struct PayResponse {
    pub amount: i64,
    pub new_balance: i64,
}

/// Query params for the transaction listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct TransactionFilter {
    /// Filter by kind: "credit" or "debit"
    pub kind: Option<String>,
}

/// One page of the ledger plus the current balance
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionPage {
    pub balance: i64,
    pub transactions: Vec<TransactionDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}
