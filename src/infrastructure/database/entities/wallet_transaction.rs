//! Wallet transaction entity
//!
//! Append-only: rows are inserted, never updated or deleted. A unique
//! index on (wallet_id, reference, kind) keeps retried ledger calls from
//! double-applying.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub wallet_id: String,

    /// credit, debit
    pub kind: String,

    /// Always positive, in minor currency units
    pub amount: i64,

    pub description: String,

    /// Free-form correlation key (booking ID, top-up ID, …)
    pub reference: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallet::Entity",
        from = "Column::WalletId",
        to = "super::wallet::Column::Id"
    )]
    Wallet,
}

impl Related<super::wallet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
