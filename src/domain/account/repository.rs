//! Account repository interface

use async_trait::async_trait;

use super::model::Account;
use crate::domain::DomainResult;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Save a new account. Fails with `Conflict` when the email is taken.
    async fn save(&self, account: Account) -> DomainResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>>;

    /// Find account by (lowercased) email
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;

    /// Update an existing account
    async fn update(&self, account: Account) -> DomainResult<()>;

    /// All accounts (admin views)
    async fn find_all(&self) -> DomainResult<Vec<Account>>;

    /// Total number of accounts
    async fn count(&self) -> DomainResult<u64>;
}
