//! SeaORM implementation of AccountRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::account::{Account, AccountRepository, AccountRole};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::account;

use super::db_err;

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: account::Model) -> Account {
    Account {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        phone: m.phone,
        role: AccountRole::from_str(&m.role),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn to_active_model(a: Account) -> account::ActiveModel {
    account::ActiveModel {
        id: Set(a.id),
        name: Set(a.name),
        email: Set(a.email),
        password_hash: Set(a.password_hash),
        phone: Set(a.phone),
        role: Set(a.role.as_str().to_string()),
        is_active: Set(a.is_active),
        created_at: Set(a.created_at),
        updated_at: Set(a.updated_at),
    }
}

// ── AccountRepository impl ──────────────────────────────────────

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn save(&self, a: Account) -> DomainResult<()> {
        let email = a.email.clone();
        to_active_model(a).insert(&self.db).await.map_err(|e| {
            match db_err(e) {
                DomainError::Conflict(_) => {
                    DomainError::Conflict(format!("email {} already registered", email))
                }
                other => other,
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let model = account::Entity::find()
            .filter(account::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, a: Account) -> DomainResult<()> {
        let existing = account::Entity::find_by_id(&a.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Account",
                field: "id",
                value: a.id,
            });
        }

        to_active_model(a).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Account>> {
        let models = account::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count(&self) -> DomainResult<u64> {
        account::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
