//! Account domain entity

use chrono::{DateTime, Utc};

/// Account role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRole {
    /// Regular customer booking charging slots
    User,
    /// Owns and manages stations
    Provider,
    /// Platform administrator
    Admin,
}

impl Default for AccountRole {
    fn default() -> Self {
        Self::User
    }
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "provider" => Self::Provider,
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Marketplace account
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Unique, stored lowercase
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: AccountRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        phone: impl Into<String>,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            phone: phone.into(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_defaults() {
        let a = Account::new("Alice", "Alice@Example.COM", "hash", "+998901234567", AccountRole::User);
        assert!(a.is_active);
        assert_eq!(a.email, "alice@example.com");
        assert_eq!(a.role, AccountRole::User);
    }

    #[test]
    fn role_roundtrip() {
        for role in &[AccountRole::User, AccountRole::Provider, AccountRole::Admin] {
            assert_eq!(&AccountRole::from_str(role.as_str()), role);
        }
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(AccountRole::from_str("superuser"), AccountRole::User);
    }
}
