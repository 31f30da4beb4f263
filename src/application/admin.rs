//! Aggregate platform metrics for admins

use std::sync::Arc;

use crate::domain::account::AccountRole;
use crate::domain::booking::{BookingStatus, PaymentStatus};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

use super::Requester;

/// Dashboard snapshot
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_stations: u64,
    pub total_bookings: u64,
    pub active_bookings: u64,
    /// Sum of settled booking payments in minor currency units; refunded
    /// payments do not count
    pub total_revenue: i64,
}

/// Service for admin views
pub struct AdminService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn dashboard(&self, requester: &Requester) -> DomainResult<DashboardStats> {
        if requester.role != AccountRole::Admin {
            return Err(DomainError::Forbidden("admin access required".to_string()));
        }

        let total_users = self.repos.accounts().count().await?;
        let total_stations = self.repos.stations().count().await?;
        let total_bookings = self.repos.bookings().count().await?;
        let active_bookings = self
            .repos
            .bookings()
            .count_by_status(BookingStatus::Active)
            .await?;

        let total_revenue = self
            .repos
            .bookings()
            .find_all()
            .await?
            .iter()
            .filter(|b| b.payment.status == PaymentStatus::Completed)
            .map(|b| b.payment.amount)
            .sum();

        Ok(DashboardStats {
            total_users,
            total_stations,
            total_bookings,
            active_bookings,
            total_revenue,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::account::Account;
    use crate::domain::booking::{Booking, TimeSlot, VehicleInfo};
    use crate::domain::station::ChargerType;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn booking(user: &str, cost: i64) -> Booking {
        let start = Utc::now() + Duration::hours(1);
        Booking::new(
            user,
            "st-1",
            ChargerType::Ac,
            TimeSlot::new(start, start + Duration::hours(1)),
            VehicleInfo {
                make: "Nio".into(),
                model: "ET5".into(),
                battery_capacity_kwh: 75.0,
                current_charge_pct: 10,
                target_charge_pct: 90,
            },
            cost,
        )
    }

    #[tokio::test]
    async fn dashboard_requires_admin() {
        let svc = AdminService::new(Arc::new(InMemoryRepositoryProvider::new()));
        let err = svc
            .dashboard(&Requester::new("prov", AccountRole::Provider))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn dashboard_counts_and_revenue() {
        let repos: Arc<InMemoryRepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let svc = AdminService::new(repos.clone());

        repos
            .accounts()
            .save(Account::new("A", "a@x.io", "h", "1", AccountRole::User))
            .await
            .unwrap();

        // Confirmed booking: settled payment, counts as revenue.
        let mut confirmed = booking("user-1", 300);
        confirmed.confirm();
        repos.bookings().save(confirmed).await.unwrap();

        // Active booking: settled payment, counts as revenue.
        let mut active = booking("user-1", 200);
        active.confirm();
        active.start();
        repos.bookings().save(active).await.unwrap();

        // Cancelled-with-refund booking: no revenue.
        let mut refunded = booking("user-2", 500);
        refunded.confirm();
        refunded.cancel();
        repos.bookings().save(refunded).await.unwrap();

        let stats = svc
            .dashboard(&Requester::new("adm", AccountRole::Admin))
            .await
            .unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.active_bookings, 1);
        assert_eq!(stats.total_revenue, 500);
    }
}
