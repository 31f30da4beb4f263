//! Slot availability checking
//!
//! A station is treated as `slot_capacity` bookable slots for any time
//! window, regardless of charger type: one overlapping pending, confirmed
//! or active booking consumes one slot station-wide. This mirrors the
//! marketplace's original conflict rule; raising `slot_capacity` in config
//! turns on per-port capacity.

use std::sync::Arc;

use tracing::debug;

use crate::domain::booking::TimeSlot;
use crate::domain::station::ChargerType;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Service for availability checks
pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    slot_capacity: u32,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, slot_capacity: u32) -> Self {
        Self {
            repos,
            slot_capacity: slot_capacity.max(1),
        }
    }

    /// Whether the station still has a free slot for the window.
    ///
    /// Overlap uses the half-open interval rule; cancelled and completed
    /// bookings never conflict.
    pub async fn is_available(
        &self,
        station_id: &str,
        charger_type: &ChargerType,
        window: &TimeSlot,
    ) -> DomainResult<bool> {
        let blocking = self
            .repos
            .bookings()
            .find_blocking_for_station(station_id)
            .await?;

        let overlapping = blocking
            .iter()
            .filter(|b| b.time_slot.overlaps(window))
            .count() as u32;

        debug!(
            station_id,
            charger_type = %charger_type,
            overlapping,
            capacity = self.slot_capacity,
            "Availability check"
        );
        Ok(overlapping < self.slot_capacity)
    }

    /// `is_available` as a guard clause.
    pub async fn ensure_available(
        &self,
        station_id: &str,
        charger_type: &ChargerType,
        window: &TimeSlot,
    ) -> DomainResult<()> {
        if self.is_available(station_id, charger_type, window).await? {
            Ok(())
        } else {
            Err(DomainError::SlotUnavailable)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::booking::{Booking, VehicleInfo};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn slot(start_min: i64, end_min: i64) -> TimeSlot {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        TimeSlot::new(
            base + Duration::minutes(start_min),
            base + Duration::minutes(end_min),
        )
    }

    fn vehicle() -> VehicleInfo {
        VehicleInfo {
            make: "Kia".into(),
            model: "EV6".into(),
            battery_capacity_kwh: 77.4,
            current_charge_pct: 10,
            target_charge_pct: 80,
        }
    }

    async fn seed_booking(
        repos: &Arc<InMemoryRepositoryProvider>,
        station_id: &str,
        window: TimeSlot,
    ) -> Booking {
        let booking = Booking::new("user-1", station_id, ChargerType::Ac, window, vehicle(), 100);
        repos.bookings().save(booking.clone()).await.unwrap();
        booking
    }

    fn svc(repos: Arc<InMemoryRepositoryProvider>, capacity: u32) -> AvailabilityService {
        AvailabilityService::new(repos, capacity)
    }

    #[tokio::test]
    async fn empty_station_is_available() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = svc(repos, 1);
        assert!(svc
            .is_available("st-1", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn overlapping_booking_blocks_the_slot() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        // [12:00, 13:00)
        seed_booking(&repos, "st-1", slot(0, 60)).await;
        let svc = svc(repos, 1);

        // [12:30, 13:30) overlaps
        assert!(!svc
            .is_available("st-1", &ChargerType::Ac, &slot(30, 90))
            .await
            .unwrap());
        // [13:00, 14:00) is adjacent; half-open windows do not conflict
        assert!(svc
            .is_available("st-1", &ChargerType::Ac, &slot(60, 120))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn conflict_is_station_wide_across_charger_types() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_booking(&repos, "st-1", slot(0, 60)).await; // AC booking
        let svc = svc(repos, 1);

        // A DC request for the same window is still blocked.
        assert!(!svc
            .is_available("st-1", &ChargerType::Dc, &slot(0, 60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn terminal_bookings_do_not_conflict() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let mut booking = seed_booking(&repos, "st-1", slot(0, 60)).await;
        booking.cancel();
        repos.bookings().update(booking).await.unwrap();
        let svc = svc(repos, 1);

        assert!(svc
            .is_available("st-1", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_station_does_not_conflict() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_booking(&repos, "st-1", slot(0, 60)).await;
        let svc = svc(repos, 1);

        assert!(svc
            .is_available("st-2", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn capacity_above_one_allows_parallel_bookings() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_booking(&repos, "st-1", slot(0, 60)).await;
        let svc = svc(repos.clone(), 2);

        assert!(svc
            .is_available("st-1", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap());

        seed_booking(&repos, "st-1", slot(0, 60)).await;
        assert!(!svc
            .is_available("st-1", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn ensure_available_maps_to_slot_unavailable() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_booking(&repos, "st-1", slot(0, 60)).await;
        let svc = svc(repos, 1);

        let err = svc
            .ensure_available("st-1", &ChargerType::Ac, &slot(0, 60))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable));
    }
}
