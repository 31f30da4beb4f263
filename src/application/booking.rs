//! Booking state machine
//!
//! Drives the wallet ledger and availability checker together. Creation is
//! a multi-step mutation with an explicit compensation path: a debit
//! failure after the pending insert rolls the booking into a terminal
//! cancelled/failed state, so a confirmed booking always has a matching
//! ledger entry and a debit always has a surviving booking.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use crate::domain::access::{can_manage_station, can_view_booking};
use crate::domain::booking::{Booking, BookingStatus, TimeSlot, VehicleInfo};
use crate::domain::station::{ChargerType, Station};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::KeyedLocks;

use super::{paginate, AvailabilityService, Requester, WalletService};

/// Cancellation policy
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Minimum minutes before slot start below which cancellation is refused
    pub cancellation_cutoff_minutes: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            cancellation_cutoff_minutes: 60,
        }
    }
}

/// Parameters for a new booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub station_id: String,
    pub charger_type: ChargerType,
    pub time_slot: TimeSlot,
    pub vehicle: VehicleInfo,
    /// Client-quoted cost in minor currency units
    pub estimated_cost: i64,
}

/// Service owning the booking lifecycle
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    wallet: Arc<WalletService>,
    availability: Arc<AvailabilityService>,
    /// One lock per station, held across availability check + pending insert
    station_locks: KeyedLocks,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        wallet: Arc<WalletService>,
        availability: Arc<AvailabilityService>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            repos,
            wallet,
            availability,
            station_locks: KeyedLocks::new(),
            policy,
        }
    }

    /// Create a booking: validate, check funds, claim the slot, debit the
    /// wallet, confirm. Returns the persisted booking in `confirmed` state.
    pub async fn create(&self, user_id: &str, request: NewBooking) -> DomainResult<Booking> {
        request.time_slot.validate()?;
        request.vehicle.validate()?;
        if request.estimated_cost <= 0 {
            return Err(DomainError::Validation(
                "estimated_cost must be positive".to_string(),
            ));
        }

        let station = self.active_station(&request.station_id).await?;
        if !station.supports_charger(&request.charger_type) {
            return Err(DomainError::Validation(format!(
                "station does not offer {} charging",
                request.charger_type
            )));
        }

        // Advisory pre-check before touching the slot; the debit below is
        // authoritative.
        let wallet = self.wallet.get_or_create(user_id).await?;
        if wallet.balance < request.estimated_cost {
            return Err(DomainError::InsufficientFunds {
                required: request.estimated_cost,
                available: wallet.balance,
            });
        }

        // Claim the slot: the lock spans conflict check + pending insert,
        // so two overlapping requests cannot both pass the check.
        let booking = {
            let _slot_guard = self.station_locks.acquire(&request.station_id).await;
            self.availability
                .ensure_available(&request.station_id, &request.charger_type, &request.time_slot)
                .await?;

            let booking = Booking::new(
                user_id,
                &request.station_id,
                request.charger_type,
                request.time_slot,
                request.vehicle,
                request.estimated_cost,
            );
            self.repos.bookings().save(booking.clone()).await?;
            booking
        };
        // The pending row now occupies the slot; the lock can be released.

        let description = format!("Booking payment for {}", station.name);
        match self
            .wallet
            .debit(user_id, request.estimated_cost, &description, &booking.id)
            .await
        {
            Ok(new_balance) => {
                let mut booking = booking;
                booking.confirm();
                self.repos.bookings().update(booking.clone()).await?;

                metrics::counter!("bookings_created_total").increment(1);
                info!(
                    booking_id = %booking.id,
                    station_id = %booking.station_id,
                    user_id,
                    amount = booking.payment.amount,
                    new_balance,
                    "Booking confirmed"
                );
                Ok(booking)
            }
            Err(debit_err) => {
                // Compensate: never leave a pending booking holding the
                // slot without a ledger entry.
                let mut booking = booking;
                booking.fail_payment();
                if let Err(rollback_err) = self.repos.bookings().update(booking.clone()).await {
                    error!(
                        booking_id = %booking.id,
                        %rollback_err,
                        "Failed to roll back booking after debit failure"
                    );
                } else {
                    warn!(
                        booking_id = %booking.id,
                        %debit_err,
                        "Booking rolled back after debit failure"
                    );
                }
                Err(debit_err)
            }
        }
    }

    /// Cancel a pending/confirmed booking and refund the payment.
    pub async fn cancel(&self, requester_id: &str, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.booking_or_not_found(booking_id).await?;

        if booking.user_id != requester_id {
            return Err(DomainError::Forbidden(
                "only the booking owner can cancel it".to_string(),
            ));
        }
        if !booking.status.is_cancellable() {
            return Err(DomainError::InvalidState(format!(
                "cannot cancel a {} booking",
                booking.status
            )));
        }

        let cutoff = Duration::minutes(self.policy.cancellation_cutoff_minutes);
        if booking.time_slot.start - Utc::now() < cutoff {
            return Err(DomainError::TooLateToCancel {
                cutoff_minutes: self.policy.cancellation_cutoff_minutes,
            });
        }

        match self
            .wallet
            .credit(
                requester_id,
                booking.payment.amount,
                "Refund for cancelled booking",
                &booking.id,
            )
            .await
        {
            Ok(_) => {}
            // A refund for this booking already landed (an earlier cancel
            // credited the wallet but failed before persisting the status);
            // finish the state change instead of refunding twice.
            Err(DomainError::Conflict(_)) => {
                warn!(booking_id = %booking.id, "Refund already recorded, completing cancellation");
            }
            Err(e) => return Err(e),
        }

        booking.cancel();
        self.repos.bookings().update(booking.clone()).await?;

        metrics::counter!("bookings_cancelled_total").increment(1);
        info!(
            booking_id = %booking.id,
            refund = booking.payment.amount,
            "Booking cancelled"
        );
        Ok(booking)
    }

    /// Charging session begins: `confirmed → active`.
    pub async fn start(&self, requester: &Requester, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.booking_or_not_found(booking_id).await?;
        self.ensure_participant(requester, &booking).await?;

        if booking.status != BookingStatus::Confirmed {
            return Err(DomainError::InvalidState(format!(
                "cannot start a {} booking",
                booking.status
            )));
        }

        booking.start();
        self.repos.bookings().update(booking.clone()).await?;
        info!(booking_id = %booking.id, "Charging session started");
        Ok(booking)
    }

    /// Charging session ends: `active → completed`.
    pub async fn complete(&self, requester: &Requester, booking_id: &str) -> DomainResult<Booking> {
        let mut booking = self.booking_or_not_found(booking_id).await?;
        self.ensure_participant(requester, &booking).await?;

        if booking.status != BookingStatus::Active {
            return Err(DomainError::InvalidState(format!(
                "cannot complete a {} booking",
                booking.status
            )));
        }

        booking.complete();
        self.repos.bookings().update(booking.clone()).await?;
        info!(booking_id = %booking.id, actual_cost = booking.actual_cost, "Charging session completed");
        Ok(booking)
    }

    /// A single booking, visible to its owner and station managers.
    pub async fn get(&self, requester: &Requester, booking_id: &str) -> DomainResult<Booking> {
        let booking = self.booking_or_not_found(booking_id).await?;
        let station = self.station_or_not_found(&booking.station_id).await?;

        if !can_view_booking(&requester.id, &requester.role, &booking, &station) {
            return Err(DomainError::Forbidden(
                "not allowed to view this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Newest-first page of the user's own bookings.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        let mut bookings = self.repos.bookings().find_for_user(user_id).await?;
        if let Some(status) = status {
            bookings.retain(|b| b.status == status);
        }
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(bookings, page, limit))
    }

    /// Newest-first page of a station's bookings; restricted to the
    /// station's provider and admins.
    pub async fn list_for_station(
        &self,
        requester: &Requester,
        station_id: &str,
        status: Option<BookingStatus>,
        page: u32,
        limit: u32,
    ) -> DomainResult<(Vec<Booking>, u64)> {
        let station = self.station_or_not_found(station_id).await?;
        if !can_manage_station(&requester.id, &requester.role, &station) {
            return Err(DomainError::Forbidden(
                "not allowed to view this station's bookings".to_string(),
            ));
        }

        let mut bookings = self.repos.bookings().find_for_station(station_id).await?;
        if let Some(status) = status {
            bookings.retain(|b| b.status == status);
        }
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(bookings, page, limit))
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn active_station(&self, station_id: &str) -> DomainResult<Station> {
        // A missing and an inactive station look the same to the caller.
        match self.repos.stations().find_by_id(station_id).await? {
            Some(station) if station.is_active() => Ok(station),
            _ => Err(DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            }),
        }
    }

    async fn station_or_not_found(&self, station_id: &str) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Station",
                field: "id",
                value: station_id.to_string(),
            })
    }

    async fn booking_or_not_found(&self, booking_id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }

    async fn ensure_participant(
        &self,
        requester: &Requester,
        booking: &Booking,
    ) -> DomainResult<()> {
        let station = self.station_or_not_found(&booking.station_id).await?;
        if can_view_booking(&requester.id, &requester.role, booking, &station) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "not allowed to modify this booking".to_string(),
            ))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::account::AccountRole;
    use crate::domain::booking::PaymentStatus;
    use crate::domain::station::{ChargerSpec, Location, PriceUnit, Rating, StationStatus};
    use crate::domain::wallet::balance_from_log;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        wallet: Arc<WalletService>,
        bookings: BookingService,
    }

    fn fixture() -> Fixture {
        fixture_with_capacity(1)
    }

    fn fixture_with_capacity(slot_capacity: u32) -> Fixture {
        let repos: Arc<InMemoryRepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let wallet = Arc::new(WalletService::new(repos.clone()));
        let availability = Arc::new(AvailabilityService::new(repos.clone(), slot_capacity));
        let bookings = BookingService::new(
            repos.clone(),
            wallet.clone(),
            availability,
            BookingPolicy::default(),
        );
        Fixture {
            repos,
            wallet,
            bookings,
        }
    }

    async fn seed_station(fx: &Fixture, id: &str) {
        let now = Utc::now();
        let station = Station {
            id: id.into(),
            provider_id: "prov-1".into(),
            name: "GreenVolt Plaza".into(),
            description: "Test plaza".into(),
            location: Location {
                address: "1 Ring Road".into(),
                city: "Tashkent".into(),
                state: "Tashkent".into(),
                pincode: "100000".into(),
                latitude: 41.31,
                longitude: 69.25,
            },
            charger_types: vec![ChargerSpec {
                charger_type: ChargerType::Ac,
                power_kw: 7.4,
                port_count: 2,
            }],
            price: 2500,
            price_unit: PriceUnit::PerKwh,
            status: StationStatus::Active,
            rating: Rating::default(),
            created_at: now,
            updated_at: now,
        };
        fx.repos.stations().save(station).await.unwrap();
    }

    fn request(station_id: &str, start_in_minutes: i64, duration_minutes: i64, cost: i64) -> NewBooking {
        let start = Utc::now() + Duration::minutes(start_in_minutes);
        NewBooking {
            station_id: station_id.into(),
            charger_type: ChargerType::Ac,
            time_slot: TimeSlot::new(start, start + Duration::minutes(duration_minutes)),
            vehicle: VehicleInfo {
                make: "Tesla".into(),
                model: "Model Y".into(),
                battery_capacity_kwh: 75.0,
                current_charge_pct: 20,
                target_charge_pct: 80,
            },
            estimated_cost: cost,
        }
    }

    async fn ledger_matches_balance(fx: &Fixture, account_id: &str) {
        let wallet = fx.wallet.get_or_create(account_id).await.unwrap();
        let log = fx.repos.wallets().transactions_for(&wallet.id).await.unwrap();
        assert_eq!(wallet.balance, balance_from_log(&log));
    }

    #[tokio::test]
    async fn create_confirms_and_debits() {
        // Scenario: balance 1000, cost 300 → confirmed, paid, balance 700.
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let booking = fx.bookings.create("user-1", request("st-1", 180, 60, 300)).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment.status, PaymentStatus::Completed);
        assert_eq!(booking.payment.amount, 300);

        let wallet = fx.wallet.get_or_create("user-1").await.unwrap();
        assert_eq!(wallet.balance, 700);

        let log = fx.repos.wallets().transactions_for(&wallet.id).await.unwrap();
        let debits: Vec<_> = log.iter().filter(|t| t.reference == booking.id).collect();
        assert_eq!(debits.len(), 1);
        assert_eq!(debits[0].amount, 300);
        ledger_matches_balance(&fx, "user-1").await;
    }

    #[tokio::test]
    async fn create_fails_on_insufficient_funds_without_side_effects() {
        // Scenario: balance 200, cost 300 → InsufficientFunds, no booking.
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 200, "top-up", "T1").await.unwrap();

        let err = fx
            .bookings
            .create("user-1", request("st-1", 180, 60, 300))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientFunds { .. }));

        assert_eq!(fx.repos.bookings().count().await.unwrap(), 0);
        let wallet = fx.wallet.get_or_create("user-1").await.unwrap();
        assert_eq!(wallet.balance, 200);
    }

    #[tokio::test]
    async fn create_fails_for_missing_or_inactive_station() {
        let fx = fixture();
        let err = fx
            .bookings
            .create("user-1", request("ghost", 180, 60, 300))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        seed_station(&fx, "st-1").await;
        let mut station = fx.repos.stations().find_by_id("st-1").await.unwrap().unwrap();
        station.status = StationStatus::Maintenance;
        fx.repos.stations().update(station).await.unwrap();
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let err = fx
            .bookings
            .create("user-1", request("st-1", 180, 60, 300))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_rejects_unoffered_charger_type() {
        let fx = fixture();
        seed_station(&fx, "st-1").await; // offers AC only
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let mut req = request("st-1", 180, 60, 300);
        req.charger_type = ChargerType::FastDc;
        let err = fx.bookings.create("user-1", req).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn overlapping_window_is_rejected_adjacent_is_not() {
        // Scenario: [14:00,15:00) booked; [14:30,15:30) rejected;
        // [15:00,16:00) accepted.
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        fx.wallet.credit("user-2", 1000, "top-up", "T2").await.unwrap();

        fx.bookings.create("user-1", request("st-1", 840, 60, 300)).await.unwrap();

        let err = fx
            .bookings
            .create("user-2", request("st-1", 870, 60, 300))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable));

        fx.bookings.create("user-2", request("st-1", 900, 60, 300)).await.unwrap();

        // The rejected attempt must not have charged user-2.
        let wallet = fx.wallet.get_or_create("user-2").await.unwrap();
        assert_eq!(wallet.balance, 700);
    }

    #[tokio::test]
    async fn concurrent_overlapping_requests_confirm_exactly_one() {
        let fx = Arc::new(fixture());
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        fx.wallet.credit("user-2", 1000, "top-up", "T2").await.unwrap();

        let a = {
            let fx = fx.clone();
            tokio::spawn(async move { fx.bookings.create("user-1", request("st-1", 840, 60, 300)).await })
        };
        let b = {
            let fx = fx.clone();
            tokio::spawn(async move { fx.bookings.create("user-2", request("st-1", 850, 60, 300)).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let confirmed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(confirmed, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DomainError::SlotUnavailable))));
    }

    #[tokio::test]
    async fn debit_race_rolls_pending_booking_back() {
        // Both requests pass the advisory pre-check (balance 300 covers one
        // 300 booking), then race the authoritative debit for disjoint
        // windows. Exactly one confirms; the loser must not stay pending.
        let fx = Arc::new(fixture());
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 300, "top-up", "T1").await.unwrap();

        let a = {
            let fx = fx.clone();
            tokio::spawn(async move { fx.bookings.create("user-1", request("st-1", 840, 60, 300)).await })
        };
        let b = {
            let fx = fx.clone();
            tokio::spawn(async move { fx.bookings.create("user-1", request("st-1", 960, 60, 300)).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let confirmed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(confirmed, 1);

        let wallet = fx.wallet.get_or_create("user-1").await.unwrap();
        assert_eq!(wallet.balance, 0);
        ledger_matches_balance(&fx, "user-1").await;

        // No booking may be left dangling in pending with payment pending.
        for booking in fx.repos.bookings().find_all().await.unwrap() {
            match booking.status {
                BookingStatus::Confirmed => {
                    assert_eq!(booking.payment.status, PaymentStatus::Completed)
                }
                BookingStatus::Cancelled => {
                    assert_eq!(booking.payment.status, PaymentStatus::Failed)
                }
                other => panic!("booking left in unexpected state {}", other),
            }
        }
    }

    #[tokio::test]
    async fn cancel_refunds_and_marks_refunded() {
        // Scenario: confirmed booking starting in 90 minutes, amount 240.
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let booking = fx.bookings.create("user-1", request("st-1", 90, 60, 240)).await.unwrap();
        let cancelled = fx.bookings.cancel("user-1", &booking.id).await.unwrap();

        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment.status, PaymentStatus::Refunded);

        let wallet = fx.wallet.get_or_create("user-1").await.unwrap();
        assert_eq!(wallet.balance, 1000);
        ledger_matches_balance(&fx, "user-1").await;
    }

    #[tokio::test]
    async fn cancel_too_close_to_start_is_rejected_without_changes() {
        // Scenario: booking starting in 30 minutes → TooLateToCancel.
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let booking = fx.bookings.create("user-1", request("st-1", 30, 60, 240)).await.unwrap();
        let err = fx.bookings.cancel("user-1", &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::TooLateToCancel { .. }));

        let unchanged = fx.repos.bookings().find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, BookingStatus::Confirmed);
        let wallet = fx.wallet.get_or_create("user-1").await.unwrap();
        assert_eq!(wallet.balance, 760);
    }

    #[tokio::test]
    async fn cancel_is_owner_only() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let booking = fx.bookings.create("user-1", request("st-1", 180, 60, 240)).await.unwrap();
        let err = fx.bookings.cancel("user-2", &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn cancel_rejects_terminal_states() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        let requester = Requester::new("user-1", AccountRole::User);

        let booking = fx.bookings.create("user-1", request("st-1", 180, 60, 240)).await.unwrap();
        fx.bookings.start(&requester, &booking.id).await.unwrap();
        fx.bookings.complete(&requester, &booking.id).await.unwrap();

        let err = fx.bookings.cancel("user-1", &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let fx = fixture();
        let err = fx.bookings.cancel("user-1", "ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lifecycle_start_complete_sets_actual_cost() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        let requester = Requester::new("user-1", AccountRole::User);

        let booking = fx.bookings.create("user-1", request("st-1", 180, 60, 300)).await.unwrap();

        // completed before active is invalid
        let err = fx.bookings.complete(&requester, &booking.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        fx.bookings.start(&requester, &booking.id).await.unwrap();
        let done = fx.bookings.complete(&requester, &booking.id).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        assert_eq!(done.actual_cost, 300);
    }

    #[tokio::test]
    async fn station_listing_is_guarded() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        fx.bookings.create("user-1", request("st-1", 180, 60, 300)).await.unwrap();

        let provider = Requester::new("prov-1", AccountRole::Provider);
        let (items, total) = fx
            .bookings
            .list_for_station(&provider, "st-1", None, 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items.len(), 1);

        let admin = Requester::new("somebody", AccountRole::Admin);
        assert!(fx.bookings.list_for_station(&admin, "st-1", None, 1, 50).await.is_ok());

        let stranger = Requester::new("prov-2", AccountRole::Provider);
        let err = fx
            .bookings
            .list_for_station(&stranger, "st-1", None, 1, 50)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn user_listing_filters_by_status() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();

        let b1 = fx.bookings.create("user-1", request("st-1", 180, 60, 100)).await.unwrap();
        fx.bookings.create("user-1", request("st-1", 300, 60, 100)).await.unwrap();
        fx.bookings.cancel("user-1", &b1.id).await.unwrap();

        let (cancelled, total) = fx
            .bookings
            .list_for_user("user-1", Some(BookingStatus::Cancelled), 1, 50)
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(cancelled[0].id, b1.id);

        let (all, total) = fx.bookings.list_for_user("user-1", None, 1, 50).await.unwrap();
        assert_eq!(total, 2);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn capacity_two_station_takes_two_overlapping_bookings() {
        let fx = fixture_with_capacity(2);
        seed_station(&fx, "st-1").await;
        fx.wallet.credit("user-1", 1000, "top-up", "T1").await.unwrap();
        fx.wallet.credit("user-2", 1000, "top-up", "T2").await.unwrap();
        fx.wallet.credit("user-3", 1000, "top-up", "T3").await.unwrap();

        fx.bookings.create("user-1", request("st-1", 840, 60, 300)).await.unwrap();
        fx.bookings.create("user-2", request("st-1", 850, 60, 300)).await.unwrap();

        let err = fx
            .bookings
            .create("user-3", request("st-1", 860, 60, 300))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SlotUnavailable));
    }
}
