//! Booking domain entity
//!
//! A booking exclusively owns its embedded time slot and payment
//! sub-records; neither has an independent lifecycle.

use chrono::{DateTime, Utc};

use crate::domain::station::ChargerType;
use crate::domain::{DomainError, DomainResult};

/// Booking lifecycle status
///
/// `pending → confirmed → active → completed`; `pending|confirmed →
/// cancelled`. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a booking in this status occupies its time slot
    pub fn blocks_slot(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Active)
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Wallet,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::Card => "card",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "card" => Self::Card,
            _ => Self::Wallet,
        }
    }
}

/// Embedded payment sub-record
#[derive(Debug, Clone)]
pub struct Payment {
    /// Amount in minor currency units; equals the estimated cost at creation
    pub amount: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

/// Half-open reservation interval `[start, end)`
#[derive(Debug, Clone)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }

    /// Validate interval shape: `end > start` and the stored duration
    /// matches the interval.
    pub fn validate(&self) -> DomainResult<()> {
        if self.end <= self.start {
            return Err(DomainError::Validation(
                "time slot end must be after start".to_string(),
            ));
        }
        if self.duration_minutes != (self.end - self.start).num_minutes() {
            return Err(DomainError::Validation(
                "time slot duration does not match start/end".to_string(),
            ));
        }
        Ok(())
    }

    /// Standard half-open overlap rule: `[a,b)` and `[c,d)` conflict iff
    /// `a < d && b > c`. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Vehicle charge parameters captured at booking time
#[derive(Debug, Clone)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub battery_capacity_kwh: f64,
    /// State of charge on arrival, percent in [0, 100]
    pub current_charge_pct: i32,
    /// Requested state of charge, percent in [0, 100], must exceed current
    pub target_charge_pct: i32,
}

impl VehicleInfo {
    pub fn validate(&self) -> DomainResult<()> {
        for (label, pct) in [
            ("current_charge", self.current_charge_pct),
            ("target_charge", self.target_charge_pct),
        ] {
            if !(0..=100).contains(&pct) {
                return Err(DomainError::Validation(format!(
                    "{} must be between 0 and 100",
                    label
                )));
            }
        }
        if self.target_charge_pct <= self.current_charge_pct {
            return Err(DomainError::Validation(
                "target_charge must be greater than current_charge".to_string(),
            ));
        }
        Ok(())
    }
}

/// Charging slot reservation with embedded payment
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub charger_type: ChargerType,
    pub time_slot: TimeSlot,
    pub vehicle: VehicleInfo,
    /// Quoted cost in minor currency units
    pub estimated_cost: i64,
    /// Metered cost; stays 0 until session completion
    pub actual_cost: i64,
    pub payment: Payment,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a new booking in `pending` state with payment `pending`.
    pub fn new(
        user_id: impl Into<String>,
        station_id: impl Into<String>,
        charger_type: ChargerType,
        time_slot: TimeSlot,
        vehicle: VehicleInfo,
        estimated_cost: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            station_id: station_id.into(),
            charger_type,
            time_slot,
            vehicle,
            estimated_cost,
            actual_cost: 0,
            payment: Payment {
                amount: estimated_cost,
                method: PaymentMethod::Wallet,
                status: PaymentStatus::Pending,
            },
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Settle the payment and confirm the slot
    pub fn confirm(&mut self) {
        self.status = BookingStatus::Confirmed;
        self.payment.status = PaymentStatus::Completed;
        self.updated_at = Utc::now();
    }

    /// Roll back a pending booking whose debit failed
    pub fn fail_payment(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.payment.status = PaymentStatus::Failed;
        self.updated_at = Utc::now();
    }

    /// Cancel with refund
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.payment.status = PaymentStatus::Refunded;
        self.updated_at = Utc::now();
    }

    /// Charging session started
    pub fn start(&mut self) {
        self.status = BookingStatus::Active;
        self.updated_at = Utc::now();
    }

    /// Charging session finished; without metering the actual cost falls
    /// back to the quote.
    pub fn complete(&mut self) {
        self.status = BookingStatus::Completed;
        if self.actual_cost == 0 {
            self.actual_cost = self.estimated_cost;
        }
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────
