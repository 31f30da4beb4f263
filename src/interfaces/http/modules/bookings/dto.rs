//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::booking::Booking;

/// Requested reservation window (half-open interval)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TimeSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Must equal `end_time - start_time`
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration_minutes: i64,
}

/// Vehicle charge parameters
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VehicleInfoRequest {
    #[validate(length(min = 1))]
    pub make: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 0.1))]
    pub battery_capacity_kwh: f64,
    #[validate(range(min = 0, max = 100))]
    pub current_charge_pct: i32,
    #[validate(range(min = 0, max = 100))]
    pub target_charge_pct: i32,
}

/// Request to create a booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1))]
    pub station_id: String,
    /// "AC", "DC" or "Fast DC"
    pub charger_type: String,
    #[validate(nested)]
    pub time_slot: TimeSlotRequest,
    #[validate(nested)]
    pub vehicle_info: VehicleInfoRequest,
    /// Quoted cost in minor currency units
    #[validate(range(min = 1, message = "estimated_cost must be positive"))]
    pub estimated_cost: i64,
}

/// Query params for booking listings
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct BookingFilter {
    /// Filter by lifecycle status
    pub status: Option<String>,
}

/// Embedded time slot in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct TimeSlotDto {
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i64,
}

/// Embedded vehicle info in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleInfoDto {
    pub make: String,
    pub model: String,
    pub battery_capacity_kwh: f64,
    pub current_charge_pct: i32,
    pub target_charge_pct: i32,
}

/// Embedded payment sub-record in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub amount: i64,
    pub method: String,
    pub status: String,
}

/// Booking details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub charger_type: String,
    pub time_slot: TimeSlotDto,
    pub vehicle_info: VehicleInfoDto,
    pub estimated_cost: i64,
    pub actual_cost: i64,
    pub payment: PaymentDto,
    pub status: String,
    pub created_at: String,
}

impl BookingDto {
    pub fn from_domain(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            station_id: b.station_id,
            charger_type: b.charger_type.as_str().to_string(),
            time_slot: TimeSlotDto {
                start_time: b.time_slot.start.to_rfc3339(),
                end_time: b.time_slot.end.to_rfc3339(),
                duration_minutes: b.time_slot.duration_minutes,
            },
            vehicle_info: VehicleInfoDto {
                make: b.vehicle.make,
                model: b.vehicle.model,
                battery_capacity_kwh: b.vehicle.battery_capacity_kwh,
                current_charge_pct: b.vehicle.current_charge_pct,
                target_charge_pct: b.vehicle.target_charge_pct,
            },
            estimated_cost: b.estimated_cost,
            actual_cost: b.actual_cost,
            payment: PaymentDto {
                amount: b.payment.amount,
                method: b.payment.method.as_str().to_string(),
                status: b.payment.status.as_str().to_string(),
            },
            status: b.status.as_str().to_string(),
            created_at: b.created_at.to_rfc3339(),
        }
    }
}
