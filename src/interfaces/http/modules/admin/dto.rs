//! Admin DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::application::DashboardStats;

/// Aggregate platform metrics
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStatsDto {
    pub total_users: u64,
    pub total_stations: u64,
    pub total_bookings: u64,
    pub active_bookings: u64,
    /// Settled booking payments in minor currency units
    pub total_revenue: i64,
}

impl DashboardStatsDto {
    pub fn from_domain(s: DashboardStats) -> Self {
        Self {
            total_users: s.total_users,
            total_stations: s.total_stations,
            total_bookings: s.total_bookings,
            active_bookings: s.active_bookings,
            total_revenue: s.total_revenue,
        }
    }
}
