//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, BookingStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking
    async fn save(&self, booking: Booking) -> DomainResult<()>;

    /// Find booking by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Update an existing booking
    async fn update(&self, booking: Booking) -> DomainResult<()>;

    /// Bookings at a station that currently occupy their slot
    /// (status pending/confirmed/active)
    async fn find_blocking_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>>;

    /// All bookings made by a user
    async fn find_for_user(&self, user_id: &str) -> DomainResult<Vec<Booking>>;

    /// All bookings at a station (any status)
    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Booking>>;

    /// All bookings (admin views)
    async fn find_all(&self) -> DomainResult<Vec<Booking>>;

    /// Total number of bookings
    async fn count(&self) -> DomainResult<u64>;

    /// Number of bookings in a given status
    async fn count_by_status(&self, status: BookingStatus) -> DomainResult<u64>;
}
