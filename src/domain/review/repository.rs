//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Save a new review
    async fn save(&self, review: Review) -> DomainResult<()>;

    /// The unique review a user left for a booking, if any
    async fn find_by_user_and_booking(
        &self,
        user_id: &str,
        booking_id: &str,
    ) -> DomainResult<Option<Review>>;

    /// All reviews for a station
    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Review>>;
}
