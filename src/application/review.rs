//! Review service and station rating aggregation
//!
//! A review may only be left once per completed booking, by the user who
//! made the booking. Every accepted review triggers a full recomputation
//! of the station's rating aggregate from the review set; the aggregate is
//! a cache, never incremented in place, so re-running it is always safe.

use std::sync::Arc;

use tracing::info;

use crate::domain::booking::BookingStatus;
use crate::domain::review::{rating_distribution, CategoryRatings, Review};
use crate::domain::station::Rating;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

use super::paginate;

/// Parameters for a new review
#[derive(Debug, Clone)]
pub struct NewReview {
    pub station_id: String,
    pub booking_id: String,
    pub rating: i32,
    pub comment: String,
    pub categories: Option<CategoryRatings>,
}

/// Station reviews with the distribution of all ratings
#[derive(Debug)]
pub struct ReviewListing {
    pub reviews: Vec<Review>,
    pub total: u64,
    /// (star, count) for stars 1..=5 over the whole station
    pub distribution: Vec<(i32, u64)>,
}

/// Service for review operations
pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a review for a completed booking and refresh the station's
    /// rating aggregate.
    pub async fn create(&self, user_id: &str, request: NewReview) -> DomainResult<Review> {
        let booking = self.repos.bookings().find_by_id(&request.booking_id).await?;

        // The caller learns nothing about other users' bookings: wrong
        // owner, wrong status and missing booking all answer the same.
        let Some(booking) = booking else {
            return Err(DomainError::BookingNotEligible);
        };
        if booking.user_id != user_id || booking.status != BookingStatus::Completed {
            return Err(DomainError::BookingNotEligible);
        }
        if booking.station_id != request.station_id {
            return Err(DomainError::Validation(
                "booking does not belong to this station".to_string(),
            ));
        }

        let existing = self
            .repos
            .reviews()
            .find_by_user_and_booking(user_id, &request.booking_id)
            .await?;
        if existing.is_some() {
            return Err(DomainError::DuplicateReview);
        }

        let review = Review::new(
            user_id,
            &request.station_id,
            &request.booking_id,
            request.rating,
            request.comment,
            request.categories,
        );
        review.validate()?;
        self.repos.reviews().save(review.clone()).await?;

        let rating = self.recompute_station_rating(&request.station_id).await?;
        info!(
            station_id = %request.station_id,
            review_id = %review.id,
            average = rating.average,
            count = rating.count,
            "Review created, station rating recomputed"
        );
        Ok(review)
    }

    /// Recompute a station's rating aggregate from its full review set and
    /// persist it. Idempotent.
    pub async fn recompute_station_rating(&self, station_id: &str) -> DomainResult<Rating> {
        let reviews = self.repos.reviews().find_for_station(station_id).await?;
        let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
        let rating = Rating::from_ratings(&ratings);

        self.repos
            .stations()
            .update_rating(station_id, rating.average, rating.count)
            .await?;
        Ok(rating)
    }

    /// Newest-first page of a station's reviews plus the station-wide
    /// rating distribution.
    pub async fn list_for_station(
        &self,
        station_id: &str,
        rating: Option<i32>,
        page: u32,
        limit: u32,
    ) -> DomainResult<ReviewListing> {
        let mut reviews = self.repos.reviews().find_for_station(station_id).await?;
        let distribution = rating_distribution(&reviews);

        if let Some(rating) = rating {
            reviews.retain(|r| r.rating == rating);
        }
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (reviews, total) = paginate(reviews, page, limit);
        Ok(ReviewListing {
            reviews,
            total,
            distribution,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::booking::{Booking, TimeSlot, VehicleInfo};
    use crate::domain::station::{
        ChargerSpec, ChargerType, Location, PriceUnit, Station, StationStatus,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<InMemoryRepositoryProvider>,
        reviews: ReviewService,
    }

    fn fixture() -> Fixture {
        let repos: Arc<InMemoryRepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let reviews = ReviewService::new(repos.clone());
        Fixture { repos, reviews }
    }

    async fn seed_station(fx: &Fixture, id: &str) {
        let now = Utc::now();
        let station = Station {
            id: id.into(),
            provider_id: "prov-1".into(),
            name: "GreenVolt Plaza".into(),
            description: String::new(),
            location: Location {
                address: String::new(),
                city: String::new(),
                state: String::new(),
                pincode: String::new(),
                latitude: 0.0,
                longitude: 0.0,
            },
            charger_types: vec![ChargerSpec {
                charger_type: ChargerType::Ac,
                power_kw: 7.4,
                port_count: 1,
            }],
            price: 2500,
            price_unit: PriceUnit::PerKwh,
            status: StationStatus::Active,
            rating: Default::default(),
            created_at: now,
            updated_at: now,
        };
        fx.repos.stations().save(station).await.unwrap();
    }

    async fn seed_completed_booking(fx: &Fixture, user_id: &str, station_id: &str) -> Booking {
        let start = Utc::now() - Duration::hours(2);
        let mut booking = Booking::new(
            user_id,
            station_id,
            ChargerType::Ac,
            TimeSlot::new(start, start + Duration::hours(1)),
            VehicleInfo {
                make: "VW".into(),
                model: "ID.4".into(),
                battery_capacity_kwh: 77.0,
                current_charge_pct: 15,
                target_charge_pct: 85,
            },
            300,
        );
        booking.confirm();
        booking.start();
        booking.complete();
        fx.repos.bookings().save(booking.clone()).await.unwrap();
        booking
    }

    fn review_request(station_id: &str, booking_id: &str, rating: i32) -> NewReview {
        NewReview {
            station_id: station_id.into(),
            booking_id: booking_id.into(),
            rating,
            comment: "Fast charger, easy parking".into(),
            categories: None,
        }
    }

    #[tokio::test]
    async fn review_on_completed_booking_updates_station_rating() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        let booking = seed_completed_booking(&fx, "user-1", "st-1").await;

        fx.reviews
            .create("user-1", review_request("st-1", &booking.id, 5))
            .await
            .unwrap();

        let station = fx.repos.stations().find_by_id("st-1").await.unwrap().unwrap();
        assert_eq!(station.rating.average, 5.0);
        assert_eq!(station.rating.count, 1);
    }

    #[tokio::test]
    async fn second_review_for_same_booking_is_rejected() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        let booking = seed_completed_booking(&fx, "user-1", "st-1").await;

        fx.reviews
            .create("user-1", review_request("st-1", &booking.id, 5))
            .await
            .unwrap();
        let err = fx
            .reviews
            .create("user-1", review_request("st-1", &booking.id, 4))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReview));

        let station = fx.repos.stations().find_by_id("st-1").await.unwrap().unwrap();
        assert_eq!(station.rating.count, 1);
    }

    #[tokio::test]
    async fn non_completed_or_foreign_booking_is_not_eligible() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;

        // Confirmed but not completed
        let start = Utc::now() + Duration::hours(2);
        let mut confirmed = Booking::new(
            "user-1",
            "st-1",
            ChargerType::Ac,
            TimeSlot::new(start, start + Duration::hours(1)),
            VehicleInfo {
                make: "VW".into(),
                model: "ID.4".into(),
                battery_capacity_kwh: 77.0,
                current_charge_pct: 15,
                target_charge_pct: 85,
            },
            300,
        );
        confirmed.confirm();
        fx.repos.bookings().save(confirmed.clone()).await.unwrap();

        let err = fx
            .reviews
            .create("user-1", review_request("st-1", &confirmed.id, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BookingNotEligible));

        // Someone else's completed booking
        let booking = seed_completed_booking(&fx, "user-1", "st-1").await;
        let err = fx
            .reviews
            .create("user-2", review_request("st-1", &booking.id, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BookingNotEligible));

        // Missing booking
        let err = fx
            .reviews
            .create("user-1", review_request("st-1", "ghost", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BookingNotEligible));
    }

    #[tokio::test]
    async fn station_mismatch_is_a_validation_error() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        seed_station(&fx, "st-2").await;
        let booking = seed_completed_booking(&fx, "user-1", "st-1").await;

        let err = fx
            .reviews
            .create("user-1", review_request("st-2", &booking.id, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn aggregate_is_mean_rounded_half_up() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;

        for (user, rating) in [("user-1", 4), ("user-2", 5), ("user-3", 5)] {
            let booking = seed_completed_booking(&fx, user, "st-1").await;
            fx.reviews
                .create(user, review_request("st-1", &booking.id, rating))
                .await
                .unwrap();
        }

        let station = fx.repos.stations().find_by_id("st-1").await.unwrap().unwrap();
        // (4 + 5 + 5) / 3 = 4.666… → 4.7
        assert_eq!(station.rating.average, 4.7);
        assert_eq!(station.rating.count, 3);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;
        let booking = seed_completed_booking(&fx, "user-1", "st-1").await;
        fx.reviews
            .create("user-1", review_request("st-1", &booking.id, 4))
            .await
            .unwrap();

        let first = fx.reviews.recompute_station_rating("st-1").await.unwrap();
        let second = fx.reviews.recompute_station_rating("st-1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn listing_filters_and_reports_distribution() {
        let fx = fixture();
        seed_station(&fx, "st-1").await;

        for (user, rating) in [("user-1", 5), ("user-2", 5), ("user-3", 3)] {
            let booking = seed_completed_booking(&fx, user, "st-1").await;
            fx.reviews
                .create(user, review_request("st-1", &booking.id, rating))
                .await
                .unwrap();
        }

        let listing = fx.reviews.list_for_station("st-1", Some(5), 1, 50).await.unwrap();
        assert_eq!(listing.total, 2);
        assert!(listing.reviews.iter().all(|r| r.rating == 5));
        // Distribution covers the unfiltered set.
        assert_eq!(listing.distribution, vec![(1, 0), (2, 0), (3, 1), (4, 0), (5, 2)]);
    }
}
