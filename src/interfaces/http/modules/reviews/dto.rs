//! Review DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::review::{CategoryRatings, Review};

/// Optional per-category sub-ratings, each in [1, 5]
#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoryRatingsDto {
    #[validate(range(min = 1, max = 5))]
    pub charging_speed: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub accessibility: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub cleanliness: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub customer_service: Option<i32>,
}

impl CategoryRatingsDto {
    pub fn to_domain(self) -> CategoryRatings {
        CategoryRatings {
            charging_speed: self.charging_speed,
            accessibility: self.accessibility,
            cleanliness: self.cleanliness,
            customer_service: self.customer_service,
        }
    }

    pub fn from_domain(c: &CategoryRatings) -> Self {
        Self {
            charging_speed: c.charging_speed,
            accessibility: c.accessibility,
            cleanliness: c.cleanliness,
            customer_service: c.customer_service,
        }
    }
}

/// Request to review a completed booking
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1))]
    pub station_id: String,
    #[validate(length(min = 1))]
    pub booking_id: String,
    /// Overall rating in [1, 5]
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1))]
    pub comment: String,
    #[validate(nested)]
    pub categories: Option<CategoryRatingsDto>,
}

/// Query params for the station review listing
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ReviewFilter {
    /// Keep only reviews with this exact star rating
    pub rating: Option<i32>,
}

/// Review details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub booking_id: String,
    pub rating: i32,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRatingsDto>,
    pub created_at: String,
}

impl ReviewDto {
    pub fn from_domain(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            station_id: r.station_id,
            booking_id: r.booking_id,
            rating: r.rating,
            comment: r.comment,
            categories: r.categories.as_ref().map(CategoryRatingsDto::from_domain),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Count of reviews carrying one star value
#[derive(Debug, Serialize, ToSchema)]
pub struct RatingBucketDto {
    pub rating: i32,
    pub count: u64,
}

/// One page of a station's reviews plus its rating distribution
#[derive(Debug, Serialize, ToSchema)]
pub struct StationReviewsDto {
    pub reviews: Vec<ReviewDto>,
    pub rating_distribution: Vec<RatingBucketDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}
