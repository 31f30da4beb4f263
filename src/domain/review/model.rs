//! Review domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Optional per-category sub-ratings, each in [1, 5]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRatings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_speed: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanliness: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_service: Option<i32>,
}

impl CategoryRatings {
    pub fn validate(&self) -> DomainResult<()> {
        for (label, value) in [
            ("charging_speed", self.charging_speed),
            ("accessibility", self.accessibility),
            ("cleanliness", self.cleanliness),
            ("customer_service", self.customer_service),
        ] {
            if let Some(v) = value {
                if !(1..=5).contains(&v) {
                    return Err(DomainError::Validation(format!(
                        "{} rating must be between 1 and 5",
                        label
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Post-booking station review; at most one per (user, booking)
#[derive(Debug, Clone)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub booking_id: String,
    /// Overall rating in [1, 5]
    pub rating: i32,
    pub comment: String,
    pub categories: Option<CategoryRatings>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user_id: impl Into<String>,
        station_id: impl Into<String>,
        booking_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
        categories: Option<CategoryRatings>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            station_id: station_id.into(),
            booking_id: booking_id.into(),
            rating,
            comment: comment.into(),
            categories,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(DomainError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        if self.comment.trim().is_empty() {
            return Err(DomainError::Validation("comment must not be empty".to_string()));
        }
        if let Some(categories) = &self.categories {
            categories.validate()?;
        }
        Ok(())
    }
}

/// Count of reviews per star value (1..=5), newest-independent
pub fn rating_distribution(reviews: &[Review]) -> Vec<(i32, u64)> {
    (1..=5)
        .map(|star| {
            let count = reviews.iter().filter(|r| r.rating == star).count() as u64;
            (star, count)
        })
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_review(rating: i32) -> Review {
        Review::new("user-1", "st-1", "bk-1", rating, "Quick and clean", None)
    }

    #[test]
    fn valid_review_passes() {
        assert!(sample_review(5).validate().is_ok());
    }

    #[test]
    fn rating_out_of_bounds_rejected() {
        assert!(sample_review(0).validate().is_err());
        assert!(sample_review(6).validate().is_err());
    }

    #[test]
    fn empty_comment_rejected() {
        let mut r = sample_review(4);
        r.comment = "   ".into();
        assert!(r.validate().is_err());
    }

    #[test]
    fn category_bounds_enforced() {
        let mut r = sample_review(4);
        r.categories = Some(CategoryRatings {
            charging_speed: Some(5),
            cleanliness: Some(0),
            ..Default::default()
        });
        assert!(r.validate().is_err());
    }

    #[test]
    fn distribution_counts_per_star() {
        let reviews = vec![sample_review(5), sample_review(5), sample_review(3)];
        let dist = rating_distribution(&reviews);
        assert_eq!(dist, vec![(1, 0), (2, 0), (3, 1), (4, 0), (5, 2)]);
    }
}
