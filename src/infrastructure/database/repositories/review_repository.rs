//! SeaORM implementation of ReviewRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::review::{CategoryRatings, Review, ReviewRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::review;

use super::db_err;

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: review::Model) -> DomainResult<Review> {
    let categories: Option<CategoryRatings> = m
        .categories
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| DomainError::Storage(format!("corrupt categories for {}: {}", m.id, e)))?;

    Ok(Review {
        id: m.id,
        user_id: m.user_id,
        station_id: m.station_id,
        booking_id: m.booking_id,
        rating: m.rating,
        comment: m.comment,
        categories,
        created_at: m.created_at,
    })
}

fn to_active_model(r: Review) -> DomainResult<review::ActiveModel> {
    let categories = r
        .categories
        .map(|c| serde_json::to_string(&c))
        .transpose()
        .map_err(|e| DomainError::Storage(format!("cannot encode categories: {}", e)))?;

    Ok(review::ActiveModel {
        id: Set(r.id),
        user_id: Set(r.user_id),
        station_id: Set(r.station_id),
        booking_id: Set(r.booking_id),
        rating: Set(r.rating),
        comment: Set(r.comment),
        categories: Set(categories),
        created_at: Set(r.created_at),
    })
}

// ── ReviewRepository impl ───────────────────────────────────────

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn save(&self, r: Review) -> DomainResult<()> {
        to_active_model(r)?
            .insert(&self.db)
            .await
            .map_err(|e| match db_err(e) {
                // The (user, booking) unique index caught a second review.
                DomainError::Conflict(_) => DomainError::DuplicateReview,
                other => other,
            })?;
        Ok(())
    }

    async fn find_by_user_and_booking(
        &self,
        user_id: &str,
        booking_id: &str,
    ) -> DomainResult<Option<Review>> {
        let model = review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_for_station(&self, station_id: &str) -> DomainResult<Vec<Review>> {
        let models = review::Entity::find()
            .filter(review::Column::StationId.eq(station_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
