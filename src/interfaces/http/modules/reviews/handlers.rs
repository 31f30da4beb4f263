//! Review API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{NewReview, ReviewService};
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for review handlers.
#[derive(Clone)]
pub struct ReviewAppState {
    pub reviews: Arc<ReviewService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Booking not eligible or duplicate review")
    )
)]
pub async fn create_review(
    State(state): State<ReviewAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), (StatusCode, Json<ApiResponse<ReviewDto>>)>
{
    let review = state
        .reviews
        .create(
            &user.account_id,
            NewReview {
                station_id: request.station_id,
                booking_id: request.booking_id,
                rating: request.rating,
                comment: request.comment,
                categories: request.categories.map(CategoryRatingsDto::to_domain),
            },
        )
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewDto::from_domain(review))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{station_id}",
    tag = "Reviews",
    params(
        ("station_id" = String, Path, description = "Station ID"),
        ReviewFilter,
        PaginationParams
    ),
    responses(
        (status = 200, description = "Station reviews with rating distribution", body = ApiResponse<StationReviewsDto>)
    )
)]
pub async fn list_station_reviews(
    State(state): State<ReviewAppState>,
    Path(station_id): Path<String>,
    Query(filter): Query<ReviewFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<StationReviewsDto>>, (StatusCode, Json<ApiResponse<StationReviewsDto>>)>
{
    let listing = state
        .reviews
        .list_for_station(&station_id, filter.rating, pagination.page, pagination.limit)
        .await
        .map_err(error_response)?;

    let total_pages = ((listing.total as f64) / (pagination.limit as f64)).ceil() as u32;
    Ok(Json(ApiResponse::success(StationReviewsDto {
        reviews: listing
            .reviews
            .into_iter()
            .map(ReviewDto::from_domain)
            .collect(),
        rating_distribution: listing
            .distribution
            .into_iter()
            .map(|(rating, count)| RatingBucketDto { rating, count })
            .collect(),
        total: listing.total,
        page: pagination.page,
        limit: pagination.limit,
        total_pages,
    })))
}
