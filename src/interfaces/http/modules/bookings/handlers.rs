//! Booking API handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{BookingService, NewBooking};
use crate::domain::booking::{BookingStatus, TimeSlot, VehicleInfo};
use crate::domain::station::ChargerType;
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub bookings: Arc<BookingService>,
}

fn parse_charger_type<T>(
    raw: &str,
) -> Result<ChargerType, (StatusCode, Json<ApiResponse<T>>)> {
    ChargerType::parse(raw).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("invalid charger_type '{}'", raw))),
        )
    })
}

fn parse_status_filter<T>(
    raw: Option<&str>,
) -> Result<Option<BookingStatus>, (StatusCode, Json<ApiResponse<T>>)> {
    match raw {
        None => Ok(None),
        Some(raw) => BookingStatus::parse(raw).map(Some).ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("invalid status '{}'", raw))),
            )
        }),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Slot unavailable or insufficient funds"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn create_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), (StatusCode, Json<ApiResponse<BookingDto>>)>
{
    let charger_type = parse_charger_type(&request.charger_type)?;

    let time_slot = TimeSlot {
        start: request.time_slot.start_time,
        end: request.time_slot.end_time,
        duration_minutes: request.time_slot.duration_minutes,
    };
    let vehicle = VehicleInfo {
        make: request.vehicle_info.make,
        model: request.vehicle_info.model,
        battery_capacity_kwh: request.vehicle_info.battery_capacity_kwh,
        current_charge_pct: request.vehicle_info.current_charge_pct,
        target_charge_pct: request.vehicle_info.target_charge_pct,
    };

    let booking = state
        .bookings
        .create(
            &user.account_id,
            NewBooking {
                station_id: request.station_id,
                charger_type,
                time_slot,
                vehicle,
                estimated_cost: request.estimated_cost,
            },
        )
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingDto::from_domain(booking))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(BookingFilter, PaginationParams),
    responses(
        (status = 200, description = "Caller's bookings, newest first", body = PaginatedResponse<BookingDto>)
    )
)]
pub async fn list_my_bookings(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filter): Query<BookingFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_status_filter(filter.status.as_deref())?;

    let (bookings, total) = state
        .bookings
        .list_for_user(&user.account_id, status, pagination.page, pagination.limit)
        .await
        .map_err(error_response)?;

    let items = bookings.into_iter().map(BookingDto::from_domain).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/station/{station_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("station_id" = String, Path, description = "Station ID"),
        BookingFilter,
        PaginationParams
    ),
    responses(
        (status = 200, description = "Station bookings, newest first", body = PaginatedResponse<BookingDto>),
        (status = 403, description = "Not the station's provider"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn list_station_bookings(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(station_id): Path<String>,
    Query(filter): Query<BookingFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<BookingDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let status = parse_status_filter(filter.status.as_deref())?;

    let (bookings, total) = state
        .bookings
        .list_for_station(
            &user.requester(),
            &station_id,
            status,
            pagination.page,
            pagination.limit,
        )
        .await
        .map_err(error_response)?;

    let items = bookings.into_iter().map(BookingDto::from_domain).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{booking_id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingDto>),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .get(&user.requester(), &booking_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled and refunded", body = ApiResponse<BookingDto>),
        (status = 400, description = "Too late or wrong state"),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .cancel(&user.account_id, &booking_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/start",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Charging session started", body = ApiResponse<BookingDto>),
        (status = 400, description = "Wrong state"),
        (status = 403, description = "Not a participant")
    )
)]
pub async fn start_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .start(&user.requester(), &booking_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}/complete",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("booking_id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Charging session completed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Wrong state"),
        (status = 403, description = "Not a participant")
    )
)]
pub async fn complete_booking(
    State(state): State<BookingAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingDto>>, (StatusCode, Json<ApiResponse<BookingDto>>)> {
    let booking = state
        .bookings
        .complete(&user.requester(), &booking_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(BookingDto::from_domain(booking))))
}
