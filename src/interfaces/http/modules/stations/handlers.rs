//! Station API handlers
//!
//! Catalog reads are public; mutations go through the provider/admin guard
//! in the station service.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::{NewStation, StationService, StationUpdate};
use crate::domain::station::{ChargerSpec, PriceUnit, StationStatus};
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for station handlers.
#[derive(Clone)]
pub struct StationAppState {
    pub stations: Arc<StationService>,
}

fn parse_specs<T>(
    specs: &[ChargerSpecDto],
) -> Result<Vec<ChargerSpec>, (StatusCode, Json<ApiResponse<T>>)> {
    specs
        .iter()
        .map(|dto| {
            dto.to_domain().ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!(
                        "invalid charger type '{}'",
                        dto.charger_type
                    ))),
                )
            })
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(StationFilter, PaginationParams),
    responses(
        (status = 200, description = "Station catalog, newest first", body = PaginatedResponse<StationDto>)
    )
)]
pub async fn list_stations(
    State(state): State<StationAppState>,
    Query(filter): Query<StationFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<StationDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    // The public catalog hides inactive stations unless asked otherwise.
    let status = match filter.status.as_deref() {
        None => Some(StationStatus::Active),
        Some("any") => None,
        Some(raw) => Some(StationStatus::from_str(raw)),
    };

    let (stations, total) = state
        .stations
        .list(
            status,
            filter.city.as_deref(),
            pagination.page,
            pagination.limit,
        )
        .await
        .map_err(error_response)?;

    let items = stations.into_iter().map(StationDto::from_domain).collect();
    Ok(Json(PaginatedResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    params(("station_id" = String, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(station_id): Path<String>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    let station = state
        .stations
        .get(&station_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station listed", body = ApiResponse<StationDto>),
        (status = 403, description = "Caller is not a provider")
    )
)]
pub async fn create_station(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationDto>>), (StatusCode, Json<ApiResponse<StationDto>>)>
{
    let charger_types = parse_specs(&request.charger_types)?;

    let station = state
        .stations
        .create(
            &user.requester(),
            NewStation {
                name: request.name,
                description: request.description,
                location: request.location.to_domain(),
                charger_types,
                price: request.price,
                price_unit: request
                    .price_unit
                    .as_deref()
                    .map(PriceUnit::from_str)
                    .unwrap_or_default(),
            },
        )
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StationDto::from_domain(station))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{station_id}",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("station_id" = String, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_station(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(station_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    let charger_types = match &request.charger_types {
        Some(specs) => Some(parse_specs(specs)?),
        None => None,
    };

    let station = state
        .stations
        .update(
            &user.requester(),
            &station_id,
            StationUpdate {
                name: request.name,
                description: request.description,
                charger_types,
                price: request.price,
                price_unit: request.price_unit.as_deref().map(PriceUnit::from_str),
                status: request.status.as_deref().map(StationStatus::from_str),
            },
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{station_id}/status",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("station_id" = String, Path, description = "Station ID")),
    request_body = UpdateStationStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<StationDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_station_status(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(station_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStationStatusRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    let station = state
        .stations
        .set_status(
            &user.requester(),
            &station_id,
            StationStatus::from_str(&request.status),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(StationDto::from_domain(station))))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/mine",
    tag = "Stations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stations owned by the caller", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_my_stations(
    State(state): State<StationAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<StationDto>>>, (StatusCode, Json<ApiResponse<Vec<StationDto>>>)> {
    let stations = state
        .stations
        .list_for_provider(&user.account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(
        stations.into_iter().map(StationDto::from_domain).collect(),
    )))
}
