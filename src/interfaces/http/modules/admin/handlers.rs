//! Admin API handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::DashboardStatsDto;
use crate::application::AdminService;
use crate::interfaces::http::common::{error_response, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for admin handlers.
#[derive(Clone)]
pub struct AdminAppState {
    pub admin: Arc<AdminService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Aggregate platform metrics", body = ApiResponse<DashboardStatsDto>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn dashboard(
    State(state): State<AdminAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>, (StatusCode, Json<ApiResponse<DashboardStatsDto>>)>
{
    let stats = state
        .admin
        .dashboard(&user.requester())
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(DashboardStatsDto::from_domain(
        stats,
    ))))
}
