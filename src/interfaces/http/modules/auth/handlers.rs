//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::warn;

use super::dto::{AccountInfo, LoginRequest, LoginResponse, RegisterRequest};
use crate::application::WalletService;
use crate::domain::account::{Account, AccountRole};
use crate::domain::{DomainError, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub wallet: Arc<WalletService>,
    pub jwt_config: JwtConfig,
}

fn account_info(account: &Account) -> AccountInfo {
    AccountInfo {
        id: account.id.clone(),
        name: account.name.clone(),
        email: account.email.clone(),
        phone: account.phone.clone(),
        role: account.role.as_str().to_string(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<LoginResponse>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), (StatusCode, Json<ApiResponse<LoginResponse>>)>
{
    let role = match request.role.as_deref() {
        None | Some("user") => AccountRole::User,
        Some("provider") => AccountRole::Provider,
        Some(other) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("invalid role '{}'", other))),
            ));
        }
    };

    let password_hash = hash_password(&request.password).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let account = Account::new(request.name, request.email, password_hash, request.phone, role);
    state
        .repos
        .accounts()
        .save(account.clone())
        .await
        .map_err(error_response)?;

    // Seed the wallet eagerly; the ledger re-creates it lazily if this
    // ever fails.
    if let Err(e) = state.wallet.get_or_create(&account.id).await {
        warn!(account_id = %account.id, error = %e, "Wallet creation at registration failed");
    }

    let token = create_token(
        &account.id,
        &account.name,
        account.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        account: account_info(&account),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let account = state
        .repos
        .accounts()
        .find_by_email(&request.email)
        .await
        .map_err(error_response)?;

    let Some(account) = account else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    };

    if !account.is_active {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Account is disabled")),
        ));
    }

    let password_valid = verify_password(&request.password, &account.password_hash).unwrap_or(false);
    if !password_valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    }

    let token = create_token(
        &account.id,
        &account.name,
        account.role.as_str(),
        &state.jwt_config,
    )
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let response = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_config.expiration_hours * 3600,
        account: account_info(&account),
    };
    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account info", body = ApiResponse<AccountInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_account(
    State(state): State<AuthHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<AccountInfo>>, (StatusCode, Json<ApiResponse<AccountInfo>>)> {
    let account = state
        .repos
        .accounts()
        .find_by_id(&user.account_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(DomainError::NotFound {
                entity: "Account",
                field: "id",
                value: user.account_id.clone(),
            })
        })?;

    Ok(Json(ApiResponse::success(account_info(&account))))
}
