//! Wallet API handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use super::dto::*;
use crate::application::WalletService;
use crate::domain::wallet::TransactionKind;
use crate::interfaces::http::common::{
    error_response, ApiResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Application state for wallet handlers.
#[derive(Clone)]
pub struct WalletAppState {
    pub wallet: Arc<WalletService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/wallet",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Wallet with recent transactions", body = ApiResponse<WalletDto>)
    )
)]
pub async fn get_wallet(
    State(state): State<WalletAppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<WalletDto>>, (StatusCode, Json<ApiResponse<WalletDto>>)> {
    let wallet = state
        .wallet
        .get_or_create(&user.account_id)
        .await
        .map_err(error_response)?;
    let (transactions, _, _) = state
        .wallet
        .transactions(&user.account_id, None, 1, 50)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(WalletDto {
        id: wallet.id,
        balance: wallet.balance,
        transactions: transactions
            .into_iter()
            .map(TransactionDto::from_domain)
            .collect(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/wallet/topup",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    request_body = TopupRequest,
    responses(
        (status = 200, description = "Wallet topped up", body = ApiResponse<TopupResponse>),
        (status = 422, description = "Invalid amount")
    )
)]
pub async fn topup(
    State(state): State<WalletAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<TopupRequest>,
) -> Result<Json<ApiResponse<TopupResponse>>, (StatusCode, Json<ApiResponse<TopupResponse>>)> {
    let receipt = state
        .wallet
        .topup(
            &user.account_id,
            request.amount,
            request.payment_method.as_deref().unwrap_or("card"),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(TopupResponse {
        transaction_id: receipt.transaction_id,
        amount: receipt.amount,
        new_balance: receipt.new_balance,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/wallet/pay",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    request_body = PayRequest,
    responses(
        (status = 200, description = "Payment processed", body = ApiResponse<PayResponse>),
        (status = 400, description = "Insufficient wallet balance")
    )
)]
pub async fn pay(
    State(state): State<WalletAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<PayRequest>,
) -> Result<Json<ApiResponse<PayResponse>>, (StatusCode, Json<ApiResponse<PayResponse>>)> {
    let new_balance = state
        .wallet
        .pay(
            &user.account_id,
            request.amount,
            request.description.as_deref(),
            request.reference.as_deref(),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(PayResponse {
        amount: request.amount,
        new_balance,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/wallet/transactions",
    tag = "Wallet",
    security(("bearer_auth" = [])),
    params(TransactionFilter, PaginationParams),
    responses(
        (status = 200, description = "Ledger page, newest first", body = ApiResponse<TransactionPage>)
    )
)]
pub async fn list_transactions(
    State(state): State<WalletAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filter): Query<TransactionFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<TransactionPage>>, (StatusCode, Json<ApiResponse<TransactionPage>>)> {
    let kind = match filter.kind.as_deref() {
        None => None,
        Some(raw) => match TransactionKind::parse(raw) {
            Some(kind) => Some(kind),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("invalid kind '{}'", raw))),
                ));
            }
        },
    };

    let (transactions, total, balance) = state
        .wallet
        .transactions(&user.account_id, kind, pagination.page, pagination.limit)
        .await
        .map_err(error_response)?;

    let total_pages = ((total as f64) / (pagination.limit as f64)).ceil() as u32;
    Ok(Json(ApiResponse::success(TransactionPage {
        balance,
        transactions: transactions
            .into_iter()
            .map(TransactionDto::from_domain)
            .collect(),
        total,
        page: pagination.page,
        limit: pagination.limit,
        total_pages,
    })))
}
