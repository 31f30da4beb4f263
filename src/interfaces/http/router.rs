//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AdminService, BookingService, ReviewService, StationService, WalletService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    admin, auth, bookings, health, metrics, reviews, stations, wallet,
};

/// Everything the router needs, wired once in `main`.
pub struct ApiContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub wallet: Arc<WalletService>,
    pub bookings: Arc<BookingService>,
    pub stations: Arc<StationService>,
    pub reviews: Arc<ReviewService>,
    pub admin: Arc<AdminService>,
    pub jwt_config: JwtConfig,
    pub prometheus_handle: PrometheusHandle,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Metrics
        metrics::handlers::metrics,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_current_account,
        // Stations
        stations::handlers::list_stations,
        stations::handlers::get_station,
        stations::handlers::create_station,
        stations::handlers::update_station,
        stations::handlers::update_station_status,
        stations::handlers::list_my_stations,
        // Bookings
        bookings::handlers::create_booking,
        bookings::handlers::list_my_bookings,
        bookings::handlers::list_station_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::start_booking,
        bookings::handlers::complete_booking,
        // Wallet
        wallet::handlers::get_wallet,
        wallet::handlers::topup,
        wallet::handlers::pay,
        wallet::handlers::list_transactions,
        // Reviews
        reviews::handlers::create_review,
        reviews::handlers::list_station_reviews,
        // Admin
        admin::handlers::dashboard,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginationParams,
            PaginatedResponse<bookings::dto::BookingDto>,
            PaginatedResponse<stations::dto::StationDto>,
            // Auth
            auth::dto::RegisterRequest,
            auth::dto::LoginRequest,
            auth::dto::LoginResponse,
            auth::dto::AccountInfo,
            // Stations
            stations::dto::ChargerSpecDto,
            stations::dto::LocationDto,
            stations::dto::CreateStationRequest,
            stations::dto::UpdateStationRequest,
            stations::dto::UpdateStationStatusRequest,
            stations::dto::RatingDto,
            stations::dto::StationDto,
            // Bookings
            bookings::dto::TimeSlotRequest,
            bookings::dto::VehicleInfoRequest,
            bookings::dto::CreateBookingRequest,
            bookings::dto::TimeSlotDto,
            bookings::dto::VehicleInfoDto,
            bookings::dto::PaymentDto,
            bookings::dto::BookingDto,
            // Wallet
            wallet::dto::TransactionDto,
            wallet::dto::WalletDto,
            wallet::dto::TopupRequest,
            wallet::dto::TopupResponse,
            wallet::dto::PayRequest,
            wallet::dto::PayResponse,
            wallet::dto::TransactionPage,
            // Reviews
            reviews::dto::CategoryRatingsDto,
            reviews::dto::CreateReviewRequest,
            reviews::dto::ReviewDto,
            reviews::dto::RatingBucketDto,
            reviews::dto::StationReviewsDto,
            // Admin
            admin::dto::DashboardStatsDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Metrics", description = "Prometheus metrics"),
        (name = "Authentication", description = "Account registration and login (JWT)"),
        (name = "Stations", description = "Charging station catalog and provider management"),
        (name = "Bookings", description = "Charging slot reservations with wallet settlement"),
        (name = "Wallet", description = "Stored-value wallet: top-up, payments, ledger"),
        (name = "Reviews", description = "Post-booking station reviews and rating aggregates"),
        (name = "Admin", description = "Aggregate platform metrics"),
    ),
    info(
        title = "ChargeHub Marketplace API",
        version = "1.0.0",
        description = "REST API for the EV-charging marketplace booking and wallet core",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState {
        repos: ctx.repos.clone(),
        wallet: ctx.wallet.clone(),
        jwt_config: ctx.jwt_config.clone(),
    };
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .merge(
            Router::new()
                .route("/me", get(auth::handlers::get_current_account))
                .route_layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(auth_handler_state);

    // ── Stations (public reads, guarded writes) ────────────────
    let station_state = stations::StationAppState {
        stations: ctx.stations.clone(),
    };
    let station_routes = Router::new()
        .route("/", get(stations::handlers::list_stations))
        .route("/{station_id}", get(stations::handlers::get_station))
        .merge(
            Router::new()
                .route("/", post(stations::handlers::create_station))
                .route("/mine", get(stations::handlers::list_my_stations))
                .route("/{station_id}", put(stations::handlers::update_station))
                .route(
                    "/{station_id}/status",
                    put(stations::handlers::update_station_status),
                )
                .route_layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(station_state);

    // ── Bookings (all protected) ───────────────────────────────
    let booking_state = bookings::BookingAppState {
        bookings: ctx.bookings.clone(),
    };
    let booking_routes = Router::new()
        .route(
            "/",
            post(bookings::handlers::create_booking).get(bookings::handlers::list_my_bookings),
        )
        .route(
            "/station/{station_id}",
            get(bookings::handlers::list_station_bookings),
        )
        .route("/{booking_id}", get(bookings::handlers::get_booking))
        .route("/{booking_id}/cancel", put(bookings::handlers::cancel_booking))
        .route("/{booking_id}/start", put(bookings::handlers::start_booking))
        .route(
            "/{booking_id}/complete",
            put(bookings::handlers::complete_booking),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(booking_state);

    // ── Wallet (all protected) ─────────────────────────────────
    let wallet_state = wallet::WalletAppState {
        wallet: ctx.wallet.clone(),
    };
    let wallet_routes = Router::new()
        .route("/", get(wallet::handlers::get_wallet))
        .route("/topup", post(wallet::handlers::topup))
        .route("/pay", post(wallet::handlers::pay))
        .route("/transactions", get(wallet::handlers::list_transactions))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(wallet_state);

    // ── Reviews (guarded create, public listing) ───────────────
    let review_state = reviews::ReviewAppState {
        reviews: ctx.reviews.clone(),
    };
    let review_routes = Router::new()
        .route(
            "/{station_id}",
            get(reviews::handlers::list_station_reviews),
        )
        .merge(
            Router::new()
                .route("/", post(reviews::handlers::create_review))
                .route_layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(review_state);

    // ── Admin (protected; role enforced in the service) ────────
    let admin_state = admin::AdminAppState {
        admin: ctx.admin.clone(),
    };
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::handlers::dashboard))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(admin_state);

    // ── Metrics ────────────────────────────────────────────────
    let metrics_state = metrics::MetricsState {
        handle: ctx.prometheus_handle,
    };
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::handlers::metrics))
        .with_state(metrics_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .route("/health", get(health::handlers::health_check))
        .merge(metrics_routes)
        // Resources
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/stations", station_routes)
        .nest("/api/v1/bookings", booking_routes)
        .nest("/api/v1/wallet", wallet_routes)
        .nest("/api/v1/reviews", review_routes)
        .nest("/api/v1/admin", admin_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
