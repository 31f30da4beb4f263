//!
//! EV-charging marketplace service: booking, wallet settlement, reviews.
//! Reads configuration from TOML file (~/.config/chargehub/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use chargehub::application::{
    AdminService, AvailabilityService, BookingPolicy, BookingService, ReviewService,
    StationService, WalletService,
};
use chargehub::domain::account::{Account, AccountRole};
use chargehub::domain::RepositoryProvider;
use chargehub::infrastructure::crypto::jwt::JwtConfig;
use chargehub::infrastructure::crypto::password::hash_password;
use chargehub::infrastructure::database::migrator::Migrator;
use chargehub::{
    create_api_router, default_config_path, init_database, ApiContext, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("CHARGEHUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting ChargeHub marketplace service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let wallet = Arc::new(WalletService::new(repos.clone()));
    let availability = Arc::new(AvailabilityService::new(
        repos.clone(),
        app_cfg.booking.slot_capacity,
    ));
    let bookings = Arc::new(BookingService::new(
        repos.clone(),
        wallet.clone(),
        availability,
        BookingPolicy {
            cancellation_cutoff_minutes: app_cfg.booking.cancellation_cutoff_minutes,
        },
    ));
    let stations = Arc::new(StationService::new(repos.clone()));
    let reviews = Arc::new(ReviewService::new(repos.clone()));
    let admin = Arc::new(AdminService::new(repos.clone()));

    // Create default admin account if no accounts exist
    create_default_admin(&repos, &wallet, &app_cfg).await;

    let jwt_config = JwtConfig::from_security(&app_cfg.security);
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(ApiContext {
        repos,
        wallet,
        bookings,
        stations,
        reviews,
        admin,
        jwt_config,
        prometheus_handle,
    });

    let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("ChargeHub shutdown complete");
    Ok(())
}

/// Create a bootstrap admin account if the store is empty
async fn create_default_admin(
    repos: &Arc<dyn RepositoryProvider>,
    wallet: &Arc<WalletService>,
    app_cfg: &AppConfig,
) {
    let accounts = match repos.accounts().count().await {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to count accounts: {}", e);
            return;
        }
    };
    if accounts > 0 {
        return;
    }

    info!("Creating default admin account...");
    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = Account::new(
        app_cfg.admin.name.clone(),
        app_cfg.admin.email.clone(),
        password_hash,
        app_cfg.admin.phone.clone(),
        AccountRole::Admin,
    );
    let admin_id = admin.id.clone();
    let admin_email = admin.email.clone();

    match repos.accounts().save(admin).await {
        Ok(()) => {
            if let Err(e) = wallet.get_or_create(&admin_id).await {
                warn!("Failed to create admin wallet: {}", e);
            }
            info!("Default admin created: {}", admin_email);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin account: {}", e);
        }
    }
}
