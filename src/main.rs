use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cashbook::config::{Config, LogFormat};
use cashbook::modules::{
    self,
    categories::{CategoryService, MySqlCategoryRepository},
    dashboard::SummaryService,
    transactions::{MySqlTransactionRepository, TransactionService},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    init_tracing(config.app.log_format);

    tracing::info!("Starting Cashbook");
    tracing::info!(env = %config.app.env, "Environment");
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        min_connections = config.database.min_connections,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    let transaction_repo = Arc::new(MySqlTransactionRepository::new(db_pool.clone()));
    let category_repo = Arc::new(MySqlCategoryRepository::new(db_pool));

    let transaction_service = web::Data::new(TransactionService::new(
        transaction_repo.clone(),
        config.app.installment_interval_days,
    ));
    let summary_service = web::Data::new(SummaryService::new(transaction_repo));
    let category_service = web::Data::new(CategoryService::new(category_repo));

    let allowed_origin = config.app.cors_allowed_origin.clone();

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(TracingLogger::default())
            .app_data(transaction_service.clone())
            .app_data(summary_service.clone())
            .app_data(category_service.clone())
            .service(web::scope("/api").configure(modules::configure))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cashbook=debug,actix_web=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"])
        .allow_any_header()
        .max_age(86400)
}
