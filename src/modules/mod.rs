pub mod categories;
pub mod dashboard;
pub mod health;
pub mod installments;
pub mod transactions;

use actix_web::web;

use crate::core::AppError;

/// Register every API route; mounted under `/api` by the server
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed bodies get the same JSON error shape as validation failures
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(err.to_string()).into());

    cfg.app_data(json_config)
        .configure(health::controllers::configure)
        .configure(transactions::controllers::configure)
        .configure(categories::controllers::configure)
        .configure(dashboard::controllers::configure);
}
