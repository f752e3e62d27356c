use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::{AppError, Result};
use crate::modules::dashboard::services::SummaryService;

/// Query parameters for the summary endpoint
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// RFC 3339 instant selecting the month; defaults to now
    #[serde(default)]
    pub as_of: Option<String>,
}

/// GET /dashboard/summary
///
/// # Returns
/// - 200: total balance, monthly income/expense, per-category expenses
/// - 400: Unparseable `as_of`
pub async fn get_summary(
    query: web::Query<SummaryQuery>,
    service: web::Data<SummaryService>,
) -> Result<HttpResponse> {
    let as_of = match query.as_of.as_deref() {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::validation(format!("invalid as_of: {}", raw)))?,
        None => Utc::now(),
    };

    let summary = service.get_summary(as_of).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/summary", web::get().to(get_summary)));
}
