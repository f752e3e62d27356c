// HTTP handlers for category endpoints
//
// Endpoints:
// - GET    /categories
// - POST   /categories
// - GET    /categories/{id}
// - PUT    /categories/{id}
// - DELETE /categories/{id}

use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::modules::categories::{models::CategoryRequest, services::CategoryService};

/// GET /categories
pub async fn list_categories(service: web::Data<CategoryService>) -> Result<HttpResponse> {
    let categories = service.get_all().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /categories/{id}
pub async fn get_category(
    path: web::Path<i64>,
    service: web::Data<CategoryService>,
) -> Result<HttpResponse> {
    let category = service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// POST /categories
///
/// # Returns
/// - 201: Category created
/// - 400: Missing name or duplicate name
pub async fn create_category(
    request: web::Json<CategoryRequest>,
    service: web::Data<CategoryService>,
) -> Result<HttpResponse> {
    let category = service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

/// PUT /categories/{id}
pub async fn update_category(
    path: web::Path<i64>,
    request: web::Json<CategoryRequest>,
    service: web::Data<CategoryService>,
) -> Result<HttpResponse> {
    let category = service
        .update(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    path: web::Path<i64>,
    service: web::Data<CategoryService>,
) -> Result<HttpResponse> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "category deleted" })))
}

/// Configure category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category)),
    );
}
