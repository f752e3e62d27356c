// HTTP handlers for transaction endpoints
//
// Endpoints:
// - GET    /transactions
// - POST   /transactions
// - GET    /transactions/{id}
// - PUT    /transactions/{id}
// - DELETE /transactions/{id}
// - POST   /transactions/{id}/installments/{installment}/pay

use actix_web::{web, HttpResponse};

use crate::core::Result;
use crate::modules::transactions::{models::TransactionRequest, services::TransactionService};

/// GET /transactions
pub async fn list_transactions(service: web::Data<TransactionService>) -> Result<HttpResponse> {
    let transactions = service.get_all().await?;
    Ok(HttpResponse::Ok().json(transactions))
}

/// GET /transactions/{id}
pub async fn get_transaction(
    path: web::Path<i64>,
    service: web::Data<TransactionService>,
) -> Result<HttpResponse> {
    let transaction = service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

/// POST /transactions
///
/// # Returns
/// - 201: Transaction created, re-read with category and installments
/// - 400: Validation failure
pub async fn create_transaction(
    request: web::Json<TransactionRequest>,
    service: web::Data<TransactionService>,
) -> Result<HttpResponse> {
    let created = service.create(request.into_inner()).await?;
    let transaction = service.get_by_id(created.id).await?;
    Ok(HttpResponse::Created().json(transaction))
}

/// PUT /transactions/{id}
pub async fn update_transaction(
    path: web::Path<i64>,
    request: web::Json<TransactionRequest>,
    service: web::Data<TransactionService>,
) -> Result<HttpResponse> {
    let transaction = service
        .update(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

/// DELETE /transactions/{id}
pub async fn delete_transaction(
    path: web::Path<i64>,
    service: web::Data<TransactionService>,
) -> Result<HttpResponse> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "transaction deleted" })))
}

/// POST /transactions/{id}/installments/{installment}/pay
pub async fn pay_installment(
    path: web::Path<(i64, i32)>,
    service: web::Data<TransactionService>,
) -> Result<HttpResponse> {
    let (transaction_id, installment_number) = path.into_inner();
    service
        .pay_installment(transaction_id, installment_number)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "installment paid" })))
}

/// Configure transaction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("", web::get().to(list_transactions))
            .route("", web::post().to(create_transaction))
            .route("/{id}", web::get().to(get_transaction))
            .route("/{id}", web::put().to(update_transaction))
            .route("/{id}", web::delete().to(delete_transaction))
            .route(
                "/{id}/installments/{installment}/pay",
                web::post().to(pay_installment),
            ),
    );
}
