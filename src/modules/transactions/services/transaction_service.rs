use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::installments::models::InstallmentStatus;
use crate::modules::installments::services::InstallmentCalculator;
use crate::modules::transactions::{
    models::{NewTransaction, Transaction, TransactionRequest, TransactionStatus, TransactionType},
    repositories::TransactionRepository,
};

/// Upper bound on `total_installments`: one hundred years of monthly payments
pub const MAX_INSTALLMENTS: i32 = 1200;

/// Transaction lifecycle: validation, persistence and installment generation
///
/// The service holds no state between calls; the repository is the system
/// of record.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
    interval_days: i64,
}

impl TransactionService {
    /// # Arguments
    /// * `repository` - Store for transaction headers and installments
    /// * `interval_days` - Spacing between generated installment due dates
    pub fn new(repository: Arc<dyn TransactionRepository>, interval_days: i64) -> Self {
        Self {
            repository,
            interval_days,
        }
    }

    /// Create a transaction and, when installment-bearing, its installment schedule
    ///
    /// Header and installments are written in one atomic store call.
    ///
    /// # Errors
    /// * `Validation` - empty title, non-positive amount, unknown type/status,
    ///   or an installment transaction with fewer than two or more than
    ///   `MAX_INSTALLMENTS` installments
    pub async fn create(&self, request: TransactionRequest) -> Result<Transaction> {
        let transaction = validate_request(request, TransactionStatus::Pending)?;

        if transaction.is_installment && transaction.total_installments <= 1 {
            return Err(AppError::validation(
                "installment transactions need more than one installment",
            ));
        }

        let slices = if transaction.is_installment {
            InstallmentCalculator::split(
                transaction.amount_cents,
                transaction.total_installments,
                transaction.due_date,
                self.interval_days,
            )
            .map_err(|e| match e {
                AppError::InvalidArgument(msg) => AppError::Validation(msg),
                other => other,
            })?
        } else {
            Vec::new()
        };

        let created = self.repository.create(&transaction, &slices).await?;

        info!(
            transaction_id = created.id,
            transaction_type = %created.transaction_type,
            amount_cents = created.amount_cents,
            installments = created.installments.len(),
            "Transaction created"
        );

        Ok(created)
    }

    /// Overwrite header fields; the installment set is never regenerated
    ///
    /// A request without `status` keeps the stored one.
    pub async fn update(&self, id: i64, request: TransactionRequest) -> Result<Transaction> {
        ensure_valid_id(id, "transaction")?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("transaction {}", id)))?;

        let transaction = validate_request(request, current.status)?;

        let updated = self
            .repository
            .update(id, &transaction)
            .await?
            .ok_or_else(|| AppError::not_found(format!("transaction {}", id)))?;

        info!(transaction_id = id, status = %updated.status, "Transaction updated");
        Ok(self.attach_installments(updated).await)
    }

    /// Hard delete; installments go with the header
    pub async fn delete(&self, id: i64) -> Result<()> {
        ensure_valid_id(id, "transaction")?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(format!("transaction {}", id)));
        }

        info!(transaction_id = id, "Transaction deleted");
        Ok(())
    }

    /// Mark one installment paid and stamp the paid time
    ///
    /// The parent transaction's status is left untouched.
    pub async fn pay_installment(&self, transaction_id: i64, installment_number: i32) -> Result<()> {
        ensure_valid_id(transaction_id, "transaction")?;
        if installment_number <= 0 {
            return Err(AppError::validation("invalid installment number"));
        }

        let paid_at = Utc::now().naive_utc();
        let updated = self
            .repository
            .update_installment_status(
                transaction_id,
                installment_number,
                InstallmentStatus::Paid,
                Some(paid_at),
            )
            .await?;

        if !updated {
            return Err(AppError::not_found(format!(
                "installment {} of transaction {}",
                installment_number, transaction_id
            )));
        }

        info!(transaction_id, installment_number, "Installment paid");
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Transaction> {
        ensure_valid_id(id, "transaction")?;

        let transaction = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("transaction {}", id)))?;

        Ok(self.attach_installments(transaction).await)
    }

    /// All transactions, newest due date first
    pub async fn get_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.repository.find_all().await?;

        let mut attached = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            attached.push(self.attach_installments(transaction).await);
        }

        Ok(attached)
    }

    /// A failed installment lookup degrades to an empty list, never failing the read
    async fn attach_installments(&self, mut transaction: Transaction) -> Transaction {
        if !transaction.is_installment {
            return transaction;
        }

        transaction.installments = match self.repository.find_installments(transaction.id).await {
            Ok(installments) => installments,
            Err(err) => {
                warn!(
                    transaction_id = transaction.id,
                    error = %err,
                    "Installment lookup failed, returning transaction without installments"
                );
                Vec::new()
            }
        };

        transaction
    }
}

fn ensure_valid_id(id: i64, resource: &str) -> Result<()> {
    if id <= 0 {
        return Err(AppError::validation(format!("invalid {} id", resource)));
    }
    Ok(())
}

/// Checks shared by create and update; `default_status` fills an absent status
fn validate_request(
    request: TransactionRequest,
    default_status: TransactionStatus,
) -> Result<NewTransaction> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title is required"));
    }

    if request.amount_cents <= 0 {
        return Err(AppError::validation("amount must be greater than zero"));
    }

    let transaction_type: TransactionType = request.transaction_type.parse()?;

    let status: TransactionStatus = match request.status.as_deref() {
        None | Some("") => default_status,
        Some(raw) => raw.parse()?,
    };

    if let Some(category_id) = request.category_id {
        ensure_valid_id(category_id, "category")?;
    }

    let total_installments = if request.is_installment {
        if request.total_installments > MAX_INSTALLMENTS {
            return Err(AppError::validation(format!(
                "at most {} installments are allowed",
                MAX_INSTALLMENTS
            )));
        }
        request.total_installments
    } else {
        1
    };

    Ok(NewTransaction {
        title: title.to_string(),
        description: request.description,
        amount_cents: request.amount_cents,
        transaction_type,
        category_id: request.category_id,
        due_date: request.due_date,
        is_recurring: request.is_recurring,
        is_installment: request.is_installment,
        total_installments,
        status,
    })
}
