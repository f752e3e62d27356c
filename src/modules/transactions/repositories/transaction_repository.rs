use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sqlx::{MySql, MySqlPool};

use crate::core::{AppError, Cents, Result};
use crate::modules::categories::models::Category;
use crate::modules::installments::models::{Installment, InstallmentSlice, InstallmentStatus};
use crate::modules::transactions::models::{NewTransaction, Transaction};

/// Storage contract for transactions and their installments
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert the header and its installments atomically.
    ///
    /// The returned transaction carries the inserted installments.
    async fn create(
        &self,
        transaction: &NewTransaction,
        installments: &[InstallmentSlice],
    ) -> Result<Transaction>;

    /// Header with its category attached, without installments
    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>>;

    /// All headers ordered by due date, newest first
    async fn find_all(&self) -> Result<Vec<Transaction>>;

    /// Installments of one transaction ordered by number
    async fn find_installments(&self, transaction_id: i64) -> Result<Vec<Installment>>;

    /// Every stored installment, ordered by transaction then number
    async fn find_all_installments(&self) -> Result<Vec<Installment>>;

    /// Overwrite the header fields; `None` when no row has this id
    async fn update(&self, id: i64, transaction: &NewTransaction) -> Result<Option<Transaction>>;

    /// Delete the header and its installments; `false` when no row has this id
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Set status and paid time of one installment; `false` when it does not exist
    async fn update_installment_status(
        &self,
        transaction_id: i64,
        installment_number: i32,
        status: InstallmentStatus,
        paid_at: Option<NaiveDateTime>,
    ) -> Result<bool>;
}

/// MySQL-backed transaction repository
pub struct MySqlTransactionRepository {
    pool: MySqlPool,
}

impl MySqlTransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_installment_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, MySql>,
        transaction_id: i64,
        slice: &InstallmentSlice,
        now: NaiveDateTime,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO transaction_installments (
                transaction_id, installment_number, amount_cents, due_date,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction_id)
        .bind(slice.installment_number)
        .bind(slice.amount_cents)
        .bind(slice.due_date)
        .bind(InstallmentStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(|e| AppError::persistence("create installment", e))?;

        Ok(result.last_insert_id() as i64)
    }
}

const SELECT_TRANSACTION: &str = r#"
    SELECT
        t.id, t.title, t.description, t.amount_cents, t.type, t.category_id,
        t.due_date, t.is_recurring, t.is_installment, t.total_installments,
        t.status, t.created_at, t.updated_at,
        c.id AS category_ref_id, c.name AS category_name,
        c.description AS category_description, c.color AS category_color,
        c.icon AS category_icon, c.created_at AS category_created_at,
        c.updated_at AS category_updated_at
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

const SELECT_INSTALLMENT: &str = r#"
    SELECT id, transaction_id, installment_number, amount_cents, due_date,
           status, paid_at, created_at, updated_at
    FROM transaction_installments
"#;

#[async_trait]
impl TransactionRepository for MySqlTransactionRepository {
    async fn create(
        &self,
        transaction: &NewTransaction,
        installments: &[InstallmentSlice],
    ) -> Result<Transaction> {
        let now = Utc::now().naive_utc();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence("start transaction", e))?;

        let id = sqlx::query(
            r#"
            INSERT INTO transactions (
                title, description, amount_cents, type, category_id, due_date,
                is_recurring, is_installment, total_installments, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.title)
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.category_id)
        .bind(transaction.due_date)
        .bind(transaction.is_recurring)
        .bind(transaction.is_installment)
        .bind(transaction.total_installments)
        .bind(transaction.status.as_str())
        .bind(now)
        .bind(now)
        .execute(tx.as_mut())
        .await
        .map_err(|e| AppError::persistence("create transaction", e))?
        .last_insert_id() as i64;

        let mut created_installments = Vec::with_capacity(installments.len());
        for slice in installments {
            let installment_id = self
                .insert_installment_with_tx(&mut tx, id, slice, now)
                .await?;

            created_installments.push(Installment {
                id: installment_id,
                transaction_id: id,
                installment_number: slice.installment_number,
                amount_cents: slice.amount_cents,
                due_date: slice.due_date,
                status: InstallmentStatus::Pending,
                paid_at: None,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persistence("commit transaction", e))?;

        Ok(Transaction {
            id,
            title: transaction.title.clone(),
            description: transaction.description.clone(),
            amount_cents: transaction.amount_cents,
            transaction_type: transaction.transaction_type,
            category_id: transaction.category_id,
            due_date: transaction.due_date,
            is_recurring: transaction.is_recurring,
            is_installment: transaction.is_installment,
            total_installments: transaction.total_installments,
            status: transaction.status,
            created_at: now,
            updated_at: now,
            category: None,
            installments: created_installments,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let query = format!("{} WHERE t.id = ?", SELECT_TRANSACTION);

        sqlx::query_as::<_, TransactionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persistence("get transaction", e))?
            .map(Transaction::try_from)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Transaction>> {
        let query = format!(
            "{} ORDER BY t.due_date DESC, t.created_at DESC",
            SELECT_TRANSACTION
        );

        sqlx::query_as::<_, TransactionRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence("get transactions", e))?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn find_installments(&self, transaction_id: i64) -> Result<Vec<Installment>> {
        let query = format!(
            "{} WHERE transaction_id = ? ORDER BY installment_number ASC",
            SELECT_INSTALLMENT
        );

        sqlx::query_as::<_, InstallmentRow>(&query)
            .bind(transaction_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence("get installments", e))?
            .into_iter()
            .map(Installment::try_from)
            .collect()
    }

    async fn find_all_installments(&self) -> Result<Vec<Installment>> {
        let query = format!(
            "{} ORDER BY transaction_id ASC, installment_number ASC",
            SELECT_INSTALLMENT
        );

        sqlx::query_as::<_, InstallmentRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::persistence("get installments", e))?
            .into_iter()
            .map(Installment::try_from)
            .collect()
    }

    async fn update(&self, id: i64, transaction: &NewTransaction) -> Result<Option<Transaction>> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET title = ?, description = ?, amount_cents = ?, type = ?, category_id = ?,
                due_date = ?, is_recurring = ?, is_installment = ?, total_installments = ?,
                status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&transaction.title)
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.category_id)
        .bind(transaction.due_date)
        .bind(transaction.is_recurring)
        .bind(transaction.is_installment)
        .bind(transaction.total_installments)
        .bind(transaction.status.as_str())
        .bind(Utc::now().naive_utc())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence("update transaction", e))?;

        // MySQL reports zero affected rows for no-op updates, so re-read instead
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence("start transaction", e))?;

        sqlx::query("DELETE FROM transaction_installments WHERE transaction_id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(|e| AppError::persistence("delete installments", e))?;

        let rows_affected = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(tx.as_mut())
            .await
            .map_err(|e| AppError::persistence("delete transaction", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| AppError::persistence("commit transaction", e))?;

        Ok(rows_affected > 0)
    }

    async fn update_installment_status(
        &self,
        transaction_id: i64,
        installment_number: i32,
        status: InstallmentStatus,
        paid_at: Option<NaiveDateTime>,
    ) -> Result<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE transaction_installments
            SET status = ?, paid_at = ?, updated_at = ?
            WHERE transaction_id = ? AND installment_number = ?
            "#,
        )
        .bind(status.as_str())
        .bind(paid_at)
        .bind(Utc::now().naive_utc())
        .bind(transaction_id)
        .bind(installment_number)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::persistence("pay installment", e))?
        .rows_affected();

        if rows_affected > 0 {
            return Ok(true);
        }

        // Same-second re-stamps change nothing and report zero rows
        let exists: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM transaction_installments WHERE transaction_id = ? AND installment_number = ?",
        )
        .bind(transaction_id)
        .bind(installment_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::persistence("pay installment", e))?;

        Ok(exists.is_some())
    }
}

/// Database row for `transactions` joined with its category
#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    title: String,
    description: Option<String>,
    amount_cents: Cents,
    #[sqlx(rename = "type")]
    transaction_type: String,
    category_id: Option<i64>,
    due_date: NaiveDate,
    is_recurring: bool,
    is_installment: bool,
    total_installments: i32,
    status: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    category_ref_id: Option<i64>,
    category_name: Option<String>,
    category_description: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
    category_created_at: Option<NaiveDateTime>,
    category_updated_at: Option<NaiveDateTime>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self> {
        let transaction_type = row
            .transaction_type
            .parse()
            .map_err(|_| AppError::internal(format!("Invalid transaction type: {}", row.transaction_type)))?;
        let status = row
            .status
            .parse()
            .map_err(|_| AppError::internal(format!("Invalid transaction status: {}", row.status)))?;

        let category = match (
            row.category_ref_id,
            row.category_name,
            row.category_created_at,
            row.category_updated_at,
        ) {
            (Some(id), Some(name), Some(created_at), Some(updated_at)) => Some(Category {
                id,
                name,
                description: row.category_description,
                color: row.category_color.unwrap_or_default(),
                icon: row.category_icon.unwrap_or_default(),
                created_at,
                updated_at,
            }),
            _ => None,
        };

        Ok(Transaction {
            id: row.id,
            title: row.title,
            description: row.description,
            amount_cents: row.amount_cents,
            transaction_type,
            category_id: row.category_id,
            due_date: row.due_date,
            is_recurring: row.is_recurring,
            is_installment: row.is_installment,
            total_installments: row.total_installments,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            category,
            installments: Vec::new(),
        })
    }
}

/// Database row for `installments`
#[derive(sqlx::FromRow)]
struct InstallmentRow {
    id: i64,
    transaction_id: i64,
    installment_number: i32,
    amount_cents: Cents,
    due_date: NaiveDate,
    status: String,
    paid_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl TryFrom<InstallmentRow> for Installment {
    type Error = AppError;

    fn try_from(row: InstallmentRow) -> Result<Self> {
        let status = row
            .status
            .parse()
            .map_err(|_| AppError::internal(format!("Invalid installment status: {}", row.status)))?;

        Ok(Installment {
            id: row.id,
            transaction_id: row.transaction_id,
            installment_number: row.installment_number,
            amount_cents: row.amount_cents,
            due_date: row.due_date,
            status,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
