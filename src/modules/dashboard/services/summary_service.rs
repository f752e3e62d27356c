use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::{format_cents, MonthWindow, Result};
use crate::modules::dashboard::models::DashboardSummary;
use crate::modules::dashboard::services::aggregation;
use crate::modules::installments::models::Installment;
use crate::modules::transactions::repositories::TransactionRepository;

/// Composes the aggregation figures into one dashboard summary
pub struct SummaryService {
    repository: Arc<dyn TransactionRepository>,
}

impl SummaryService {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Summary for the UTC calendar month containing `as_of`
    ///
    /// Reads the ledger once; any store failure is returned as-is.
    pub async fn get_summary(&self, as_of: DateTime<Utc>) -> Result<DashboardSummary> {
        let window = MonthWindow::containing(as_of)?;

        let mut transactions = self.repository.find_all().await?;
        let installments = self.repository.find_all_installments().await?;

        let mut by_transaction: HashMap<i64, Vec<Installment>> = HashMap::new();
        for installment in installments {
            by_transaction
                .entry(installment.transaction_id)
                .or_default()
                .push(installment);
        }
        for transaction in transactions.iter_mut() {
            transaction.installments = by_transaction.remove(&transaction.id).unwrap_or_default();
        }

        let monthly = aggregation::monthly_totals(&transactions, &window)?;
        let summary = DashboardSummary {
            total_balance: aggregation::total_balance(&transactions)?,
            monthly_income: monthly.income,
            monthly_expense: monthly.expense,
            category_expenses: aggregation::category_expenses(&transactions, &window)?,
        };

        debug!(
            year = window.year,
            month = window.month,
            total_balance = %format_cents(summary.total_balance),
            monthly_income = %format_cents(summary.monthly_income),
            monthly_expense = %format_cents(summary.monthly_expense),
            categories = summary.category_expenses.len(),
            "Dashboard summary computed"
        );

        Ok(summary)
    }
}
