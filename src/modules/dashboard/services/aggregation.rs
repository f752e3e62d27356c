//! Ledger aggregation.
//!
//! Pure functions over transactions with their installments attached. Empty
//! input yields zero or empty results. All arithmetic is checked integer
//! cents; a sum leaving the `i64` range is an error, never a wrapped value.

use std::collections::BTreeMap;

use crate::core::{AppError, Cents, MonthWindow, Result};
use crate::modules::dashboard::models::MonthlyTotals;
use crate::modules::transactions::models::{Transaction, TransactionType};

fn checked_sum(total: Cents, amount: Cents) -> Result<Cents> {
    total
        .checked_add(amount)
        .ok_or_else(|| AppError::internal("amount overflow while aggregating ledger"))
}

/// Signed balance over every non-cancelled transaction.
///
/// Plain transactions count in full whatever their status. Installment-bearing
/// transactions count only their paid installments.
pub fn total_balance(transactions: &[Transaction]) -> Result<Cents> {
    let mut balance: Cents = 0;

    for transaction in transactions.iter().filter(|t| !t.is_cancelled()) {
        if transaction.is_installment {
            for installment in transaction.installments.iter().filter(|i| i.is_paid()) {
                balance = checked_sum(balance, transaction.signed(installment.amount_cents))?;
            }
        } else {
            balance = checked_sum(balance, transaction.signed(transaction.amount_cents))?;
        }
    }

    Ok(balance)
}

/// Income and expense due inside `window`.
///
/// Installments are counted by their own due date, paid or not.
pub fn monthly_totals(transactions: &[Transaction], window: &MonthWindow) -> Result<MonthlyTotals> {
    let mut totals = MonthlyTotals::default();

    for transaction in transactions.iter().filter(|t| !t.is_cancelled()) {
        let bucket = match transaction.transaction_type {
            TransactionType::Income => &mut totals.income,
            TransactionType::Expense => &mut totals.expense,
        };

        if transaction.is_installment {
            for installment in transaction
                .installments
                .iter()
                .filter(|i| window.contains(i.due_date))
            {
                *bucket = checked_sum(*bucket, installment.amount_cents)?;
            }
        } else if window.contains(transaction.due_date) {
            *bucket = checked_sum(*bucket, transaction.amount_cents)?;
        }
    }

    Ok(totals)
}

/// Expense cents per category for plain transactions due inside `window`.
///
/// Installment-bearing expenses are left out of this breakdown even though
/// `monthly_totals` counts them.
pub fn category_expenses(
    transactions: &[Transaction],
    window: &MonthWindow,
) -> Result<BTreeMap<i64, Cents>> {
    let mut expenses = BTreeMap::new();

    for transaction in transactions {
        if transaction.is_cancelled()
            || transaction.is_installment
            || transaction.transaction_type != TransactionType::Expense
            || !window.contains(transaction.due_date)
        {
            continue;
        }

        if let Some(category_id) = transaction.category_id {
            let total = expenses.entry(category_id).or_insert(0);
            *total = checked_sum(*total, transaction.amount_cents)?;
        }
    }

    Ok(expenses)
}
