// Dashboard summary assembled from transactions created through the
// lifecycle service.

use std::collections::BTreeMap;
use std::sync::Arc;

use cashbook::modules::categories::{CategoryRequest, CategoryService};
use cashbook::modules::dashboard::{DashboardSummary, SummaryService};
use cashbook::modules::transactions::models::{TransactionRequest, TransactionStatus, TransactionType};
use cashbook::modules::transactions::TransactionService;
use cashbook::storage::InMemoryLedger;
use chrono::{NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_summary_of_a_month() {
    let ledger = Arc::new(InMemoryLedger::new());
    let categories = CategoryService::new(ledger.clone());
    let transactions = TransactionService::new(ledger.clone(), 30);
    let summary = SummaryService::new(ledger.clone());

    let food = categories.create(CategoryRequest::new("Food")).await.unwrap();
    let home = categories.create(CategoryRequest::new("Home")).await.unwrap();

    transactions
        .create(TransactionRequest::new("Salary", 300_000, TransactionType::Income, date(2025, 3, 5)))
        .await
        .unwrap();
    transactions
        .create(
            TransactionRequest::new("Groceries", 12_000, TransactionType::Expense, date(2025, 3, 9))
                .with_category(food.id)
                .with_status(TransactionStatus::Paid),
        )
        .await
        .unwrap();
    transactions
        .create(
            TransactionRequest::new("Cancelled dinner", 8_000, TransactionType::Expense, date(2025, 3, 12))
                .with_category(food.id)
                .with_status(TransactionStatus::Cancelled),
        )
        .await
        .unwrap();
    let sofa = transactions
        .create(
            TransactionRequest::new("Sofa", 90_000, TransactionType::Expense, date(2025, 2, 20))
                .with_category(home.id)
                .with_installments(3),
        )
        .await
        .unwrap();
    // February and March installments of the sofa; only the first is paid
    transactions.pay_installment(sofa.id, 1).await.unwrap();

    let as_of = Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap();
    let result = summary.get_summary(as_of).await.unwrap();

    assert_eq!(
        result,
        DashboardSummary {
            total_balance: 300_000 - 12_000 - 30_000,
            monthly_income: 300_000,
            // groceries plus the sofa installment due 2025-03-22
            monthly_expense: 12_000 + 30_000,
            category_expenses: BTreeMap::from([(food.id, 12_000)]),
        }
    );
}

#[tokio::test]
async fn test_month_is_taken_in_utc() {
    let ledger = Arc::new(InMemoryLedger::new());
    let transactions = TransactionService::new(ledger.clone(), 30);
    let summary = SummaryService::new(ledger);

    transactions
        .create(TransactionRequest::new("Bonus", 1_000, TransactionType::Income, date(2025, 4, 1)))
        .await
        .unwrap();

    let end_of_march = Utc.with_ymd_and_hms(2025, 3, 31, 23, 0, 0).unwrap();
    let start_of_april = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();

    assert_eq!(summary.get_summary(end_of_march).await.unwrap().monthly_income, 0);
    assert_eq!(summary.get_summary(start_of_april).await.unwrap().monthly_income, 1_000);
}

#[tokio::test]
async fn test_store_failure_surfaces() {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.fail_installment_reads(true);

    let err = SummaryService::new(ledger)
        .get_summary(Utc::now())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to get installments"));
}
