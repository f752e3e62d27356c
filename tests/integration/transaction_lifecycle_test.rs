// Transaction lifecycle over the in-memory ledger: creation with and without
// installment schedules, updates, payment, deletion and degraded reads.

use std::sync::Arc;

use cashbook::modules::categories::{CategoryRequest, CategoryService};
use cashbook::modules::installments::models::InstallmentStatus;
use cashbook::modules::installments::services::DEFAULT_INTERVAL_DAYS;
use cashbook::modules::transactions::models::{TransactionRequest, TransactionStatus, TransactionType};
use cashbook::modules::transactions::TransactionService;
use cashbook::storage::InMemoryLedger;
use chrono::{Days, NaiveDate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Harness {
    ledger: Arc<InMemoryLedger>,
    transactions: TransactionService,
    categories: CategoryService,
}

fn harness() -> Harness {
    let ledger = Arc::new(InMemoryLedger::new());
    Harness {
        transactions: TransactionService::new(ledger.clone(), DEFAULT_INTERVAL_DAYS),
        categories: CategoryService::new(ledger.clone()),
        ledger,
    }
}

#[tokio::test]
async fn test_installment_schedule_is_persisted_in_order() {
    let h = harness();
    let first = date(2025, 1, 31);

    let created = h
        .transactions
        .create(
            TransactionRequest::new("Fridge", 100_001, TransactionType::Expense, first)
                .with_installments(4),
        )
        .await
        .expect("Failed to create transaction");

    let reread = h.transactions.get_by_id(created.id).await.unwrap();
    assert!(reread.is_installment);
    assert_eq!(reread.total_installments, 4);

    let schedule: Vec<_> = reread
        .installments
        .iter()
        .map(|i| (i.installment_number, i.amount_cents, i.due_date))
        .collect();
    assert_eq!(
        schedule,
        vec![
            (1, 25_001, first),
            (2, 25_000, first + Days::new(30)),
            (3, 25_000, first + Days::new(60)),
            (4, 25_000, first + Days::new(90)),
        ]
    );
}

#[tokio::test]
async fn test_configured_interval_drives_due_dates() {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = TransactionService::new(ledger, 14);

    let created = service
        .create(
            TransactionRequest::new("Course", 600, TransactionType::Expense, date(2025, 5, 1))
                .with_installments(3),
        )
        .await
        .unwrap();

    let dates: Vec<_> = created.installments.iter().map(|i| i.due_date).collect();
    assert_eq!(dates, vec![date(2025, 5, 1), date(2025, 5, 15), date(2025, 5, 29)]);
}

#[tokio::test]
async fn test_non_installment_create_writes_no_installments() {
    let h = harness();

    let created = h
        .transactions
        .create(TransactionRequest {
            total_installments: 12,
            ..TransactionRequest::new("Salary", 450_000, TransactionType::Income, date(2025, 1, 5))
        })
        .await
        .unwrap();

    assert_eq!(created.total_installments, 1);
    assert_eq!(h.ledger.installment_count(), 0);
    assert!(h.transactions.get_by_id(created.id).await.unwrap().installments.is_empty());
}

#[tokio::test]
async fn test_invalid_create_touches_nothing() {
    let h = harness();

    let err = h
        .transactions
        .create(TransactionRequest::new("", 100, TransactionType::Expense, date(2025, 1, 1)))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(h.ledger.transaction_count(), 0);
}

#[tokio::test]
async fn test_paying_installment_leaves_parent_and_siblings() {
    let h = harness();
    let created = h
        .transactions
        .create(
            TransactionRequest::new("Camera", 900, TransactionType::Expense, date(2025, 4, 1))
                .with_installments(3),
        )
        .await
        .unwrap();

    h.transactions.pay_installment(created.id, 3).await.unwrap();
    // unguarded: paying twice simply re-stamps
    h.transactions.pay_installment(created.id, 3).await.unwrap();

    let reread = h.transactions.get_by_id(created.id).await.unwrap();
    assert_eq!(reread.status, TransactionStatus::Pending);

    let paid: Vec<_> = reread
        .installments
        .iter()
        .filter(|i| i.status == InstallmentStatus::Paid)
        .map(|i| i.installment_number)
        .collect();
    assert_eq!(paid, vec![3]);
    assert!(reread.installments[2].paid_at.is_some());

    let err = h.transactions.pay_installment(created.id, 4).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_status_can_be_set_directly_on_update() {
    let h = harness();
    let created = h
        .transactions
        .create(TransactionRequest::new("Gym", 5_000, TransactionType::Expense, date(2025, 2, 1)))
        .await
        .unwrap();

    let cancelled = h
        .transactions
        .update(
            created.id,
            TransactionRequest::new("Gym", 5_000, TransactionType::Expense, date(2025, 2, 1))
                .with_status(TransactionStatus::Cancelled),
        )
        .await
        .unwrap();
    assert_eq!(cancelled.status, TransactionStatus::Cancelled);

    let revived = h
        .transactions
        .update(
            created.id,
            TransactionRequest::new("Gym", 5_000, TransactionType::Expense, date(2025, 2, 1))
                .with_status(TransactionStatus::Paid),
        )
        .await
        .unwrap();
    assert_eq!(revived.status, TransactionStatus::Paid);
}

#[tokio::test]
async fn test_update_rejects_invalid_fields() {
    let h = harness();
    let created = h
        .transactions
        .create(TransactionRequest::new("Tea", 300, TransactionType::Expense, date(2025, 2, 1)))
        .await
        .unwrap();

    let err = h
        .transactions
        .update(
            created.id,
            TransactionRequest::new("Tea", 0, TransactionType::Expense, date(2025, 2, 1)),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let unchanged = h.transactions.get_by_id(created.id).await.unwrap();
    assert_eq!(unchanged.amount_cents, 300);
}

#[tokio::test]
async fn test_delete_removes_header_and_installments() {
    let h = harness();
    let created = h
        .transactions
        .create(
            TransactionRequest::new("Desk", 800, TransactionType::Expense, date(2025, 3, 1))
                .with_installments(2),
        )
        .await
        .unwrap();

    h.transactions.delete(created.id).await.unwrap();

    assert_eq!(h.ledger.transaction_count(), 0);
    assert_eq!(h.ledger.installment_count(), 0);
    assert!(h.transactions.get_by_id(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_reads_join_category_and_survive_category_deletion() {
    let h = harness();
    let food = h.categories.create(CategoryRequest::new("Food")).await.unwrap();

    let created = h
        .transactions
        .create(
            TransactionRequest::new("Market", 4_250, TransactionType::Expense, date(2025, 1, 8))
                .with_category(food.id),
        )
        .await
        .unwrap();

    let joined = h.transactions.get_by_id(created.id).await.unwrap();
    assert_eq!(joined.category.as_ref().map(|c| c.name.as_str()), Some("Food"));

    h.categories.delete(food.id).await.unwrap();

    let orphan = h.transactions.get_by_id(created.id).await.unwrap();
    assert_eq!(orphan.category_id, None);
    assert!(orphan.category.is_none());
}

#[tokio::test]
async fn test_unknown_category_fails_like_a_foreign_key() {
    let h = harness();

    let err = h
        .transactions
        .create(
            TransactionRequest::new("Market", 4_250, TransactionType::Expense, date(2025, 1, 8))
                .with_category(42)
                .with_installments(3),
        )
        .await
        .unwrap_err();

    assert!(!err.is_validation());
    assert!(err.to_string().contains("category 42 does not exist"));
    assert_eq!(h.ledger.transaction_count(), 0);
    assert_eq!(h.ledger.installment_count(), 0);
}

#[tokio::test]
async fn test_get_all_newest_due_date_first_with_installments() {
    let h = harness();
    for (title, due) in [("Jan", date(2025, 1, 1)), ("Mar", date(2025, 3, 1)), ("Feb", date(2025, 2, 1))] {
        h.transactions
            .create(TransactionRequest::new(title, 100, TransactionType::Income, due))
            .await
            .unwrap();
    }
    h.transactions
        .create(
            TransactionRequest::new("Split", 200, TransactionType::Expense, date(2024, 12, 1))
                .with_installments(2),
        )
        .await
        .unwrap();

    let all = h.transactions.get_all().await.unwrap();
    let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Mar", "Feb", "Jan", "Split"]);
    assert_eq!(all[3].installments.len(), 2);
}

#[tokio::test]
async fn test_installment_lookup_failure_never_fails_reads() {
    let h = harness();
    let created = h
        .transactions
        .create(
            TransactionRequest::new("Phone", 1_200, TransactionType::Expense, date(2025, 1, 1))
                .with_installments(12),
        )
        .await
        .unwrap();

    h.ledger.fail_installment_reads(true);

    let single = h.transactions.get_by_id(created.id).await.unwrap();
    assert!(single.installments.is_empty());

    let all = h.transactions.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].installments.is_empty());
}
