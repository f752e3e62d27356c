// Property-based tests for the installment splitter:
// exact-cent conservation, schedule length, per-entry floor and date spacing.

use cashbook::core::AppError;
use cashbook::modules::installments::services::{InstallmentCalculator, DEFAULT_INTERVAL_DAYS};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The worked example: remainder of 1 cent lands on installment #1
#[test]
fn test_thousand_cents_in_three() {
    let first = date(2025, 1, 15);
    let slices = InstallmentCalculator::split(1000, 3, first, DEFAULT_INTERVAL_DAYS)
        .expect("Failed to split");

    let rows: Vec<_> = slices
        .iter()
        .map(|s| (s.installment_number, s.amount_cents, s.due_date))
        .collect();

    assert_eq!(
        rows,
        vec![
            (1, 334, first),
            (2, 333, first + Days::new(30)),
            (3, 333, first + Days::new(60)),
        ]
    );
}

#[test]
fn test_single_installment() {
    let first = date(2025, 6, 30);
    let slices = InstallmentCalculator::split(100, 1, first, DEFAULT_INTERVAL_DAYS).unwrap();

    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].amount_cents, 100);
    assert_eq!(slices[0].due_date, first);
}

#[test]
fn test_rejects_non_positive_inputs() {
    let first = date(2025, 1, 1);

    for (amount, count) in [(1000, 0), (1000, -2), (0, 3), (-1, 3)] {
        let result = InstallmentCalculator::split(amount, count, first, DEFAULT_INTERVAL_DAYS);
        assert!(
            matches!(result, Err(AppError::InvalidArgument(_))),
            "split({}, {}) should fail",
            amount,
            count
        );
    }
}

proptest! {
    #[test]
    fn prop_amounts_sum_to_total(amount in 1i64..10_000_000_000, count in 1i32..=120) {
        let slices = InstallmentCalculator::split(amount, count, date(2025, 1, 1), DEFAULT_INTERVAL_DAYS).unwrap();
        let total: i64 = slices.iter().map(|s| s.amount_cents).sum();
        prop_assert_eq!(total, amount);
    }

    #[test]
    fn prop_length_and_numbering(amount in 1i64..1_000_000, count in 1i32..=120) {
        let slices = InstallmentCalculator::split(amount, count, date(2025, 1, 1), DEFAULT_INTERVAL_DAYS).unwrap();
        prop_assert_eq!(slices.len(), count as usize);

        let numbers: Vec<i32> = slices.iter().map(|s| s.installment_number).collect();
        let expected: Vec<i32> = (1..=count).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn prop_each_amount_at_least_floor(amount in 1i64..1_000_000, count in 1i32..=120) {
        let slices = InstallmentCalculator::split(amount, count, date(2025, 1, 1), DEFAULT_INTERVAL_DAYS).unwrap();
        let floor = amount / i64::from(count);

        prop_assert!(slices.iter().all(|s| s.amount_cents >= floor));
        prop_assert!(slices.iter().skip(1).all(|s| s.amount_cents == floor));
        prop_assert_eq!(slices[0].amount_cents, floor + amount % i64::from(count));
    }

    #[test]
    fn prop_due_dates_evenly_spaced(
        count in 1i32..=60,
        interval in 0i64..=90,
        offset in 0u64..3650,
    ) {
        let first = date(2020, 1, 1) + Days::new(offset);
        let slices = InstallmentCalculator::split(10_000, count, first, interval).unwrap();

        prop_assert_eq!(slices[0].due_date, first);
        for pair in slices.windows(2) {
            let gap = (pair[1].due_date - pair[0].due_date).num_days();
            prop_assert_eq!(gap, interval);
        }
    }
}
