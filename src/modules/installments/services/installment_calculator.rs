use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::core::{AppError, Cents, Result};
use crate::modules::installments::models::InstallmentSlice;

/// Spacing between consecutive installment due dates unless configured otherwise
pub const DEFAULT_INTERVAL_DAYS: i64 = 30;

/// Splits a transaction total into fixed-interval installments
pub struct InstallmentCalculator;

impl InstallmentCalculator {
    /// Split `total_amount_cents` into `count` installments.
    ///
    /// Every installment receives `total / count` (floor); the remainder goes
    /// to installment #1, so the amounts always sum to the total exactly.
    /// Installment `i` is due `interval_days * (i - 1)` days after
    /// `first_due_date`.
    ///
    /// # Errors
    /// `InvalidArgument` when `count < 1`, `total_amount_cents <= 0`,
    /// `interval_days < 0`, or a due date falls outside the calendar range.
    pub fn split(
        total_amount_cents: Cents,
        count: i32,
        first_due_date: NaiveDate,
        interval_days: i64,
    ) -> Result<Vec<InstallmentSlice>> {
        if count < 1 {
            return Err(AppError::invalid_argument(format!(
                "installment count must be at least 1, got {}",
                count
            )));
        }

        if total_amount_cents <= 0 {
            return Err(AppError::invalid_argument(format!(
                "installment total must be greater than zero, got {}",
                total_amount_cents
            )));
        }

        if interval_days < 0 {
            return Err(AppError::invalid_argument(format!(
                "installment interval cannot be negative, got {}",
                interval_days
            )));
        }

        let base = total_amount_cents / Cents::from(count);
        let remainder = total_amount_cents % Cents::from(count);

        let slices = (1..=count)
            .map(|number| {
                let amount_cents = if number == 1 { base + remainder } else { base };
                let due_date = Self::due_date(first_due_date, interval_days, number)?;

                Ok(InstallmentSlice {
                    installment_number: number,
                    amount_cents,
                    due_date,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            total_amount_cents,
            count,
            base,
            remainder,
            "Split transaction into installments"
        );

        Ok(slices)
    }

    fn due_date(first_due_date: NaiveDate, interval_days: i64, number: i32) -> Result<NaiveDate> {
        let offset = interval_days
            .checked_mul(i64::from(number - 1))
            .and_then(|days| u64::try_from(days).ok())
            .ok_or_else(|| AppError::invalid_argument("installment schedule is too long"))?;

        first_due_date
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| {
                AppError::invalid_argument(format!(
                    "due date of installment {} is out of range",
                    number
                ))
            })
    }
}
