use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::Cents;

/// Income and expense falling due within one calendar month
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub income: Cents,
    pub expense: Cents,
}

/// Dashboard figures for the month containing the requested instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_balance: Cents,
    pub monthly_income: Cents,
    pub monthly_expense: Cents,
    /// Expense cents keyed by category id; categories without spending are absent
    pub category_expenses: BTreeMap<i64, Cents>,
}
