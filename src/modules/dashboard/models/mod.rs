pub mod summary;

pub use summary::{DashboardSummary, MonthlyTotals};
