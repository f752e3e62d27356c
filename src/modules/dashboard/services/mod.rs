pub mod aggregation;
pub mod summary_service;

pub use aggregation::{category_expenses, monthly_totals, total_balance};
pub use summary_service::SummaryService;
