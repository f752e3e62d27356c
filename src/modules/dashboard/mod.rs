pub mod controllers;
pub mod models;
pub mod services;

pub use models::{DashboardSummary, MonthlyTotals};
pub use services::SummaryService;
