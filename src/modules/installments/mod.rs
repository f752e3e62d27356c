pub mod models;
pub mod services;

pub use models::{Installment, InstallmentSlice, InstallmentStatus};
pub use services::{InstallmentCalculator, DEFAULT_INTERVAL_DAYS};
