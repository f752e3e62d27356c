//! Cashbook personal finance ledger
//!
//! Transactions with optional installment schedules, categories, and a
//! dashboard summary computed over integer-cent amounts.

pub mod config;
pub mod core;
pub mod modules;
pub mod storage;

// Re-export commonly used types
pub use modules::categories;
pub use modules::dashboard;
pub use modules::installments;
pub use modules::transactions;
