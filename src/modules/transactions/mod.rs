pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{
    NewTransaction, Transaction, TransactionRequest, TransactionStatus, TransactionType,
};
pub use repositories::{MySqlTransactionRepository, TransactionRepository};
pub use services::TransactionService;
