pub mod transaction;

pub use transaction::{
    NewTransaction, Transaction, TransactionRequest, TransactionStatus, TransactionType,
};
