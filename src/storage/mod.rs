//! Store implementations other than MySQL

pub mod memory;

pub use memory::InMemoryLedger;
