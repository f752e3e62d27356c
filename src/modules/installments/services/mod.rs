pub mod installment_calculator;

pub use installment_calculator::{InstallmentCalculator, DEFAULT_INTERVAL_DAYS};
