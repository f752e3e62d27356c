pub mod installment;

pub use installment::{Installment, InstallmentSlice, InstallmentStatus};
