use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{AppError, Cents};

/// One scheduled sub-payment of an installment-bearing transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: i64,
    pub transaction_id: i64,
    /// Sequential number (1, 2, 3...), unique per transaction
    pub installment_number: i32,
    pub amount_cents: Cents,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InstallmentStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::validation(format!(
                "invalid installment status: {}",
                value
            ))),
        }
    }
}

impl Installment {
    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Unguarded: paying an already-paid installment re-stamps it
    pub fn mark_as_paid(&mut self, paid_at: NaiveDateTime) {
        self.status = InstallmentStatus::Paid;
        self.paid_at = Some(paid_at);
        self.updated_at = paid_at;
    }
}

/// Splitter output: the amount and due date for one installment number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentSlice {
    pub installment_number: i32,
    pub amount_cents: Cents,
    pub due_date: NaiveDate,
}
