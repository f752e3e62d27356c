use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::core::{AppError, Cents};
use crate::modules::categories::models::Category;
use crate::modules::installments::models::Installment;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// `+amount` for income, `-amount` for expense
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            Self::Income => amount_cents,
            Self::Expense => -amount_cents,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(AppError::validation(format!(
                "invalid transaction type: {:?}",
                value
            ))),
        }
    }
}

/// Transaction status; transitions are plain field updates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppError::validation(format!(
                "invalid transaction status: {:?}",
                value
            ))),
        }
    }
}

/// Transaction header as stored, optionally with its category and installments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount_cents: Cents,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub is_installment: bool,
    /// Always 1 when `is_installment` is false
    pub total_installments: i32,
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub installments: Vec<Installment>,
}

impl Transaction {
    pub fn is_cancelled(&self) -> bool {
        self.status == TransactionStatus::Cancelled
    }

    /// Amount signed by direction
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        self.transaction_type.signed(amount_cents)
    }
}

/// Create/update payload as received from callers.
///
/// `type` and `status` stay strings here so unknown values surface as
/// validation errors from the lifecycle manager rather than as decode errors.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub amount_cents: Cents,
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    pub category_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub is_installment: bool,
    #[serde(default)]
    pub total_installments: i32,
    pub status: Option<String>,
}

impl TransactionRequest {
    /// Minimal single-shot request; adjust fields as needed
    pub fn new(
        title: impl Into<String>,
        amount_cents: Cents,
        transaction_type: TransactionType,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            amount_cents,
            transaction_type: transaction_type.as_str().to_string(),
            category_id: None,
            due_date,
            is_recurring: false,
            is_installment: false,
            total_installments: 1,
            status: None,
        }
    }

    pub fn with_installments(mut self, total_installments: i32) -> Self {
        self.is_installment = true;
        self.total_installments = total_installments;
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }
}

/// Validated header ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub title: String,
    pub description: Option<String>,
    pub amount_cents: Cents,
    pub transaction_type: TransactionType,
    pub category_id: Option<i64>,
    pub due_date: NaiveDate,
    pub is_recurring: bool,
    pub is_installment: bool,
    pub total_installments: i32,
    pub status: TransactionStatus,
}

/// Accepts `2025-01-31` as well as RFC 3339 timestamps (date taken in UTC)
fn deserialize_due_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.naive_utc().date())
        .map_err(|_| serde::de::Error::custom(format!("invalid due_date: {}", raw)))
}
