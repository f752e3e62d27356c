//! In-process ledger store.
//!
//! Implements both repository traits over plain collections behind a mutex.
//! Mirrors the MySQL schema rules: unique category names, transactions may
//! only reference an existing category, installments cascade with their
//! transaction, and category references are cleared when a category goes away.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::core::{AppError, Result};
use crate::modules::categories::{
    models::{Category, NewCategory},
    repositories::CategoryRepository,
};
use crate::modules::installments::models::{Installment, InstallmentSlice, InstallmentStatus};
use crate::modules::transactions::{
    models::{NewTransaction, Transaction},
    repositories::TransactionRepository,
};

#[derive(Default)]
struct LedgerState {
    last_category_id: i64,
    last_transaction_id: i64,
    last_installment_id: i64,
    categories: BTreeMap<i64, Category>,
    transactions: BTreeMap<i64, Transaction>,
    installments: Vec<Installment>,
    fail_installment_reads: bool,
}

impl LedgerState {
    fn name_taken(&self, name: &str, except_id: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| Some(c.id) != except_id && c.name.eq_ignore_ascii_case(name))
    }

    /// Header as the store returns it: category joined, installments not attached
    fn joined(&self, transaction: &Transaction) -> Transaction {
        let mut joined = transaction.clone();
        joined.category = transaction
            .category_id
            .and_then(|id| self.categories.get(&id).cloned());
        joined.installments = Vec::new();
        joined
    }

    /// Foreign-key rule on `transactions.category_id`
    fn check_category_ref(&self, operation: &str, category_id: Option<i64>) -> Result<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(AppError::persistence(
                operation,
                format!("category {} does not exist", id),
            )),
            _ => Ok(()),
        }
    }

    fn check_installment_reads(&self) -> Result<()> {
        if self.fail_installment_reads {
            return Err(AppError::persistence(
                "get installments",
                "installment storage unavailable",
            ));
        }
        Ok(())
    }
}

/// Thread-safe in-memory store for categories, transactions and installments
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, LedgerState>> {
        self.state
            .lock()
            .map_err(|_| AppError::internal("ledger state poisoned"))
    }

    /// Make every installment read fail with a persistence error
    pub fn fail_installment_reads(&self, fail: bool) {
        if let Ok(mut state) = self.lock_state() {
            state.fail_installment_reads = fail;
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.lock_state().map(|s| s.transactions.len()).unwrap_or(0)
    }

    pub fn installment_count(&self) -> usize {
        self.lock_state().map(|s| s.installments.len()).unwrap_or(0)
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl CategoryRepository for InMemoryLedger {
    async fn create(&self, category: &NewCategory) -> Result<Category> {
        let mut state = self.lock_state()?;

        if state.name_taken(&category.name, None) {
            return Err(AppError::validation("category name already exists"));
        }

        state.last_category_id += 1;
        let timestamp = now();
        let created = Category {
            id: state.last_category_id,
            name: category.name.clone(),
            description: category.description.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
            created_at: timestamp,
            updated_at: timestamp,
        };

        state.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        let state = self.lock_state()?;
        let mut categories: Vec<_> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.lock_state()?.categories.get(&id).cloned())
    }

    async fn update(&self, id: i64, category: &NewCategory) -> Result<Option<Category>> {
        let mut state = self.lock_state()?;

        if !state.categories.contains_key(&id) {
            return Ok(None);
        }
        if state.name_taken(&category.name, Some(id)) {
            return Err(AppError::validation("category name already exists"));
        }

        let updated = state.categories.get_mut(&id).map(|existing| {
            existing.name = category.name.clone();
            existing.description = category.description.clone();
            existing.color = category.color.clone();
            existing.icon = category.icon.clone();
            existing.updated_at = now();
            existing.clone()
        });

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.lock_state()?;

        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }

        for transaction in state.transactions.values_mut() {
            if transaction.category_id == Some(id) {
                transaction.category_id = None;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl TransactionRepository for InMemoryLedger {
    async fn create(
        &self,
        transaction: &NewTransaction,
        installments: &[InstallmentSlice],
    ) -> Result<Transaction> {
        let mut state = self.lock_state()?;
        state.check_category_ref("create transaction", transaction.category_id)?;
        let timestamp = now();

        state.last_transaction_id += 1;
        let id = state.last_transaction_id;

        let mut created_installments = Vec::with_capacity(installments.len());
        for slice in installments {
            state.last_installment_id += 1;
            created_installments.push(Installment {
                id: state.last_installment_id,
                transaction_id: id,
                installment_number: slice.installment_number,
                amount_cents: slice.amount_cents,
                due_date: slice.due_date,
                status: InstallmentStatus::Pending,
                paid_at: None,
                created_at: timestamp,
                updated_at: timestamp,
            });
        }
        state.installments.extend(created_installments.iter().cloned());

        let header = Transaction {
            id,
            title: transaction.title.clone(),
            description: transaction.description.clone(),
            amount_cents: transaction.amount_cents,
            transaction_type: transaction.transaction_type,
            category_id: transaction.category_id,
            due_date: transaction.due_date,
            is_recurring: transaction.is_recurring,
            is_installment: transaction.is_installment,
            total_installments: transaction.total_installments,
            status: transaction.status,
            created_at: timestamp,
            updated_at: timestamp,
            category: None,
            installments: Vec::new(),
        };
        state.transactions.insert(id, header.clone());

        Ok(Transaction {
            installments: created_installments,
            ..header
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let state = self.lock_state()?;
        Ok(state.transactions.get(&id).map(|t| state.joined(t)))
    }

    async fn find_all(&self) -> Result<Vec<Transaction>> {
        let state = self.lock_state()?;
        let mut transactions: Vec<_> = state
            .transactions
            .values()
            .map(|t| state.joined(t))
            .collect();

        // Ids break ties between rows created within the same instant
        transactions.sort_by(|a, b| {
            b.due_date
                .cmp(&a.due_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(transactions)
    }

    async fn find_installments(&self, transaction_id: i64) -> Result<Vec<Installment>> {
        let state = self.lock_state()?;
        state.check_installment_reads()?;

        let mut installments: Vec<_> = state
            .installments
            .iter()
            .filter(|i| i.transaction_id == transaction_id)
            .cloned()
            .collect();
        installments.sort_by_key(|i| i.installment_number);
        Ok(installments)
    }

    async fn find_all_installments(&self) -> Result<Vec<Installment>> {
        let state = self.lock_state()?;
        state.check_installment_reads()?;

        let mut installments = state.installments.clone();
        installments.sort_by_key(|i| (i.transaction_id, i.installment_number));
        Ok(installments)
    }

    async fn update(&self, id: i64, transaction: &NewTransaction) -> Result<Option<Transaction>> {
        let mut state = self.lock_state()?;

        if !state.transactions.contains_key(&id) {
            return Ok(None);
        }
        state.check_category_ref("update transaction", transaction.category_id)?;

        let Some(existing) = state.transactions.get_mut(&id) else {
            return Ok(None);
        };

        existing.title = transaction.title.clone();
        existing.description = transaction.description.clone();
        existing.amount_cents = transaction.amount_cents;
        existing.transaction_type = transaction.transaction_type;
        existing.category_id = transaction.category_id;
        existing.due_date = transaction.due_date;
        existing.is_recurring = transaction.is_recurring;
        existing.is_installment = transaction.is_installment;
        existing.total_installments = transaction.total_installments;
        existing.status = transaction.status;
        existing.updated_at = now();

        Ok(state.transactions.get(&id).map(|t| state.joined(t)))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.lock_state()?;

        if state.transactions.remove(&id).is_none() {
            return Ok(false);
        }

        state.installments.retain(|i| i.transaction_id != id);
        Ok(true)
    }

    async fn update_installment_status(
        &self,
        transaction_id: i64,
        installment_number: i32,
        status: InstallmentStatus,
        paid_at: Option<NaiveDateTime>,
    ) -> Result<bool> {
        let mut state = self.lock_state()?;

        let Some(installment) = state.installments.iter_mut().find(|i| {
            i.transaction_id == transaction_id && i.installment_number == installment_number
        }) else {
            return Ok(false);
        };

        match (status, paid_at) {
            (InstallmentStatus::Paid, Some(at)) => installment.mark_as_paid(at),
            _ => {
                installment.status = status;
                installment.paid_at = paid_at;
                installment.updated_at = now();
            }
        }
        Ok(true)
    }
}
