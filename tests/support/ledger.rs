//! Tiny transactional account store used to drive the producer the way an
//! application would: stage events while the transaction runs, flush after
//! commit, clear on rollback.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Opened { account: String, balance: i64 },
    Transferred { from: String, to: String, amount: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    UnknownAccount(String),
    InsufficientFunds { account: String, balance: i64 },
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::UnknownAccount(id) => write!(f, "unknown account {}", id),
            LedgerError::InsufficientFunds { account, balance } => {
                write!(f, "account {} has only {}", account, balance)
            }
        }
    }
}

#[derive(Default)]
pub struct Ledger {
    balances: Mutex<HashMap<String, i64>>,
}

/// Working copy of the balances for one transaction.
pub struct LedgerTx {
    balances: HashMap<String, i64>,
}

impl LedgerTx {
    pub fn open(&mut self, account: &str, balance: i64) {
        self.balances.insert(account.to_string(), balance);
    }

    pub fn transfer(&mut self, from: &str, to: &str, amount: i64) -> Result<(), LedgerError> {
        if !self.balances.contains_key(to) {
            return Err(LedgerError::UnknownAccount(to.to_string()));
        }
        let balance = *self
            .balances
            .get(from)
            .ok_or_else(|| LedgerError::UnknownAccount(from.to_string()))?;
        if balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.to_string(),
                balance,
            });
        }
        *self.balances.entry(from.to_string()).or_default() -= amount;
        *self.balances.entry(to.to_string()).or_default() += amount;
        Ok(())
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &str) -> Option<i64> {
        self.balances.lock().unwrap().get(account).copied()
    }

    /// Run `work` on a working copy; the copy replaces the stored balances
    /// only if `work` succeeds.
    pub fn transaction<R, X>(
        &self,
        work: impl FnOnce(&mut LedgerTx) -> Result<R, X>,
    ) -> Result<R, X> {
        let mut stored = self.balances.lock().unwrap();
        let mut tx = LedgerTx {
            balances: stored.clone(),
        };
        let value = work(&mut tx)?;
        *stored = tx.balances;
        Ok(value)
    }
}
