//! Transactions and where they come from.
//!
//! This module contains:
//! - The `Transaction` model and the income/expense `Domain`
//! - Loading transactions from CSV files into a `Ledger`
//! - The list pages that calendar clicks navigate to

mod core;
mod csv;
mod list_page;

pub use core::{Domain, Transaction, TransactionId};
pub use self::csv::{load_transactions, parse_transactions_csv};
pub use list_page::{TransactionListState, get_expenses_page, get_income_page};

/// The transactions for both domains, loaded once at start up and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// Money earned.
    pub income: Vec<Transaction>,
    /// Money spent.
    pub expenses: Vec<Transaction>,
}

impl Ledger {
    /// The transactions that belong to `domain`.
    pub fn transactions(&self, domain: Domain) -> &[Transaction] {
        match domain {
            Domain::Income => &self.income,
            Domain::Expense => &self.expenses,
        }
    }
}
