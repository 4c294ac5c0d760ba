//! Defines the core data models for transactions and the domains they belong to.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{calendar::Palette, endpoints};

/// The identifier of a transaction as given by the transaction source.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are owned by the caller and are never modified by the calendar engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned, in `currency`.
    pub amount: f64,
    /// The currency code of `amount`, e.g. "USD".
    pub currency: String,
}

impl Transaction {
    /// Create a new transaction, normalising the currency code to upper case.
    pub fn new(id: TransactionId, date: Date, amount: f64, currency: &str) -> Self {
        Self {
            id,
            date,
            amount,
            currency: currency.trim().to_ascii_uppercase(),
        }
    }
}

/// Which kind of transactions a calendar is built from.
///
/// Everything that differs between income and expenses (labels, colours and
/// where a click navigates to) is resolved through this type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Money earned.
    Income,
    /// Money spent.
    #[default]
    Expense,
}

impl Domain {
    /// Both domains in display order.
    pub const ALL: [Domain; 2] = [Domain::Income, Domain::Expense];

    /// The value used for this domain in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The human readable name of the domain.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// The list view that shows this domain's transactions.
    pub fn list_endpoint(self) -> &'static str {
        match self {
            Self::Income => endpoints::INCOME_VIEW,
            Self::Expense => endpoints::EXPENSES_VIEW,
        }
    }

    /// The heatmap colours for this domain.
    pub fn palette(self) -> Palette {
        match self {
            Self::Income => Palette::GREEN,
            Self::Expense => Palette::RED,
        }
    }
}
