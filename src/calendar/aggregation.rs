//! Buckets transactions by calendar day.
//!
//! Each bucket holds the number of transactions on one day and their total
//! amount in the display currency.

use std::collections::{BTreeSet, HashMap};

use time::{Date, Month};

use crate::{
    currency::CurrencyConverter,
    transaction::{Transaction, TransactionId},
};

/// A calendar day, used as the key for [DateBucket]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateKey {
    /// The calendar year.
    pub year: i32,
    /// The month.
    pub month: Month,
    /// The day of the month, starting at 1.
    pub day: u8,
}

impl DateKey {
    /// The key for `day` of `month` in `year`.
    pub fn new(year: i32, month: Month, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

/// The transaction count and total amount for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateBucket {
    /// The number of transactions on the day.
    pub count: usize,
    /// Their total amount in the display currency.
    pub amount: f64,
}

/// The result of bucketing a set of transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One bucket per day that has at least one transaction.
    pub buckets: HashMap<DateKey, DateBucket>,
    /// Every year that appears in the transactions.
    pub years: BTreeSet<i32>,
    /// Transactions that were counted but whose amount could not be converted
    /// or would overflow their day's total.
    pub failed_conversions: Vec<TransactionId>,
}

impl Aggregation {
    /// The total number of transactions across all buckets.
    pub fn transaction_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.count).sum()
    }
}

/// Aggregates transactions by calendar day, converting amounts into `target_currency`.
///
/// Transactions are not deduplicated by ID. If the conversion for a
/// transaction fails, produces a non-finite amount, or would push its day's
/// total out of the finite range, the transaction is still counted but adds
/// nothing to the amount, and its ID is recorded in
/// [Aggregation::failed_conversions].
pub fn aggregate_by_day<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    target_currency: &str,
    converter: &dyn CurrencyConverter,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for transaction in transactions {
        let amount = match converter.convert(
            transaction.amount,
            &transaction.currency,
            target_currency,
        ) {
            Ok(amount) if amount.is_finite() => amount,
            Ok(amount) => {
                tracing::warn!(
                    "conversion of transaction {} produced {amount}, ignoring its amount",
                    transaction.id
                );
                aggregation.failed_conversions.push(transaction.id);
                0.0
            }
            Err(error) => {
                tracing::warn!(
                    "could not convert transaction {} from {} to {target_currency}: {error}",
                    transaction.id,
                    transaction.currency
                );
                aggregation.failed_conversions.push(transaction.id);
                0.0
            }
        };

        let bucket = aggregation
            .buckets
            .entry(DateKey::from(transaction.date))
            .or_default();
        bucket.count += 1;

        let total = bucket.amount + amount;
        if total.is_finite() {
            bucket.amount = total;
        } else {
            tracing::warn!(
                "adding transaction {} to the total for {} overflows, ignoring its amount",
                transaction.id,
                transaction.date
            );
            aggregation.failed_conversions.push(transaction.id);
        }

        aggregation.years.insert(transaction.date.year());
    }

    tracing::debug!(
        "aggregated transactions into {} day buckets over {} years",
        aggregation.buckets.len(),
        aggregation.years.len()
    );

    aggregation
}
