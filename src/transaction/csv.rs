//! Loads transactions from CSV files.
//!
//! The expected header is `id,date,amount,currency` with dates formatted as `YYYY-MM-DD`.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, calendar::parse_iso_date, transaction::Transaction};

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    id: i64,
    date: String,
    amount: f64,
    currency: String,
}

/// Parse the transactions in `text`.
///
/// # Errors
/// Returns [Error::InvalidCSV] if a row is missing a column, or has a
/// malformed number or date. The error names the offending line.
pub fn parse_transactions_csv(text: &str) -> Result<Vec<Transaction>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut transactions = Vec::new();

    for (index, record) in reader.deserialize::<TransactionRecord>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;

        let record =
            record.map_err(|error| Error::InvalidCSV(format!("line {line}: {error}")))?;

        let date = parse_iso_date(&record.date).map_err(|_| {
            Error::InvalidCSV(format!(
                "line {line}: \"{}\" is not a date in the format YYYY-MM-DD",
                record.date
            ))
        })?;

        if record.currency.is_empty() {
            return Err(Error::InvalidCSV(format!("line {line}: missing currency")));
        }

        transactions.push(Transaction::new(
            record.id,
            date,
            record.amount,
            &record.currency,
        ));
    }

    Ok(transactions)
}

/// Read and parse the transactions CSV at `path`.
///
/// # Errors
/// Returns [Error::ReadFile] if the file cannot be read and
/// [Error::InvalidCSV] if its contents cannot be parsed.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>, Error> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| Error::ReadFile(path.display().to_string(), error.to_string()))?;

    let transactions = parse_transactions_csv(&text)?;
    tracing::info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );

    Ok(transactions)
}
