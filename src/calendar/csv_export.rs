//! Tabular export of the calendar grid.

use serde::Serialize;

use crate::{
    Error,
    calendar::grid::{CalendarGrid, GridCell, month_abbreviation},
};

/// A coarse classification of how many transactions happened on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLevel {
    /// No transactions.
    None,
    /// Exactly one transaction.
    Single,
    /// Two or three transactions.
    Low,
    /// Four to six transactions.
    Moderate,
    /// Seven or more transactions.
    High,
}

impl ActivityLevel {
    /// Classify a day with `count` transactions.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Single,
            2..=3 => Self::Low,
            4..=6 => Self::Moderate,
            _ => Self::High,
        }
    }
}

/// One row of the CSV export, describing a single grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarRow {
    /// The day of the month.
    #[serde(rename = "Day")]
    pub day: u8,
    /// The three letter month label.
    #[serde(rename = "Month")]
    pub month: &'static str,
    /// The display label, e.g. "Mar 5".
    #[serde(rename = "Date")]
    pub date: String,
    /// The number of transactions on the day.
    #[serde(rename = "Transactions")]
    pub count: usize,
    /// The total amount with two decimals.
    #[serde(rename = "Amount")]
    pub amount: String,
    /// The amount per transaction with two decimals.
    #[serde(rename = "Average")]
    pub average: String,
    /// How busy the day is.
    #[serde(rename = "Activity")]
    pub activity: ActivityLevel,
    /// Whether the day exists in the reference year.
    #[serde(rename = "Valid")]
    pub is_valid_day: bool,
}

impl From<&GridCell> for CalendarRow {
    fn from(cell: &GridCell) -> Self {
        let average = if cell.count > 0 {
            cell.amount / cell.count as f64
        } else {
            0.0
        };

        Self {
            day: cell.day,
            month: month_abbreviation(cell.month),
            date: cell.date_label(),
            count: cell.count,
            amount: format!("{:.2}", cell.amount),
            average: format!("{average:.2}"),
            activity: ActivityLevel::from_count(cell.count),
            is_valid_day: cell.is_valid_day,
        }
    }
}

/// One row per grid cell, in grid traversal order.
pub fn calendar_rows(grid: &CalendarGrid) -> Vec<CalendarRow> {
    grid.cells().iter().map(CalendarRow::from).collect()
}

/// Render the grid as CSV text with a header row.
///
/// # Errors
/// Returns [Error::ExportError] if the CSV writer fails.
pub fn write_csv(grid: &CalendarGrid) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in calendar_rows(grid) {
        writer
            .serialize(row)
            .map_err(|error| Error::ExportError(format!("could not write CSV row: {error}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(format!("could not flush CSV: {error}")))?;

    String::from_utf8(bytes)
        .map_err(|error| Error::ExportError(format!("CSV is not valid UTF-8: {error}")))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use time::{Month, macros::date};

    use crate::calendar::{
        aggregation::{DateBucket, DateKey},
        grid::build_grid,
    };

    use super::{ActivityLevel, calendar_rows, write_csv};

    #[test]
    fn classifies_activity() {
        let levels: Vec<_> = [0, 1, 2, 3, 4, 6, 7, 100]
            .into_iter()
            .map(ActivityLevel::from_count)
            .collect();

        assert_eq!(
            levels,
            vec![
                ActivityLevel::None,
                ActivityLevel::Single,
                ActivityLevel::Low,
                ActivityLevel::Low,
                ActivityLevel::Moderate,
                ActivityLevel::Moderate,
                ActivityLevel::High,
                ActivityLevel::High,
            ]
        );
    }

    #[test]
    fn one_row_per_cell_in_grid_order() {
        let buckets = HashMap::from([(
            DateKey::new(2024, Month::March, 5),
            DateBucket {
                count: 4,
                amount: 150.0,
            },
        )]);
        let grid = build_grid(&buckets, &BTreeSet::from([2024]), 2023, date!(2023 - 01 - 01));

        let rows = calendar_rows(&grid);

        assert_eq!(rows.len(), 372);
        assert_eq!((rows[0].day, rows[0].month), (1, "Jan"));
        assert_eq!((rows[1].day, rows[1].month), (1, "Feb"));

        let march_5 = &rows[4 * 12 + 2];
        assert_eq!(march_5.date, "Mar 5");
        assert_eq!(march_5.count, 4);
        assert_eq!(march_5.amount, "150.00");
        assert_eq!(march_5.average, "37.50");
        assert_eq!(march_5.activity, ActivityLevel::Moderate);
        assert!(march_5.is_valid_day);

        let february_29 = &rows[28 * 12 + 1];
        assert_eq!(february_29.date, "Feb 29");
        assert!(!february_29.is_valid_day);
        assert_eq!(february_29.average, "0.00");
    }

    #[test]
    fn writes_header_and_rows() {
        let grid = build_grid(&HashMap::new(), &BTreeSet::new(), 2024, date!(2024 - 01 - 01));

        let text = write_csv(&grid).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 373);
        assert_eq!(
            lines[0],
            "Day,Month,Date,Transactions,Amount,Average,Activity,Valid"
        );
        assert_eq!(lines[1], "1,Jan,Jan 1,0,0.00,0.00,None,true");
        assert_eq!(lines[31 * 12], "31,Dec,Dec 31,0,0.00,0.00,None,true");
        assert_eq!(lines[30 * 12 + 2], "31,Feb,Feb 31,0,0.00,0.00,None,false");
    }
}
