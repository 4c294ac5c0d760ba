//! The 31 × 12 calendar grid.
//!
//! Buckets from every year are summed onto a single reference year: row `d`
//! column `m` holds everything that happened on day `d` of month `m` in any
//! year. Month lengths come from the reference year, so February 29 only
//! exists when the reference year is a leap year.

use std::collections::{BTreeSet, HashMap};

use time::{Date, Month, util::is_leap_year};

use crate::calendar::aggregation::{DateBucket, DateKey};

/// The number of rows in the grid, one per possible day of the month.
pub const DAYS_IN_GRID: u8 = 31;

/// The grid columns in display order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// One `(day of month, month)` position in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// The day of the month, 1 to 31.
    pub day: u8,
    /// The month column.
    pub month: Month,
    /// The year used to anchor [GridCell::date]. It says nothing about which
    /// years the transactions in this cell came from.
    pub reference_year: i32,
    /// The number of transactions on this day across all years.
    pub count: usize,
    /// Their total amount in the display currency.
    pub amount: f64,
    /// Whether `day` exists in `month` of the reference year.
    pub is_valid_day: bool,
    /// Whether this day and month matches the current date in one of the aggregated years.
    pub is_today: bool,
}

impl GridCell {
    /// The display date of the cell in the reference year.
    ///
    /// Returns `None` for invalid cells such as February 30.
    pub fn date(&self) -> Option<Date> {
        if !self.is_valid_day {
            return None;
        }

        Date::from_calendar_date(self.reference_year, self.month, self.day).ok()
    }

    /// The zero based column of the cell.
    pub fn month_index(&self) -> usize {
        usize::from(u8::from(self.month)) - 1
    }

    /// A short label for the cell, e.g. "Mar 5".
    pub fn date_label(&self) -> String {
        format!("{} {}", month_abbreviation(self.month), self.day)
    }
}

/// The full calendar grid, stored row by row (day-major, then month).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    reference_year: i32,
    cells: Vec<GridCell>,
    unplaced_count: usize,
}

impl CalendarGrid {
    /// The year whose month lengths determine which cells are valid.
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// All 372 cells in traversal order: day 1 January to December, then day 2, and so on.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// The 31 rows of the grid, each holding 12 cells.
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(MONTHS.len())
    }

    /// Get the cell for `day` of `month`, or `None` if `day` is not in 1 to 31.
    pub fn cell(&self, day: u8, month: Month) -> Option<&GridCell> {
        if !(1..=DAYS_IN_GRID).contains(&day) {
            return None;
        }

        let index = usize::from(day - 1) * MONTHS.len() + usize::from(u8::from(month)) - 1;
        self.cells.get(index)
    }

    /// The sum of the transaction counts of all cells.
    pub fn total_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.count).sum()
    }

    /// Transactions that have no valid cell in the reference year.
    ///
    /// This is only ever non-zero for February 29 transactions when the
    /// reference year is not a leap year.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced_count
    }
}

/// The number of days in `month` of `year`.
pub fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Formats a month as a three-letter abbreviation, e.g. "Jan".
pub fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Rolls the day buckets of every year in `years` onto a single grid.
///
/// # Arguments
/// * `buckets` - Day buckets from [aggregate_by_day](crate::calendar::aggregate_by_day)
/// * `years` - The years to look up for each cell
/// * `reference_year` - The year that decides month lengths
/// * `today` - The current date, used to flag the cell for today
pub fn build_grid(
    buckets: &HashMap<DateKey, DateBucket>,
    years: &BTreeSet<i32>,
    reference_year: i32,
    today: Date,
) -> CalendarGrid {
    let mut cells = Vec::with_capacity(usize::from(DAYS_IN_GRID) * MONTHS.len());

    for day in 1..=DAYS_IN_GRID {
        for month in MONTHS {
            let is_valid_day = day <= last_day_of_month(reference_year, month);
            let mut cell = GridCell {
                day,
                month,
                reference_year,
                count: 0,
                amount: 0.0,
                is_valid_day,
                is_today: false,
            };

            if is_valid_day {
                for &year in years {
                    if let Some(bucket) = buckets.get(&DateKey::new(year, month, day)) {
                        cell.count += bucket.count;

                        let total = cell.amount + bucket.amount;
                        if !total.is_finite() {
                            tracing::warn!(
                                "total for {} {day} overflows, capping it at the largest amount",
                                month_abbreviation(month)
                            );
                        }
                        cell.amount = total.clamp(f64::MIN, f64::MAX);
                    }

                    if DateKey::new(year, month, day) == DateKey::from(today) {
                        cell.is_today = true;
                    }
                }
            }

            cells.push(cell);
        }
    }

    let bucket_count: usize = buckets.values().map(|bucket| bucket.count).sum();
    let placed_count: usize = cells.iter().map(|cell| cell.count).sum();
    let unplaced_count = bucket_count.saturating_sub(placed_count);

    if unplaced_count > 0 {
        tracing::debug!(
            "{unplaced_count} transactions fall on days that do not exist in {reference_year}"
        );
    }

    CalendarGrid {
        reference_year,
        cells,
        unplaced_count,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use time::{Month, macros::date};

    use crate::calendar::aggregation::{DateBucket, DateKey};

    use super::{DAYS_IN_GRID, MONTHS, build_grid, last_day_of_month, month_abbreviation};

    fn bucket(count: usize, amount: f64) -> DateBucket {
        DateBucket { count, amount }
    }

    #[test]
    fn grid_has_31_rows_of_12_cells() {
        let grid = build_grid(&HashMap::new(), &BTreeSet::new(), 2024, date!(2024 - 06 - 01));

        assert_eq!(grid.cells().len(), 372);
        assert_eq!(grid.rows().count(), usize::from(DAYS_IN_GRID));
        assert!(grid.rows().all(|row| row.len() == MONTHS.len()));
        assert!(grid.cells().iter().all(|cell| cell.count == 0 && cell.amount == 0.0));
    }

    #[test]
    fn traversal_is_day_major() {
        let grid = build_grid(&HashMap::new(), &BTreeSet::new(), 2024, date!(2024 - 06 - 01));

        let first = grid.cells()[0];
        let second = grid.cells()[1];
        let thirteenth = grid.cells()[12];

        assert_eq!((first.day, first.month), (1, Month::January));
        assert_eq!((second.day, second.month), (1, Month::February));
        assert_eq!((thirteenth.day, thirteenth.month), (2, Month::January));
    }

    #[test]
    fn rolls_years_onto_one_cell() {
        let buckets = HashMap::from([
            (DateKey::new(2023, Month::March, 5), bucket(1, 100.0)),
            (DateKey::new(2024, Month::March, 5), bucket(1, 50.0)),
        ]);
        let years = BTreeSet::from([2023, 2024]);

        let grid = build_grid(&buckets, &years, 2026, date!(2026 - 10 - 18));

        let cell = grid.cell(5, Month::March).unwrap();
        assert_eq!(cell.count, 2);
        assert_eq!(cell.amount, 150.0);
        assert_eq!(cell.date(), Some(date!(2026 - 03 - 05)));
        assert_eq!(grid.total_count(), 2);
    }

    #[test]
    fn overflowing_cell_total_is_capped() {
        let buckets = HashMap::from([
            (DateKey::new(2023, Month::January, 1), bucket(1, 1e308)),
            (DateKey::new(2024, Month::January, 1), bucket(1, 1e308)),
        ]);
        let years = BTreeSet::from([2023, 2024]);

        let grid = build_grid(&buckets, &years, 2024, date!(2024 - 06 - 01));

        let cell = grid.cell(1, Month::January).unwrap();
        assert_eq!(cell.count, 2);
        assert_eq!(cell.amount, f64::MAX);
    }

    #[test]
    fn days_past_month_end_are_invalid() {
        let grid = build_grid(&HashMap::new(), &BTreeSet::new(), 2023, date!(2023 - 01 - 01));

        for cell in grid.cells() {
            let expected = cell.day <= last_day_of_month(2023, cell.month);
            assert_eq!(cell.is_valid_day, expected, "{cell:?}");
        }

        let february_29 = grid.cell(29, Month::February).unwrap();
        assert!(!february_29.is_valid_day);
        assert_eq!(february_29.date(), None);
        assert!(!grid.cell(31, Month::April).unwrap().is_valid_day);
        assert!(grid.cell(31, Month::December).unwrap().is_valid_day);
    }

    #[test]
    fn february_29_depends_on_reference_year_only() {
        let buckets = HashMap::from([(DateKey::new(2024, Month::February, 29), bucket(2, 20.0))]);
        let years = BTreeSet::from([2024]);

        let leap_grid = build_grid(&buckets, &years, 2024, date!(2024 - 01 - 01));
        let common_grid = build_grid(&buckets, &years, 2025, date!(2025 - 01 - 01));

        assert_eq!(leap_grid.cell(29, Month::February).unwrap().count, 2);
        assert_eq!(leap_grid.unplaced_count(), 0);

        let cell = common_grid.cell(29, Month::February).unwrap();
        assert!(!cell.is_valid_day);
        assert_eq!(cell.count, 0);
        assert_eq!(cell.amount, 0.0);
        assert_eq!(common_grid.unplaced_count(), 2);
    }

    #[test]
    fn marks_today_when_any_aggregated_year_matches() {
        let years = BTreeSet::from([2023, 2024]);

        let grid = build_grid(&HashMap::new(), &years, 2025, date!(2024 - 07 - 14));

        let today_cells = grid.cells().iter().filter(|cell| cell.is_today).collect::<Vec<_>>();
        assert_eq!(today_cells.len(), 1);
        assert_eq!((today_cells[0].day, today_cells[0].month), (14, Month::July));
    }

    #[test]
    fn today_is_not_marked_outside_aggregated_years() {
        let years = BTreeSet::from([2023]);

        let grid = build_grid(&HashMap::new(), &years, 2026, date!(2026 - 10 - 18));

        assert!(grid.cells().iter().all(|cell| !cell.is_today));
    }

    #[test]
    fn cell_lookup_rejects_out_of_range_days() {
        let grid = build_grid(&HashMap::new(), &BTreeSet::new(), 2024, date!(2024 - 01 - 01));

        assert!(grid.cell(0, Month::January).is_none());
        assert!(grid.cell(32, Month::January).is_none());
        assert_eq!(grid.cell(31, Month::December).unwrap().month_index(), 11);
    }

    #[test]
    fn month_abbreviations_are_three_letters() {
        let labels = MONTHS.map(month_abbreviation);

        assert_eq!(labels[0], "Jan");
        assert_eq!(labels[11], "Dec");
        assert!(labels.iter().all(|label| label.len() == 3));
    }
}
