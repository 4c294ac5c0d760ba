//! Runs the full calendar pipeline for one set of inputs.

use time::{Date, Month};

use crate::{
    calendar::{
        aggregation::aggregate_by_day,
        grid::{CalendarGrid, build_grid},
        interaction::{NavigationRequest, format_iso_date, select_cell},
        scale::{ScaleContext, compute_scale},
    },
    currency::CurrencyConverter,
    transaction::{Domain, Transaction, TransactionId},
};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls inside the range, including both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// A label such as "2024-01-01 to 2024-12-31".
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}

/// Everything besides the transactions that determines a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarOptions {
    /// Which transactions to show.
    pub domain: Domain,
    /// The currency all amounts are converted into.
    pub currency: String,
    /// The current date. Its year is the reference year of the grid.
    pub today: Date,
    /// Only transactions inside this range are included, `None` includes everything.
    pub range: Option<DateRange>,
}

/// A consistent grid and scale computed from one set of inputs.
///
/// The views and exports all render from a snapshot, so they always agree with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSnapshot {
    /// Which transactions the calendar shows.
    pub domain: Domain,
    /// The currency of every amount in the grid.
    pub currency: String,
    /// The 31 by 12 grid.
    pub grid: CalendarGrid,
    /// The colour scale derived from `grid`.
    pub scale: ScaleContext,
    /// The label of the selected date range.
    pub range_label: String,
    /// The number of transactions the calendar was built from.
    pub transaction_count: usize,
    /// Transactions whose amount could not be converted into `currency`.
    pub failed_conversions: Vec<TransactionId>,
}

impl CalendarSnapshot {
    /// Aggregate `transactions`, build the grid and derive its scale.
    pub fn build(
        transactions: &[Transaction],
        options: &CalendarOptions,
        converter: &dyn CurrencyConverter,
    ) -> Self {
        let selected: Vec<&Transaction> = transactions
            .iter()
            .filter(|transaction| {
                options
                    .range
                    .is_none_or(|range| range.contains(transaction.date))
            })
            .collect();

        let aggregation = aggregate_by_day(selected.iter().copied(), &options.currency, converter);
        let grid = build_grid(
            &aggregation.buckets,
            &aggregation.years,
            options.today.year(),
            options.today,
        );
        let scale = compute_scale(&grid);

        Self {
            domain: options.domain,
            currency: options.currency.clone(),
            grid,
            scale,
            range_label: options
                .range
                .map_or_else(|| "All time".to_owned(), |range| range.label()),
            transaction_count: selected.len(),
            failed_conversions: aggregation.failed_conversions,
        }
    }

    /// The heading shown above the calendar and embedded in the exports.
    pub fn title(&self) -> String {
        format!(
            "{} calendar: {} ({} transactions)",
            self.domain.label(),
            self.range_label,
            self.transaction_count
        )
    }

    /// A sentence explaining how to read the calendar.
    pub fn description(&self) -> String {
        format!(
            "Daily {} totals in {} for every year in the selected range, laid out on a \
            {} calendar. Days at or above the 80th percentile ({:.2}) are shown at full colour.",
            self.domain.label().to_lowercase(),
            self.currency,
            self.grid.reference_year(),
            self.scale.max_amount_p80
        )
    }

    /// Map a click on the cell for `day` of `month` to a navigation request.
    ///
    /// Returns `None` if the cell does not exist, is invalid, or has no transactions.
    pub fn select(&self, day: u8, month: Month) -> Option<NavigationRequest> {
        self.grid
            .cell(day, month)
            .and_then(|cell| select_cell(cell, self.domain))
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        calendar::Intensity,
        currency::RateTable,
        transaction::{Domain, Transaction},
    };

    use super::{CalendarOptions, CalendarSnapshot, DateRange};

    fn get_test_options() -> CalendarOptions {
        CalendarOptions {
            domain: Domain::Expense,
            currency: "USD".to_owned(),
            today: date!(2024 - 06 - 15),
            range: None,
        }
    }

    #[test]
    fn builds_multi_year_calendar() {
        let transactions = vec![
            Transaction::new(1, date!(2023 - 03 - 05), 100.0, "USD"),
            Transaction::new(2, date!(2024 - 03 - 05), 50.0, "USD"),
        ];

        let snapshot =
            CalendarSnapshot::build(&transactions, &get_test_options(), &RateTable::new("USD"));

        let cell = snapshot.grid.cell(5, Month::March).unwrap();
        assert_eq!(cell.count, 2);
        assert_eq!(cell.amount, 150.0);
        assert_eq!(snapshot.transaction_count, 2);
        assert_eq!(snapshot.grid.total_count(), 2);
    }

    #[test]
    fn empty_input_produces_blank_calendar() {
        let snapshot = CalendarSnapshot::build(&[], &get_test_options(), &RateTable::new("USD"));

        assert_eq!(snapshot.grid.cells().len(), 372);
        assert_eq!(snapshot.scale.max_amount_p80, 1.0);
        assert!(
            snapshot
                .grid
                .cells()
                .iter()
                .all(|cell| snapshot.scale.intensity(cell.amount) == Intensity::Empty)
        );
        assert_eq!(snapshot.title(), "Expense calendar: All time (0 transactions)");
    }

    #[test]
    fn range_filters_transactions() {
        let transactions = vec![
            Transaction::new(1, date!(2023 - 12 - 31), 10.0, "USD"),
            Transaction::new(2, date!(2024 - 01 - 01), 20.0, "USD"),
            Transaction::new(3, date!(2024 - 01 - 31), 30.0, "USD"),
            Transaction::new(4, date!(2024 - 02 - 01), 40.0, "USD"),
        ];
        let options = CalendarOptions {
            range: Some(DateRange {
                start: date!(2024 - 01 - 01),
                end: date!(2024 - 01 - 31),
            }),
            ..get_test_options()
        };

        let snapshot = CalendarSnapshot::build(&transactions, &options, &RateTable::new("USD"));

        assert_eq!(snapshot.transaction_count, 2);
        assert_eq!(snapshot.grid.total_count(), 2);
        assert_eq!(
            snapshot.title(),
            "Expense calendar: 2024-01-01 to 2024-01-31 (2 transactions)"
        );
    }

    #[test]
    fn reports_failed_conversions() {
        let transactions = vec![
            Transaction::new(7, date!(2024 - 01 - 01), 10.0, "XYZ"),
            Transaction::new(8, date!(2024 - 01 - 01), 20.0, "USD"),
        ];

        let snapshot =
            CalendarSnapshot::build(&transactions, &get_test_options(), &RateTable::new("USD"));

        assert_eq!(snapshot.failed_conversions, vec![7]);
        assert_eq!(snapshot.grid.cell(1, Month::January).unwrap().count, 2);
        assert_eq!(snapshot.grid.cell(1, Month::January).unwrap().amount, 20.0);
    }

    #[test]
    fn select_maps_clicks_through_the_grid() {
        let transactions = vec![
            Transaction::new(1, date!(2022 - 03 - 05), 1.0, "USD"),
            Transaction::new(2, date!(2023 - 03 - 05), 1.0, "USD"),
            Transaction::new(3, date!(2023 - 03 - 05), 1.0, "USD"),
        ];

        let snapshot =
            CalendarSnapshot::build(&transactions, &get_test_options(), &RateTable::new("USD"));

        let request = snapshot.select(5, Month::March).unwrap();
        assert_eq!(request.domain, Domain::Expense);
        assert_eq!(request.start_date, "2024-03-04");
        assert_eq!(request.end_date, "2024-03-06");
        assert_eq!(snapshot.select(6, Month::March), None);
        assert_eq!(snapshot.select(30, Month::February), None);
    }

    #[test]
    fn description_mentions_currency_and_percentile() {
        let snapshot = CalendarSnapshot::build(
            &[Transaction::new(1, date!(2024 - 01 - 01), 40.0, "USD")],
            &CalendarOptions {
                domain: Domain::Income,
                ..get_test_options()
            },
            &RateTable::new("USD"),
        );

        let description = snapshot.description();
        assert!(description.contains("income"), "{description}");
        assert!(description.contains("USD"), "{description}");
        assert!(description.contains("40.00"), "{description}");
    }
}
