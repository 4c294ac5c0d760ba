//! Maps clicks on calendar cells to the transactions list for the surrounding days.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, calendar::grid::GridCell, transaction::Domain};

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The query string of a list view that is limited to a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeQuery {
    /// The first date to show, formatted as `YYYY-MM-DD`.
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// The last date to show, formatted as `YYYY-MM-DD`.
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// A request to show a domain's transactions between two dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// The list view to open.
    pub domain: Domain,
    /// The first day of the window, formatted as `YYYY-MM-DD`.
    pub start_date: String,
    /// The last day of the window, formatted as `YYYY-MM-DD`.
    pub end_date: String,
}

impl NavigationRequest {
    /// The URI of the domain's list view with `startDate` and `endDate` set.
    ///
    /// # Errors
    /// Returns [Error::QueryEncoding] if the query string cannot be encoded.
    pub fn uri(&self) -> Result<String, Error> {
        let query = serde_urlencoded::to_string(DateRangeQuery {
            start_date: Some(self.start_date.clone()),
            end_date: Some(self.end_date.clone()),
        })
        .map_err(|error| Error::QueryEncoding(error.to_string()))?;

        Ok(format!("{}?{query}", self.domain.list_endpoint()))
    }
}

/// Turn a click on `cell` into a request for the three days centred on the cell's date.
///
/// Clicks on invalid days and days without transactions are ignored and return `None`.
pub fn select_cell(cell: &GridCell, domain: Domain) -> Option<NavigationRequest> {
    if !cell.is_valid_day || cell.count == 0 {
        return None;
    }

    let date = cell.date()?;
    let start = date.previous_day()?;
    let end = date.next_day()?;

    Some(NavigationRequest {
        domain,
        start_date: format_iso_date(start),
        end_date: format_iso_date(end),
    })
}

/// Format `date` as `YYYY-MM-DD`.
pub(crate) fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date in that format.
pub(crate) fn parse_iso_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).map_err(|error| {
        tracing::debug!("could not parse date \"{text}\": {error}");
        Error::InvalidDate(text.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{
        calendar::grid::GridCell,
        endpoints,
        transaction::Domain,
    };

    use super::{NavigationRequest, parse_iso_date, select_cell};

    fn cell(day: u8, month: Month, count: usize, is_valid_day: bool) -> GridCell {
        GridCell {
            day,
            month,
            reference_year: 2024,
            count,
            amount: count as f64 * 10.0,
            is_valid_day,
            is_today: false,
        }
    }

    #[test]
    fn click_on_busy_day_requests_three_day_window() {
        let request = select_cell(&cell(5, Month::March, 3, true), Domain::Expense).unwrap();

        assert_eq!(
            request,
            NavigationRequest {
                domain: Domain::Expense,
                start_date: "2024-03-04".to_owned(),
                end_date: "2024-03-06".to_owned(),
            }
        );
        assert_eq!(
            request.uri().unwrap(),
            format!(
                "{}?startDate=2024-03-04&endDate=2024-03-06",
                endpoints::EXPENSES_VIEW
            )
        );
    }

    #[test]
    fn click_on_invalid_day_is_ignored() {
        assert_eq!(select_cell(&cell(30, Month::February, 0, false), Domain::Expense), None);
        // Invalid cells never carry transactions, but the check does not rely on that.
        assert_eq!(select_cell(&cell(30, Month::February, 2, false), Domain::Expense), None);
    }

    #[test]
    fn click_on_empty_day_is_ignored() {
        assert_eq!(select_cell(&cell(5, Month::March, 0, true), Domain::Income), None);
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        let new_year = select_cell(&cell(1, Month::January, 1, true), Domain::Income).unwrap();
        assert_eq!(new_year.start_date, "2023-12-31");
        assert_eq!(new_year.end_date, "2024-01-02");

        let leap_day = select_cell(&cell(29, Month::February, 1, true), Domain::Income).unwrap();
        assert_eq!(leap_day.start_date, "2024-02-28");
        assert_eq!(leap_day.end_date, "2024-03-01");
    }

    #[test]
    fn income_clicks_navigate_to_income_view() {
        let request = select_cell(&cell(10, Month::May, 1, true), Domain::Income).unwrap();

        assert!(request.uri().unwrap().starts_with(endpoints::INCOME_VIEW));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_iso_date("2024-03-05"), Ok(date!(2024 - 03 - 05)));
        assert!(parse_iso_date("2024-02-30").is_err());
        assert!(parse_iso_date("05/03/2024").is_err());
    }
}
