//! Query strings accepted by the calendar endpoints.

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    calendar::{
        interaction::parse_iso_date,
        pipeline::{CalendarOptions, DateRange},
    },
    transaction::Domain,
};

/// Selects which calendar to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarQuery {
    /// The domain to show, defaults to expenses.
    #[serde(default)]
    pub domain: Domain,
    /// The display currency, defaults to the server's currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// The first date to include, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The last date to include, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// The available width in pixels for image exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl CalendarQuery {
    /// Resolve the query into pipeline options.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if a date cannot be parsed and
    /// [Error::InvalidDateRange] if only one end of the range is given or the
    /// start is after the end.
    pub fn to_options(&self, default_currency: &str, today: Date) -> Result<CalendarOptions, Error> {
        let start = self.start.as_deref().filter(|text| !text.is_empty());
        let end = self.end.as_deref().filter(|text| !text.is_empty());

        let range = match (start, end) {
            (None, None) => None,
            (Some(start), Some(end)) => {
                let start = parse_iso_date(start)?;
                let end = parse_iso_date(end)?;

                if start > end {
                    return Err(Error::InvalidDateRange(format!(
                        "start date {start} is after end date {end}"
                    )));
                }

                Some(DateRange { start, end })
            }
            _ => {
                return Err(Error::InvalidDateRange(
                    "both a start and an end date are required".to_owned(),
                ));
            }
        };

        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(default_currency)
            .to_ascii_uppercase();

        Ok(CalendarOptions {
            domain: self.domain,
            currency,
            today,
            range,
        })
    }

    /// The same query for another domain.
    pub fn with_domain(&self, domain: Domain) -> Self {
        Self {
            domain,
            ..self.clone()
        }
    }

    /// Encode the query for use in a link.
    ///
    /// # Errors
    /// Returns [Error::QueryEncoding] if the query cannot be encoded.
    pub fn to_query_string(&self) -> Result<String, Error> {
        serde_urlencoded::to_string(self).map_err(|error| Error::QueryEncoding(error.to_string()))
    }
}

/// A click on a calendar cell.
///
/// Repeats the [CalendarQuery] fields because flattened structs cannot hold
/// numbers in URL encoded forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// The transactions shown on the calendar.
    #[serde(default)]
    pub domain: Domain,
    /// The display currency, if not the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// The first day of the date range filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The last day of the date range filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// The day of the month of the clicked cell, 1 to 31.
    pub day: u8,
    /// The month of the clicked cell, 1 to 12.
    pub month: u8,
}

impl SelectQuery {
    /// A click on `day` of `month` for the calendar described by `query`.
    pub fn new(query: &CalendarQuery, day: u8, month: Month) -> Self {
        Self {
            domain: query.domain,
            currency: query.currency.clone(),
            start: query.start.clone(),
            end: query.end.clone(),
            day,
            month: u8::from(month),
        }
    }

    /// The calendar the click was made on.
    pub fn calendar_query(&self) -> CalendarQuery {
        CalendarQuery {
            domain: self.domain,
            currency: self.currency.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            width: None,
        }
    }

    /// The clicked cell as a day and month.
    ///
    /// # Errors
    /// Returns [Error::NoSuchCell] if the day or month is outside the grid.
    pub fn cell(&self) -> Result<(u8, Month), Error> {
        let month =
            Month::try_from(self.month).map_err(|_| Error::NoSuchCell(self.day, self.month))?;

        if !(1..=31).contains(&self.day) {
            return Err(Error::NoSuchCell(self.day, self.month));
        }

        Ok((self.day, month))
    }

    /// Encode the query for use in a link.
    ///
    /// # Errors
    /// Returns [Error::QueryEncoding] if the query cannot be encoded.
    pub fn to_query_string(&self) -> Result<String, Error> {
        serde_urlencoded::to_string(self).map_err(|error| Error::QueryEncoding(error.to_string()))
    }
}
