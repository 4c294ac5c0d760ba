//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{html::error_view, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transactions file could not be read.
    ///
    /// Callers should pass in the file path and the original error as a string.
    #[error("could not read \"{0}\": {1}")]
    ReadFile(String, String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A date in a query string was not formatted as `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The requested date range is incomplete or reversed.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// An exchange rate given on the command line could not be used.
    #[error("invalid exchange rate: {0}")]
    InvalidRate(String),

    /// A click referred to a day and month outside the calendar grid.
    #[error("there is no calendar cell for day {0} of month {1}")]
    NoSuchCell(u8, u8),

    /// The calendar could not be exported.
    #[error("export failed: {0}")]
    ExportError(String),

    /// A query string could not be encoded for a link.
    #[error("could not encode query string: {0}")]
    QueryEncoding(String),
}

impl Error {
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDate(_) | Error::InvalidDateRange(_) | Error::NoSuchCell(_, _)
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            error if error.is_client_error() => {
                tracing::debug!("Rejected request: {error}");
                (
                    StatusCode::BAD_REQUEST,
                    Html(
                        error_view(
                            "Bad Request",
                            "400",
                            &error.to_string(),
                            "Check the dates in the address bar and try again.",
                        )
                        .into_string(),
                    ),
                )
                    .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn bad_dates_are_client_errors() {
        for error in [
            Error::InvalidDate("tomorrow".to_owned()),
            Error::InvalidDateRange("both a start and an end date are required".to_owned()),
            Error::NoSuchCell(32, 1),
        ] {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn other_errors_are_server_errors() {
        for error in [
            Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()),
            Error::ExportError("disk full".to_owned()),
            Error::QueryEncoding("bad".to_owned()),
        ] {
            assert_eq!(
                error.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
