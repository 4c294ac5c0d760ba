//! The read-only lists of income and expense transactions.
//!
//! A click on a calendar cell lands here with `startDate` and `endDate` set to
//! the three days around the clicked date.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    calendar::{CalendarQuery, DateRangeQuery, format_iso_date, parse_iso_date},
    endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency, link,
    },
    navigation::NavBar,
    transaction::{Domain, Ledger, Transaction},
};

/// The state needed for the transaction list pages.
#[derive(Debug, Clone)]
pub struct TransactionListState {
    /// The transactions to list.
    pub ledger: Arc<Ledger>,
}

impl FromRef<AppState> for TransactionListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
        }
    }
}

/// Display the income transactions, optionally limited to a date range.
pub async fn get_income_page(
    State(state): State<TransactionListState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, Error> {
    list_page(Domain::Income, &state.ledger, &query)
}

/// Display the expense transactions, optionally limited to a date range.
pub async fn get_expenses_page(
    State(state): State<TransactionListState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, Error> {
    list_page(Domain::Expense, &state.ledger, &query)
}

fn list_page(domain: Domain, ledger: &Ledger, query: &DateRangeQuery) -> Result<Response, Error> {
    let start = parse_optional_date(query.start_date.as_deref())?;
    let end = parse_optional_date(query.end_date.as_deref())?;

    let mut transactions: Vec<&Transaction> = ledger
        .transactions(domain)
        .iter()
        .filter(|transaction| start.is_none_or(|start| start <= transaction.date))
        .filter(|transaction| end.is_none_or(|end| transaction.date <= end))
        .collect();
    transactions.sort_by_key(|transaction| (transaction.date, transaction.id));

    tracing::debug!(
        "Showing {} of {} {} transactions",
        transactions.len(),
        ledger.transactions(domain).len(),
        domain.as_query_value()
    );

    let range_label = match (start, end) {
        (None, None) => "All time".to_owned(),
        (start, end) => format!(
            "{} to {}",
            start.map_or_else(|| "the beginning".to_owned(), format_iso_date),
            end.map_or_else(|| "today".to_owned(), format_iso_date)
        ),
    };

    let calendar_url = CalendarQuery {
        domain,
        ..Default::default()
    }
    .to_query_string()
    .map(|query| format!("{}?{query}", endpoints::CALENDAR_VIEW))?;

    Ok(list_view(domain, &range_label, &transactions, &calendar_url).into_response())
}

fn parse_optional_date(text: Option<&str>) -> Result<Option<time::Date>, Error> {
    text.filter(|text| !text.is_empty())
        .map(parse_iso_date)
        .transpose()
}

fn list_view(
    domain: Domain,
    range_label: &str,
    transactions: &[&Transaction],
    calendar_url: &str,
) -> Markup {
    let nav_bar = NavBar::new(domain.list_endpoint()).into_html();
    let title = match domain {
        Domain::Income => "Income",
        Domain::Expense => "Expenses",
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 { (title) ": " (range_label) }

            @if transactions.is_empty() {
                p id="empty-state"
                {
                    "No transactions in this range. Go back to the "
                    (link(calendar_url, "calendar"))
                    "."
                }
            } @else {
                table id="transactions"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (format_iso_date(transaction.date)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (format_currency(transaction.amount, &transaction.currency))
                                }
                                td class=(TABLE_CELL_STYLE) { (transaction.id) }
                            }
                        }
                    }
                }

                p { (link(calendar_url, "Back to the calendar")) }
            }
        }
    );

    base(title, &[], &content)
}
