//! Calendar HTTP handlers.
//!
//! Every handler rebuilds the snapshot from the shared transactions, so the
//! page, the exports and click-through always agree with each other.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState, Error,
    calendar::{
        csv_export::write_csv,
        pipeline::CalendarSnapshot,
        query::{CalendarQuery, SelectQuery},
        raster::{ImageExport, Rasterizer, export_image},
        svg_export::{DEFAULT_SVG_WIDTH, render_svg},
        view::calendar_view,
    },
    currency::CurrencyConverter,
    timezone::get_local_date,
    transaction::Ledger,
};

/// The state needed for the calendar page and its exports.
#[derive(Clone)]
pub struct CalendarState {
    /// The transactions for both domains.
    pub ledger: Arc<Ledger>,
    /// Converts transaction amounts into the display currency.
    pub converter: Arc<dyn CurrencyConverter + Send + Sync>,
    /// The currency used when the query does not set one.
    pub display_currency: String,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The optional PNG rasterizer for image exports.
    pub rasterizer: Option<Arc<dyn Rasterizer + Send + Sync>>,
}

impl FromRef<AppState> for CalendarState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            converter: state.converter.clone(),
            display_currency: state.display_currency.clone(),
            local_timezone: state.local_timezone.clone(),
            rasterizer: state.rasterizer.clone(),
        }
    }
}

/// Display the interactive calendar heatmap.
pub async fn get_calendar_page(
    State(state): State<CalendarState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let snapshot = build_snapshot(&state, &query)?;

    Ok(calendar_view(&snapshot, &query)?.into_response())
}

/// Download the calendar grid as CSV.
pub async fn get_calendar_csv(
    State(state): State<CalendarState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let snapshot = build_snapshot(&state, &query)?;
    let csv = write_csv(&snapshot.grid)?;

    Ok(attachment(
        "text/csv; charset=utf-8",
        &file_name(&snapshot, "csv"),
        csv,
    ))
}

/// Download the calendar as an SVG document sized for `width`.
pub async fn get_calendar_svg(
    State(state): State<CalendarState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let snapshot = build_snapshot(&state, &query)?;
    let svg = render_svg(&snapshot, query.width.unwrap_or(DEFAULT_SVG_WIDTH));

    Ok(attachment("image/svg+xml", &file_name(&snapshot, "svg"), svg))
}

/// Download the calendar as a PNG, or as SVG if it cannot be rasterized.
pub async fn get_calendar_image(
    State(state): State<CalendarState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let snapshot = build_snapshot(&state, &query)?;
    let rasterizer = state
        .rasterizer
        .as_deref()
        .map(|rasterizer| rasterizer as &dyn Rasterizer);

    let response = match export_image(
        &snapshot,
        query.width.unwrap_or(DEFAULT_SVG_WIDTH),
        rasterizer,
    ) {
        ImageExport::Bitmap(png) => attachment("image/png", &file_name(&snapshot, "png"), png),
        ImageExport::Vector(svg) => {
            attachment("image/svg+xml", &file_name(&snapshot, "svg"), svg)
        }
    };

    Ok(response)
}

/// Handle a click on a calendar cell.
///
/// Redirects to the domain's list view for the three days around the clicked
/// date, or responds with no content when the click is ignored.
pub async fn select_calendar_day(
    State(state): State<CalendarState>,
    Query(select): Query<SelectQuery>,
) -> Result<Response, Error> {
    let (day, month) = select.cell()?;
    let snapshot = build_snapshot(&state, &select.calendar_query())?;

    match snapshot.select(day, month) {
        Some(request) => Ok(Redirect::to(&request.uri()?).into_response()),
        None => {
            tracing::debug!("Ignoring click on {month} {day}");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

fn build_snapshot(state: &CalendarState, query: &CalendarQuery) -> Result<CalendarSnapshot, Error> {
    let today = get_local_date(&state.local_timezone)?;
    let options = query.to_options(&state.display_currency, today)?;

    let snapshot = CalendarSnapshot::build(
        state.ledger.transactions(options.domain),
        &options,
        state.converter.as_ref(),
    );

    tracing::debug!(
        "Built {} calendar from {} transactions, {} without an amount in {}",
        options.domain.as_query_value(),
        snapshot.transaction_count,
        snapshot.failed_conversions.len(),
        snapshot.currency
    );

    Ok(snapshot)
}

fn file_name(snapshot: &CalendarSnapshot, extension: &str) -> String {
    format!("{}-calendar.{extension}", snapshot.domain.as_query_value())
}

fn attachment(content_type: &'static str, file_name: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}
