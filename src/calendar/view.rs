//! The interactive calendar page.

use maud::{Markup, PreEscaped, html};

use crate::{
    Error,
    calendar::{
        grid::{GridCell, MONTHS, month_abbreviation},
        interaction::select_cell,
        pipeline::CalendarSnapshot,
        query::{CalendarQuery, SelectQuery},
        scale::Intensity,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, format_currency, plural,
    },
    navigation::NavBar,
    transaction::Domain,
};

const GRID_STYLE: &str = r#"
    #calendar-grid { border-collapse: separate; border-spacing: 2px; font-size: 0.75rem; }
    #calendar-grid th { font-weight: normal; color: #374151; }
    #calendar-grid td { min-width: 3rem; height: 1rem; padding: 0; border-radius: 2px; }
    #calendar-grid td.invalid { opacity: 0.3; }
    #calendar-grid td.today { outline: 2px solid #1d4ed8; }
    #calendar-grid td a { display: block; width: 100%; height: 100%; }
    .toolbar { display: flex; flex-wrap: wrap; align-items: flex-end; gap: 1rem; }
    .legend { display: flex; align-items: center; gap: 4px; font-size: 0.75rem; }
    .swatch { display: inline-block; width: 12px; height: 12px; border-radius: 2px; }
"#;

const LEGEND_STEPS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// Render the calendar page for `snapshot`.
///
/// `query` is the request the snapshot was built from, it is reused for the
/// export, domain and click-through links.
///
/// # Errors
/// Returns [Error::QueryEncoding] if a link cannot be built.
pub fn calendar_view(snapshot: &CalendarSnapshot, query: &CalendarQuery) -> Result<Markup, Error> {
    let cell_links = snapshot
        .grid
        .cells()
        .iter()
        .map(|cell| cell_link(snapshot.domain, query, cell))
        .collect::<Result<Vec<_>, _>>()?;

    let domain_links = Domain::ALL
        .iter()
        .map(|domain| {
            query
                .with_domain(*domain)
                .to_query_string()
                .map(|text| (*domain, format!("{}?{text}", endpoints::CALENDAR_VIEW)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let export_query = query.to_query_string()?;
    let exports = [
        ("CSV", endpoints::CALENDAR_CSV),
        ("SVG", endpoints::CALENDAR_SVG),
        ("Image", endpoints::CALENDAR_IMAGE),
    ];

    let palette = snapshot.domain.palette();
    let scale = &snapshot.scale;
    let failed = snapshot.failed_conversions.len();
    let unplaced = snapshot.grid.unplaced_count();

    let content = html!(
        (NavBar::new(endpoints::CALENDAR_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 { (snapshot.title()) }

            p id="description" { (snapshot.description()) }

            div class="toolbar"
            {
                div id="domain-switch"
                {
                    @for (domain, url) in &domain_links {
                        @if *domain == snapshot.domain {
                            strong { (domain.label()) }
                        } @else {
                            a href=(url) class=(LINK_STYLE) { (domain.label()) }
                        }
                        " "
                    }
                }

                form method="get" action=(endpoints::CALENDAR_VIEW) class="toolbar"
                {
                    input type="hidden" name="domain" value=(snapshot.domain.as_query_value());

                    div
                    {
                        label for="start" class=(FORM_LABEL_STYLE) { "From" }
                        input
                            type="date"
                            id="start"
                            name="start"
                            value=[query.start.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="end" class=(FORM_LABEL_STYLE) { "To" }
                        input
                            type="date"
                            id="end"
                            name="end"
                            value=[query.end.as_deref()]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }
                        input
                            type="text"
                            id="currency"
                            name="currency"
                            value=(snapshot.currency)
                            size="4"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
                }
            }

            @if failed > 0 {
                p id="conversion-warning" class="alert"
                {
                    (failed) " " (plural(failed, "transaction", "transactions"))
                    " could not be converted to " (snapshot.currency)
                    " and " (plural(failed, "is", "are")) " counted without an amount."
                }
            }

            @if unplaced > 0 {
                p id="unplaced-note" class="alert"
                {
                    (unplaced) " " (plural(unplaced, "transaction", "transactions"))
                    " on February 29 " (plural(unplaced, "is", "are")) " not shown because "
                    (snapshot.grid.reference_year()) " is not a leap year."
                }
            }

            div style="overflow-x: auto"
            {
                table id="calendar-grid"
                {
                    thead
                    {
                        tr
                        {
                            th scope="col" {}
                            @for month in MONTHS {
                                th scope="col" { (month_abbreviation(month)) }
                            }
                        }
                    }

                    tbody
                    {
                        @for (row, links) in snapshot.grid.cells().chunks(MONTHS.len())
                            .zip(cell_links.chunks(MONTHS.len()))
                        {
                            tr
                            {
                                th scope="row" { (row[0].day) }

                                @for (cell, link) in row.iter().zip(links) {
                                    td
                                        data-day=(cell.day)
                                        data-month=(u8::from(cell.month))
                                        data-count=(cell.count)
                                        data-amount=(format!("{:.2}", cell.amount))
                                        class=[cell_class(cell)]
                                        style={
                                            "background-color: "
                                            (palette.fill(scale.intensity(cell.amount)).to_string())
                                        }
                                        title=(cell_tooltip(cell, &snapshot.currency))
                                    {
                                        @if let Some(link) = link {
                                            a href=(link) aria-label=(cell.date_label()) {}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div class="legend" id="legend"
            {
                span { (format_currency(scale.min_positive_amount.unwrap_or(0.0), &snapshot.currency)) }

                @for step in LEGEND_STEPS {
                    span
                        class="swatch"
                        style={ "background-color: " (palette.fill(Intensity::Scaled(step)).to_string()) }
                    {}
                }

                span
                {
                    (format_currency(scale.max_amount_p80, &snapshot.currency))
                    " and above (80th percentile)"
                }
            }

            p id="exports"
            {
                "Download: "
                @for (label, endpoint) in exports {
                    a href={ (endpoint) "?" (export_query) } class=(LINK_STYLE) download { (label) }
                    " "
                }
            }
        }
    );

    Ok(base(
        "Calendar",
        &[HeadElement::Style(PreEscaped(GRID_STYLE.to_owned()))],
        &content,
    ))
}

/// The click-through link for `cell`, or `None` if clicks on it are ignored.
fn cell_link(
    domain: Domain,
    query: &CalendarQuery,
    cell: &GridCell,
) -> Result<Option<String>, Error> {
    if select_cell(cell, domain).is_none() {
        return Ok(None);
    }

    SelectQuery::new(query, cell.day, cell.month)
        .to_query_string()
        .map(|text| Some(format!("{}?{text}", endpoints::CALENDAR_SELECT)))
}

fn cell_class(cell: &GridCell) -> Option<&'static str> {
    match (cell.is_valid_day, cell.is_today) {
        (false, _) => Some("invalid"),
        (true, true) => Some("today"),
        (true, false) => None,
    }
}

fn cell_tooltip(cell: &GridCell, currency: &str) -> String {
    if !cell.is_valid_day {
        return format!("{} does not exist", cell.date_label());
    }

    format!(
        "{}: {} {}, {}",
        cell.date_label(),
        cell.count,
        plural(cell.count, "transaction", "transactions"),
        format_currency(cell.amount, currency)
    )
}
