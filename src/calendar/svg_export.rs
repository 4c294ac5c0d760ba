//! Self-contained SVG export of the calendar heatmap.
//!
//! The image reproduces the interactive grid: one column per month, one row
//! per day of the month, cells filled with the same colours as the page.

use maud::html;

use crate::{
    calendar::{
        grid::{DAYS_IN_GRID, GridCell, MONTHS, month_abbreviation},
        pipeline::CalendarSnapshot,
        scale::Intensity,
    },
    html::plural,
};

/// The width used when the caller does not give one.
pub const DEFAULT_SVG_WIDTH: u32 = 960;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

const LEFT_GUTTER: f64 = 36.0;
const RIGHT_PADDING: f64 = 12.0;
const MIN_CELL_WIDTH: f64 = 16.0;
const TITLE_HEIGHT: f64 = 36.0;
const HEADER_HEIGHT: f64 = 18.0;
const ROW_HEIGHT: f64 = 16.0;
const CELL_GAP: f64 = 2.0;
const LEGEND_HEIGHT: f64 = 40.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_STEPS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

const BACKGROUND: &str = "#ffffff";
const TEXT_COLOUR: &str = "#374151";
const TODAY_OUTLINE: &str = "#1d4ed8";
const INVALID_OPACITY: &str = "0.3";

/// The geometry of the image for a given width.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    width: f64,
    height: f64,
    display_width: f64,
    display_height: f64,
    column_width: f64,
    grid_top: f64,
    legend_top: f64,
}

impl Layout {
    /// Below the minimum column width the drawing keeps its geometry and the
    /// document size is scaled down through the `viewBox` instead.
    fn for_width(available_width: u32) -> Self {
        let available_width = f64::from(available_width);
        let usable = available_width - LEFT_GUTTER - RIGHT_PADDING;
        let column_width = (usable / MONTHS.len() as f64).floor().max(MIN_CELL_WIDTH);
        let width = LEFT_GUTTER + column_width * MONTHS.len() as f64 + RIGHT_PADDING;

        let grid_top = TITLE_HEIGHT + HEADER_HEIGHT;
        let legend_top = grid_top + ROW_HEIGHT * f64::from(DAYS_IN_GRID) + CELL_GAP * 4.0;
        let height = legend_top + LEGEND_HEIGHT;

        let display_width = width.min(available_width);

        Self {
            width,
            height,
            display_width,
            display_height: height * display_width / width,
            column_width,
            grid_top,
            legend_top,
        }
    }

    fn cell_x(&self, cell: &GridCell) -> f64 {
        LEFT_GUTTER + self.column_width * cell.month_index() as f64
    }

    fn row_y(&self, day: u8) -> f64 {
        self.grid_top + ROW_HEIGHT * f64::from(day - 1)
    }
}

/// Render `snapshot` as a standalone SVG document that fits `available_width` pixels.
///
/// The output only depends on the snapshot and the width, so the same inputs
/// always produce the same bytes.
pub fn render_svg(snapshot: &CalendarSnapshot, available_width: u32) -> String {
    let layout = Layout::for_width(available_width);
    let palette = snapshot.domain.palette();
    let scale = &snapshot.scale;
    let title = snapshot.title();

    let min_label = format!("{:.2}", scale.min_positive_amount.unwrap_or(0.0));
    let max_label = format!("{:.2}", scale.max_amount_p80);
    let legend_x = LEFT_GUTTER + 40.0;

    let markup = html! {
        svg
            xmlns="http://www.w3.org/2000/svg"
            width=(px(layout.display_width))
            height=(px(layout.display_height))
            viewBox={ "0 0 " (px(layout.width)) " " (px(layout.height)) }
            font-family="sans-serif"
        {
            title { (title) }
            desc { (snapshot.description()) }

            rect
                x="0"
                y="0"
                width=(px(layout.width))
                height=(px(layout.height))
                fill=(BACKGROUND)
            {}

            text
                x=(px(LEFT_GUTTER))
                y=(px(TITLE_HEIGHT - 12.0))
                font-size="16"
                font-weight="bold"
                fill=(TEXT_COLOUR)
            {
                (title)
            }

            @for (index, month) in MONTHS.iter().enumerate() {
                text
                    x=(px(LEFT_GUTTER + layout.column_width * (index as f64 + 0.5)))
                    y=(px(layout.grid_top - 6.0))
                    font-size="11"
                    text-anchor="middle"
                    fill=(TEXT_COLOUR)
                {
                    (month_abbreviation(*month))
                }
            }

            @for day in 1..=DAYS_IN_GRID {
                text
                    x=(px(LEFT_GUTTER - 6.0))
                    y=(px(layout.row_y(day) + ROW_HEIGHT - 5.0))
                    font-size="10"
                    text-anchor="end"
                    fill=(TEXT_COLOUR)
                {
                    (day)
                }
            }

            @for cell in snapshot.grid.cells() {
                rect
                    x=(px(layout.cell_x(cell)))
                    y=(px(layout.row_y(cell.day)))
                    width=(px(layout.column_width - CELL_GAP))
                    height=(px(ROW_HEIGHT - CELL_GAP))
                    rx="2"
                    fill=(palette.fill(scale.intensity(cell.amount)).to_string())
                    opacity=[(!cell.is_valid_day).then_some(INVALID_OPACITY)]
                    stroke=[cell.is_today.then_some(TODAY_OUTLINE)]
                    stroke-width=[cell.is_today.then_some("2")]
                {
                    title {
                        (cell.date_label()) ": " (cell.count) " "
                        (plural(cell.count, "transaction", "transactions")) ", "
                        (format!("{:.2}", cell.amount)) " " (snapshot.currency)
                    }
                }
            }

            text
                x=(px(LEFT_GUTTER))
                y=(px(layout.legend_top + LEGEND_SWATCH - 2.0))
                font-size="10"
                fill=(TEXT_COLOUR)
            {
                (min_label)
            }

            @for (step, intensity) in LEGEND_STEPS.iter().enumerate() {
                rect
                    x=(px(legend_x + (LEGEND_SWATCH + CELL_GAP) * step as f64))
                    y=(px(layout.legend_top))
                    width=(px(LEGEND_SWATCH))
                    height=(px(LEGEND_SWATCH))
                    rx="2"
                    fill=(palette.fill(Intensity::Scaled(*intensity)).to_string())
                {}
            }

            text
                x=(px(legend_x + (LEGEND_SWATCH + CELL_GAP) * LEGEND_STEPS.len() as f64 + 4.0))
                y=(px(layout.legend_top + LEGEND_SWATCH - 2.0))
                font-size="10"
                fill=(TEXT_COLOUR)
            {
                (max_label) " " (snapshot.currency) " and above (80th percentile)"
            }
        }
    };

    format!("{XML_DECLARATION}{}", markup.into_string())
}

fn px(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        calendar::pipeline::{CalendarOptions, CalendarSnapshot},
        currency::RateTable,
        transaction::{Domain, Transaction},
    };

    use super::{DEFAULT_SVG_WIDTH, Layout, render_svg};

    fn get_test_snapshot(transactions: &[Transaction]) -> CalendarSnapshot {
        CalendarSnapshot::build(
            transactions,
            &CalendarOptions {
                domain: Domain::Expense,
                currency: "USD".to_owned(),
                today: date!(2023 - 03 - 05),
                range: None,
            },
            &RateTable::new("USD"),
        )
    }

    fn parse_svg(text: &str) -> Html {
        Html::parse_fragment(text.trim_start_matches(super::XML_DECLARATION))
    }

    #[test]
    fn draws_one_rect_per_cell_plus_background_and_legend() {
        let svg = render_svg(&get_test_snapshot(&[]), DEFAULT_SVG_WIDTH);

        assert!(svg.starts_with("<?xml"));
        let html = parse_svg(&svg);
        let rects = Selector::parse("rect").unwrap();
        assert_eq!(html.select(&rects).count(), 372 + 1 + 5);
    }

    #[test]
    fn invalid_cells_are_translucent() {
        let svg = render_svg(&get_test_snapshot(&[]), DEFAULT_SVG_WIDTH);

        let html = parse_svg(&svg);
        let translucent = Selector::parse("rect[opacity='0.3']").unwrap();
        // 2023 is not a leap year: Feb 29-31, Apr/Jun/Sep/Nov 31.
        assert_eq!(html.select(&translucent).count(), 7);
    }

    #[test]
    fn today_cell_is_outlined() {
        let transactions = [Transaction::new(1, date!(2023 - 03 - 05), 10.0, "USD")];

        let svg = render_svg(&get_test_snapshot(&transactions), DEFAULT_SVG_WIDTH);

        let html = parse_svg(&svg);
        let outlined = Selector::parse("rect[stroke]").unwrap();
        let cells: Vec<_> = html.select(&outlined).collect();
        assert_eq!(cells.len(), 1);
        assert!(cells[0].text().collect::<String>().starts_with("Mar 5: 1 transaction, "));
    }

    #[test]
    fn legend_shows_scale_bounds() {
        let transactions = [
            Transaction::new(1, date!(2023 - 01 - 01), 5.0, "USD"),
            Transaction::new(2, date!(2023 - 01 - 02), 250.0, "USD"),
        ];

        let svg = render_svg(&get_test_snapshot(&transactions), DEFAULT_SVG_WIDTH);

        assert!(svg.contains(">5.00<"), "{svg}");
        assert!(svg.contains("250.00 USD and above (80th percentile)"), "{svg}");
    }

    #[test]
    fn output_is_deterministic() {
        let transactions = [
            Transaction::new(1, date!(2022 - 07 - 04), 12.0, "USD"),
            Transaction::new(2, date!(2023 - 07 - 04), 30.0, "USD"),
        ];

        let first = render_svg(&get_test_snapshot(&transactions), 800);
        let second = render_svg(&get_test_snapshot(&transactions), 800);

        assert_eq!(first, second);
    }

    #[test]
    fn columns_fit_available_width() {
        let layout = Layout::for_width(960);
        assert_eq!(layout.column_width, 76.0);
        assert!(layout.width <= 960.0);

        let narrow = Layout::for_width(100);
        assert_eq!(narrow.column_width, 16.0);
    }

    #[test]
    fn narrow_document_fits_available_width() {
        for available_width in [0, 1, 100, 200, 239, 240, 241, 300] {
            let layout = Layout::for_width(available_width);

            assert!(
                layout.display_width <= f64::from(available_width),
                "{available_width}: {layout:?}"
            );
            assert!(layout.display_height <= layout.height);
        }

        let svg = render_svg(&get_test_snapshot(&[]), 200);
        let html = parse_svg(&svg);
        let root = Selector::parse("svg").unwrap();
        let root = html.select(&root).next().unwrap();
        assert_eq!(root.value().attr("width"), Some("200.0"));
        assert_eq!(root.value().attr("height"), Some("498.3"));
        assert_eq!(root.value().attr("viewbox").or(root.value().attr("viewBox")), Some("0 0 240.0 598.0"));
    }

    #[test]
    fn tooltip_pluralises_count() {
        let transactions = [
            Transaction::new(1, date!(2023 - 01 - 01), 10.0, "USD"),
            Transaction::new(2, date!(2023 - 01 - 02), 10.0, "USD"),
            Transaction::new(3, date!(2023 - 01 - 02), 10.0, "USD"),
        ];

        let svg = render_svg(&get_test_snapshot(&transactions), DEFAULT_SVG_WIDTH);

        assert!(svg.contains("Jan 1: 1 transaction, 10.00 USD"), "{svg}");
        assert!(svg.contains("Jan 2: 2 transactions, 20.00 USD"), "{svg}");
    }
}
