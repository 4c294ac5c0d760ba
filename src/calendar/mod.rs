//! Calendar heatmap module
//!
//! Rolls transactions from every year onto a single 31 day by 12 month grid,
//! scales the daily amounts into colour intensities, and exports the same grid
//! as an HTML page, a CSV table and an SVG image.
//!
//! The pipeline is pure and recomputed on every request:
//! transactions → [aggregate_by_day] → [build_grid] → [compute_scale] → views and exports.

mod aggregation;
mod csv_export;
mod grid;
mod handlers;
mod interaction;
mod pipeline;
mod query;
mod raster;
mod scale;
mod svg_export;
mod view;

pub use aggregation::{Aggregation, DateBucket, DateKey, aggregate_by_day};
pub use csv_export::{ActivityLevel, CalendarRow, calendar_rows, write_csv};
pub use grid::{
    CalendarGrid, DAYS_IN_GRID, GridCell, MONTHS, build_grid, last_day_of_month,
    month_abbreviation,
};
pub use handlers::{
    CalendarState, get_calendar_csv, get_calendar_image, get_calendar_page, get_calendar_svg,
    select_calendar_day,
};
pub use interaction::{DateRangeQuery, NavigationRequest, select_cell};
pub(crate) use interaction::{format_iso_date, parse_iso_date};
pub use pipeline::{CalendarOptions, CalendarSnapshot, DateRange};
pub use query::{CalendarQuery, SelectQuery};
pub use raster::{ImageExport, RasterError, Rasterizer, export_image};
pub use scale::{Intensity, Palette, Rgb, ScaleContext, compute_scale};
pub use svg_export::{DEFAULT_SVG_WIDTH, render_svg};
