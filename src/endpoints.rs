//! The endpoint URIs.

/// The root route which redirects to the calendar.
pub const ROOT: &str = "/";
/// The interactive calendar heatmap.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The calendar grid as a CSV download.
pub const CALENDAR_CSV: &str = "/calendar/export.csv";
/// The calendar as an SVG document.
pub const CALENDAR_SVG: &str = "/calendar/export.svg";
/// The calendar as a PNG, or SVG when no rasterizer is available.
pub const CALENDAR_IMAGE: &str = "/calendar/export.image";
/// Turns a click on a calendar cell into a redirect to a list view.
pub const CALENDAR_SELECT: &str = "/calendar/select";
/// The page listing income transactions.
pub const INCOME_VIEW: &str = "/income";
/// The page listing expense transactions.
pub const EXPENSES_VIEW: &str = "/expenses";
