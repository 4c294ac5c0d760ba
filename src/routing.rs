//! Application router configuration.

use axum::{Router, middleware, response::Redirect, routing::get};

use crate::{
    AppState,
    calendar::{
        get_calendar_csv, get_calendar_image, get_calendar_page, get_calendar_svg,
        select_calendar_day,
    },
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{get_expenses_page, get_income_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CALENDAR_VIEW, get(get_calendar_page))
        .route(endpoints::CALENDAR_CSV, get(get_calendar_csv))
        .route(endpoints::CALENDAR_SVG, get(get_calendar_svg))
        .route(endpoints::CALENDAR_IMAGE, get(get_calendar_image))
        .route(endpoints::CALENDAR_SELECT, get(select_calendar_day))
        .route(endpoints::INCOME_VIEW, get(get_income_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_page))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' redirects to the calendar page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CALENDAR_VIEW)
}
