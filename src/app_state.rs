//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::{calendar::Rasterizer, currency::CurrencyConverter, transaction::Ledger};

/// The state of the server.
///
/// Everything is read-only after start up, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// The income and expense transactions.
    pub ledger: Arc<Ledger>,

    /// Converts transaction amounts into the display currency.
    pub converter: Arc<dyn CurrencyConverter + Send + Sync>,

    /// The currency used when a request does not ask for one, e.g. "USD".
    pub display_currency: String,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Turns SVG exports into PNG images, if one is available.
    pub rasterizer: Option<Arc<dyn Rasterizer + Send + Sync>>,
}

impl AppState {
    /// Create a new [AppState] without a rasterizer.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(
        ledger: Ledger,
        converter: impl CurrencyConverter + Send + Sync + 'static,
        display_currency: &str,
        local_timezone: &str,
    ) -> Self {
        Self {
            ledger: Arc::new(ledger),
            converter: Arc::new(converter),
            display_currency: display_currency.trim().to_ascii_uppercase(),
            local_timezone: local_timezone.to_owned(),
            rasterizer: None,
        }
    }

    /// Use `rasterizer` for image exports.
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + Send + Sync + 'static) -> Self {
        self.rasterizer = Some(Arc::new(rasterizer));
        self
    }
}
