use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use transaction_calendar::{
    AppState, Error, build_router,
    currency::{RateTable, parse_rate},
    get_local_date, graceful_shutdown,
    transaction::{Ledger, Transaction, load_transactions},
};

/// Serves a calendar heatmap of income and expense transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with the income transactions, columns `id,date,amount,currency`.
    #[arg(long)]
    income_csv: Option<PathBuf>,

    /// CSV file with the expense transactions, columns `id,date,amount,currency`.
    #[arg(long)]
    expense_csv: Option<PathBuf>,

    /// The currency amounts are shown in unless a request asks for another.
    #[arg(long, default_value = "USD")]
    currency: String,

    /// An exchange rate as `CODE=UNITS`, the units of CODE per one unit of the
    /// display currency. May be repeated.
    #[arg(long = "rate", value_name = "CODE=UNITS")]
    rates: Vec<String>,

    /// The canonical timezone used to decide what day it is, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = setup_logging() {
        eprintln!("Could not create log file: {error}");
        return ExitCode::FAILURE;
    }

    let args = Args::parse();

    let state = match build_state(&args) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not start the server: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn build_state(args: &Args) -> Result<AppState, Error> {
    let ledger = Ledger {
        income: load_optional(args.income_csv.as_ref())?,
        expenses: load_optional(args.expense_csv.as_ref())?,
    };

    let mut rates = RateTable::new(&args.currency);
    for text in &args.rates {
        let (code, units) = parse_rate(text)?;
        rates = rates.with_rate(&code, units)?;
    }
    tracing::info!(
        "Loaded {} exchange rates relative to {}",
        args.rates.len(),
        rates.base()
    );

    // Fail at start up rather than on the first request.
    let today = get_local_date(&args.timezone)?;
    tracing::info!("Today is {today} in {}", args.timezone);

    Ok(AppState::new(ledger, rates, &args.currency, &args.timezone))
}

fn load_optional(path: Option<&PathBuf>) -> Result<Vec<Transaction>, Error> {
    match path {
        Some(path) => load_transactions(path),
        None => Ok(Vec::new()),
    }
}

fn setup_logging() -> Result<(), std::io::Error> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
