//! Feed server binary.
//!
//! Listens for WebSocket connections and streams a private synthetic market to each
//! client: a bootstrap snapshot of contracts, then contract churn and quote ticks.
//!
//! ```bash
//! feed_server --port 8080 --initial-contracts 8000 --max-contracts 10000
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).
#![warn(missing_docs)]
use clap::Parser;
use feed_common::Result;
use feed_common::net::addr;
use feed_server::FeedListener;
use log::info;

use crate::args::Args;

mod args;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let config = args.feed_config();
    info!(
        "Starting feed: {} initial contracts, cap {}, churn every {:?}, quotes every {:?}",
        config.initial_contracts, config.max_contracts, config.contract_interval, config.quote_interval
    );

    let listener = FeedListener::bind(&addr(&args.host, args.port), config)?;
    listener.serve()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
