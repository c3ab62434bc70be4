//! Command-line arguments for the Feed Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use feed_common::net::{FEED_PORT, ws_url};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// WebSocket URL of the feed server.
    #[clap(long, default_value_t = ws_url("127.0.0.1", FEED_PORT))]
    pub server_url: String,

    /// Seconds between summary log lines.
    #[clap(long, default_value_t = 5)]
    pub report_interval_secs: u64,
}
