//! Command-line arguments for the feed server.
use std::time::Duration;

use clap::Parser;
use feed_common::net::FEED_PORT;
use feed_server::config::{
    DEFAULT_CONTRACT_INTERVAL_MS, DEFAULT_INITIAL_CONTRACTS, DEFAULT_MAX_CONTRACTS,
    DEFAULT_QUOTE_INTERVAL_MS, FeedConfig,
};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Interface to bind.
    #[clap(long, default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port accepting WebSocket connections.
    #[clap(long, default_value_t = FEED_PORT)]
    pub port: u16,

    /// Contracts created for every new connection before streaming starts.
    #[clap(long, default_value_t = DEFAULT_INITIAL_CONTRACTS)]
    pub initial_contracts: usize,

    /// Upper bound on live contracts per connection.
    #[clap(long, default_value_t = DEFAULT_MAX_CONTRACTS)]
    pub max_contracts: usize,

    /// Period of contract creation/rename/removal, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_CONTRACT_INTERVAL_MS)]
    pub contract_interval_ms: u64,

    /// Period of quote emission, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_QUOTE_INTERVAL_MS)]
    pub quote_interval_ms: u64,
}

impl Args {
    /// Session configuration described by these arguments.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            initial_contracts: self.initial_contracts,
            max_contracts: self.max_contracts,
            contract_interval: Duration::from_millis(self.contract_interval_ms),
            quote_interval: Duration::from_millis(self.quote_interval_ms),
            ..FeedConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_feed() {
        let args = Args::parse_from(["feed_server"]);
        assert_eq!(args.port, 8080);
        let config = args.feed_config();
        assert_eq!(config.initial_contracts, 8000);
        assert_eq!(config.max_contracts, 10000);
        assert_eq!(config.contract_interval, Duration::from_millis(500));
        assert_eq!(config.quote_interval, Duration::from_millis(150));
    }

    #[test]
    fn overrides_are_applied() {
        let args = Args::parse_from([
            "feed_server",
            "--port",
            "9001",
            "--initial-contracts",
            "10",
            "--max-contracts",
            "20",
            "--quote-interval-ms",
            "40",
        ]);
        assert_eq!(args.port, 9001);
        let config = args.feed_config();
        assert_eq!(config.initial_contracts, 10);
        assert_eq!(config.max_contracts, 20);
        assert_eq!(config.quote_interval, Duration::from_millis(40));
    }
}
