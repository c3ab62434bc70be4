//! Tunables for a feed session.
//!
//! All simulation parameters live here: population sizes, timer periods and the odds
//! used by both generators. Defaults reproduce the reference feed (8000 contracts at
//! start, capped at 10000, churn every 500 ms, quotes every 150 ms).

use std::time::Duration;

use feed_common::{FeedError, Result};

/// Default bootstrap population.
pub const DEFAULT_INITIAL_CONTRACTS: usize = 8000;
/// Default population cap.
pub const DEFAULT_MAX_CONTRACTS: usize = 10000;
/// Default period of the contract lifecycle generator, in milliseconds.
pub const DEFAULT_CONTRACT_INTERVAL_MS: u64 = 500;
/// Default period of the quote stream generator, in milliseconds.
pub const DEFAULT_QUOTE_INTERVAL_MS: u64 = 150;

/// Master configuration for one connection's simulation.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Contracts created synchronously before the first message.
    pub initial_contracts: usize,
    /// Hard cap on live contracts.
    pub max_contracts: usize,
    /// Period of the contract lifecycle generator.
    pub contract_interval: Duration,
    /// Period of the quote stream generator.
    pub quote_interval: Duration,
    /// Gates of the contract lifecycle generator.
    pub lifecycle: LifecycleOdds,
    /// Gates of the quote stream generator.
    pub quotes: QuoteOdds,
}

/// Probabilities driving contract churn.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleOdds {
    /// Chance per tick of adding a batch of contracts.
    pub growth: f64,
    /// Chance per tick of sweeping the population for renames/removals.
    pub sweep: f64,
    /// Per-contract chance of a rename during a sweep.
    pub rename: f64,
    /// Per-contract chance of removal when not renamed.
    pub removal: f64,
}

impl Default for LifecycleOdds {
    fn default() -> Self {
        Self {
            growth: 0.25,
            sweep: 0.25,
            rename: 0.10,
            removal: 0.10,
        }
    }
}

/// Probabilities driving quote emission.
#[derive(Debug, Clone, Copy)]
pub struct QuoteOdds {
    /// Chance per tick of scanning the population at all.
    pub tick: f64,
    /// Inclusion chance for a contract that has never been quoted.
    pub pristine: f64,
    /// Inclusion chance for a contract that is already ticking.
    pub live: f64,
}

impl Default for QuoteOdds {
    fn default() -> Self {
        Self {
            tick: 0.85,
            pristine: 0.05,
            live: 0.65,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_contracts: DEFAULT_INITIAL_CONTRACTS,
            max_contracts: DEFAULT_MAX_CONTRACTS,
            contract_interval: Duration::from_millis(DEFAULT_CONTRACT_INTERVAL_MS),
            quote_interval: Duration::from_millis(DEFAULT_QUOTE_INTERVAL_MS),
            lifecycle: LifecycleOdds::default(),
            quotes: QuoteOdds::default(),
        }
    }
}

impl FeedConfig {
    /// Reject configurations the session cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.initial_contracts > self.max_contracts {
            return Err(FeedError::Config(format!(
                "initial contracts ({}) exceed the maximum ({})",
                self.initial_contracts, self.max_contracts
            )));
        }
        if self.contract_interval.is_zero() || self.quote_interval.is_zero() {
            return Err(FeedError::Config(
                "generator intervals must be non-zero".to_string(),
            ));
        }
        let odds = [
            ("lifecycle.growth", self.lifecycle.growth),
            ("lifecycle.sweep", self.lifecycle.sweep),
            ("lifecycle.rename", self.lifecycle.rename),
            ("lifecycle.removal", self.lifecycle.removal),
            ("quotes.tick", self.quotes.tick),
            ("quotes.pristine", self.quotes.pristine),
            ("quotes.live", self.quotes.live),
        ];
        for (name, p) in odds {
            if !(0.0..=1.0).contains(&p) {
                return Err(FeedError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}
