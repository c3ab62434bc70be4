//! Quote stream generator.
//!
//! On each tick the generator (most of the time) walks every live contract and decides
//! whether to quote it. Contracts that have never been quoted are *pristine*: they are
//! picked rarely, but when picked they receive one large burst standing in for their
//! historical backlog, after which they tick with small bursts like every other
//! contract. Picking pristine contracts rarely spreads those backlogs over many ticks
//! instead of flushing all of them at once.
//!
//! Quote shape:
//! - price: `round((u - 0.1) * 1000)`, signed and centred slightly below zero;
//! - volume: `1 + round(u * 1000)`, never zero.

use feed_common::{ContractQuote, Quote, ServerMsg};
use log::debug;
use rand::Rng;

use crate::config::{FeedConfig, QuoteOdds};
use crate::model::registry::ContractRegistry;

/// Fixed base size of a pristine burst; the burst holds `1 + base + round(u * 400)` quotes.
pub const BACKLOG_BASE: u32 = 50;
/// Random spread added on top of [`BACKLOG_BASE`].
pub const BACKLOG_SPREAD: f64 = 400.0;
/// Fixed base size of a live burst; the burst holds `1 + base + round(u * 5)` quotes.
pub const LIVE_BASE: u32 = 1;
/// Random spread added on top of [`LIVE_BASE`].
pub const LIVE_SPREAD: f64 = 5.0;

/// Periodic source of price/volume ticks.
#[derive(Debug, Clone)]
pub struct QuoteGenerator {
    odds: QuoteOdds,
}

impl QuoteGenerator {
    /// Create a generator with the given inclusion odds.
    pub fn new(odds: QuoteOdds) -> Self {
        Self { odds }
    }

    /// Create a generator from the session configuration.
    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.quotes)
    }

    /// Run one quote tick against `registry`.
    ///
    /// Only contracts live at the time of the call are quoted; pristine contracts that
    /// get picked lose their pristine flag.
    pub fn tick<R: Rng>(&self, registry: &mut ContractRegistry, rng: &mut R) -> Option<ServerMsg> {
        if !rng.random_bool(self.odds.tick) {
            return None;
        }

        let mut quotes = Vec::new();
        let mut bursts = 0usize;
        for id in registry.ids() {
            let chance = if registry.is_pristine(&id) {
                self.odds.pristine
            } else {
                self.odds.live
            };
            if !rng.random_bool(chance) {
                continue;
            }
            let count = if registry.consume_pristine(&id) {
                bursts += 1;
                1 + BACKLOG_BASE + (rng.random::<f64>() * BACKLOG_SPREAD).round() as u32
            } else {
                1 + LIVE_BASE + (rng.random::<f64>() * LIVE_SPREAD).round() as u32
            };
            quotes.extend((0..count).map(|_| ContractQuote {
                contract_id: id.clone(),
                quote: random_quote(rng),
            }));
        }

        if quotes.is_empty() {
            return None;
        }
        debug!("Quote tick: {} quotes, {} backlog bursts", quotes.len(), bursts);
        Some(ServerMsg::with_quotes(quotes))
    }
}

/// Draw one synthetic quote.
pub fn random_quote<R: Rng>(rng: &mut R) -> Quote {
    let price = ((rng.random::<f64>() - 0.1) * 1000.0).round() as i64;
    let volume = 1 + (rng.random::<f64>() * 1000.0).round() as u32;
    Quote { price, volume }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn always() -> QuoteOdds {
        QuoteOdds {
            tick: 1.0,
            pristine: 1.0,
            live: 1.0,
        }
    }

    fn counts_by_contract(msg: &ServerMsg) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for quote in &msg.quotes {
            *counts.entry(quote.contract_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn pristine_contract_gets_backlog_then_live_bursts() {
        let generator = QuoteGenerator::new(always());
        let mut registry = ContractRegistry::new();
        let id = registry.create().id;
        let mut rng = StdRng::seed_from_u64(11);

        let first = generator.tick(&mut registry, &mut rng).unwrap();
        assert!(first.contracts.is_empty());
        assert!((51..=451).contains(&first.quotes.len()));
        assert!(first.quotes.iter().all(|q| q.contract_id == id));
        assert!(!registry.is_pristine(&id));

        for _ in 0..50 {
            let next = generator.tick(&mut registry, &mut rng).unwrap();
            assert!((2..=7).contains(&next.quotes.len()));
        }
    }

    #[test]
    fn backlog_burst_is_applied_once_per_contract() {
        let generator = QuoteGenerator::new(QuoteOdds {
            tick: 1.0,
            pristine: 0.3,
            live: 0.65,
        });
        let mut registry = ContractRegistry::new();
        for _ in 0..40 {
            registry.create();
        }
        let mut rng = StdRng::seed_from_u64(12);
        let mut bursts: HashMap<String, usize> = HashMap::new();

        for _ in 0..200 {
            if let Some(msg) = generator.tick(&mut registry, &mut rng) {
                for (id, count) in counts_by_contract(&msg) {
                    if count > 7 {
                        *bursts.entry(id).or_insert(0) += 1;
                    }
                }
            }
        }

        assert!(bursts.values().all(|&n| n == 1));
        assert_eq!(bursts.len() + registry.pristine_len(), 40);
    }

    #[test]
    fn only_live_contracts_are_quoted() {
        let generator = QuoteGenerator::new(always());
        let mut registry = ContractRegistry::new();
        let kept = registry.create().id;
        let gone = registry.create().id;
        registry.remove(&gone);
        let mut rng = StdRng::seed_from_u64(13);

        let msg = generator.tick(&mut registry, &mut rng).unwrap();

        assert!(msg.quotes.iter().all(|q| q.contract_id == kept));
    }

    #[test]
    fn quotes_stay_within_ranges() {
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..10_000 {
            let quote = random_quote(&mut rng);
            assert!((-100..=900).contains(&quote.price));
            assert!((1..=1001).contains(&quote.volume));
        }
    }

    #[test]
    fn skipped_tick_or_empty_registry_emits_nothing() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut registry = ContractRegistry::new();
        assert_eq!(QuoteGenerator::new(always()).tick(&mut registry, &mut rng), None);

        registry.create();
        let closed = QuoteGenerator::new(QuoteOdds {
            tick: 0.0,
            ..always()
        });
        assert_eq!(closed.tick(&mut registry, &mut rng), None);
        assert_eq!(registry.pristine_len(), 1);
    }
}
