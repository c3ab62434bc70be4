//! Contract lifecycle generator.
//!
//! Each tick passes through two independent low-probability gates:
//!
//! 1. growth: while below the population cap, add a randomly sized batch of new
//!    contracts;
//! 2. sweep: walk every contract held at that moment and, per contract, either rename
//!    it or (failing that draw) remove it.
//!
//! Everything created, renamed or removed during the tick is returned as one
//! `ServerMsg` carrying contract deltas only. Ticks that change nothing return `None`.

use feed_common::{Contract, ServerMsg};
use log::debug;
use rand::Rng;

use crate::config::{FeedConfig, LifecycleOdds};
use crate::model::id_generator;
use crate::model::registry::ContractRegistry;

/// Periodic source of contract creations, renames and removals.
#[derive(Debug, Clone)]
pub struct ContractGenerator {
    max_contracts: usize,
    odds: LifecycleOdds,
}

impl ContractGenerator {
    /// Create a generator capped at `max_contracts`.
    pub fn new(max_contracts: usize, odds: LifecycleOdds) -> Self {
        Self {
            max_contracts,
            odds,
        }
    }

    /// Create a generator from the session configuration.
    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.max_contracts, config.lifecycle)
    }

    /// Run one lifecycle tick against `registry`.
    pub fn tick<R: Rng>(&self, registry: &mut ContractRegistry, rng: &mut R) -> Option<ServerMsg> {
        let mut delta = Vec::new();

        if registry.len() < self.max_contracts && rng.random_bool(self.odds.growth) {
            let count = self.batch_size(registry.len(), rng.random());
            delta.extend(self.grow(registry, count));
        }
        if rng.random_bool(self.odds.sweep) {
            self.sweep(registry, rng, &mut delta);
        }

        if delta.is_empty() {
            return None;
        }
        debug!(
            "Lifecycle tick: {} contract deltas, {} live",
            delta.len(),
            registry.len()
        );
        Some(ServerMsg::with_contracts(delta))
    }

    /// Size of a growth batch for the given population and uniform draw `u` in `[0, 1)`.
    ///
    /// `min(remaining capacity, 1 + round(u * max / 100))`; zero only when at the cap.
    pub fn batch_size(&self, population: usize, u: f64) -> usize {
        let remaining = self.max_contracts.saturating_sub(population);
        let wanted = 1 + (u * self.max_contracts as f64 / 100.0).round() as usize;
        wanted.min(remaining)
    }

    /// Create up to `requested` contracts without crossing the cap.
    pub fn grow(&self, registry: &mut ContractRegistry, requested: usize) -> Vec<Contract> {
        let remaining = self.max_contracts.saturating_sub(registry.len());
        (0..requested.min(remaining))
            .map(|_| registry.create())
            .collect()
    }

    fn sweep<R: Rng>(&self, registry: &mut ContractRegistry, rng: &mut R, delta: &mut Vec<Contract>) {
        for id in registry.ids() {
            if rng.random_bool(self.odds.rename) {
                let name = format!("Updated contract {} - {}", id, id_generator::next_id());
                delta.extend(registry.mark_updated(&id, name));
            } else if rng.random_bool(self.odds.removal) {
                delta.extend(registry.remove(&id));
            }
        }
    }
}
