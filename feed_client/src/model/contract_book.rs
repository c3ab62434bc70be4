//! Local mirror of the contracts announced by the server.
//!
//! `ContractBook::apply` folds each `ServerMsg` into the mirror in wire order and reports
//! every observation that contradicts the feed's guarantees: quotes for contracts the
//! client does not know, removals of unknown contracts, and retired ids showing up again.

use std::collections::{HashMap, HashSet};

use feed_common::{Quote, ServerMsg};

/// A contract as currently known by the client.
#[derive(Debug, Clone, Default)]
pub struct ContractState {
    /// Latest announced name.
    pub name: Option<String>,
    /// Quotes received for this contract.
    pub quotes: u64,
    /// Most recent quote.
    pub last_quote: Option<Quote>,
}

/// Feed observation that should never happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Quote addressed to an id that was never announced.
    QuoteForUnknown(String),
    /// Quote addressed to an id that was already removed.
    QuoteForRetired(String),
    /// Removal of an id that is not live.
    RemovedUnknown(String),
    /// A removed id was announced again.
    RetiredReappeared(String),
}

/// Running totals over everything applied so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookStats {
    /// Messages applied.
    pub messages: u64,
    /// Contract deltas applied.
    pub contract_deltas: u64,
    /// Quotes received.
    pub quotes: u64,
    /// Anomalies detected.
    pub anomalies: u64,
}

/// Mirror of live contracts plus the ids retired so far.
#[derive(Debug, Default)]
pub struct ContractBook {
    contracts: HashMap<String, ContractState>,
    retired: HashSet<String>,
    stats: BookStats,
}

impl ContractBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one server message and return the anomalies it revealed.
    pub fn apply(&mut self, msg: &ServerMsg) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        self.stats.messages += 1;

        for contract in &msg.contracts {
            self.stats.contract_deltas += 1;
            if self.retired.contains(&contract.id) {
                anomalies.push(Anomaly::RetiredReappeared(contract.id.clone()));
                continue;
            }
            if contract.is_removed() {
                if self.contracts.remove(&contract.id).is_none() {
                    anomalies.push(Anomaly::RemovedUnknown(contract.id.clone()));
                }
                self.retired.insert(contract.id.clone());
            } else {
                self.contracts.entry(contract.id.clone()).or_default().name = contract.name.clone();
            }
        }

        for contract_quote in &msg.quotes {
            self.stats.quotes += 1;
            match self.contracts.get_mut(&contract_quote.contract_id) {
                Some(state) => {
                    state.quotes += 1;
                    state.last_quote = Some(contract_quote.quote);
                }
                None if self.retired.contains(&contract_quote.contract_id) => {
                    anomalies.push(Anomaly::QuoteForRetired(contract_quote.contract_id.clone()));
                }
                None => anomalies.push(Anomaly::QuoteForUnknown(contract_quote.contract_id.clone())),
            }
        }

        self.stats.anomalies += anomalies.len() as u64;
        anomalies
    }

    /// Live contract with the most quotes so far, if any contract has been quoted.
    pub fn busiest(&self) -> Option<(&str, &ContractState)> {
        self.contracts
            .iter()
            .filter(|(_, state)| state.quotes > 0)
            .max_by_key(|(_, state)| state.quotes)
            .map(|(id, state)| (id.as_str(), state))
    }

    /// Number of live contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Number of ids removed so far.
    pub fn retired_len(&self) -> usize {
        self.retired.len()
    }

    /// Running totals.
    pub fn stats(&self) -> BookStats {
        self.stats
    }
}
