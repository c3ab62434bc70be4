//! Per-connection store of live contracts.
//!
//! The registry is the single source of truth for which contracts a client currently
//! knows about. It also remembers which contracts are still *pristine*, i.e. have not
//! yet received their first (large) burst of quotes. Core operations:
//!
//! - `ContractRegistry::create()`: mint a contract with a fresh id and mark it pristine.
//! - `ContractRegistry::mark_updated(id, name)`: rename a contract in place.
//! - `ContractRegistry::remove(id)`: evict a contract and return its removal delta.
//! - `ContractRegistry::consume_pristine(id)`: clear the pristine flag, reporting whether
//!   it was set.
//!
//! Unknown ids are ignored by every mutating operation. The registry is not synchronized;
//! the session wraps it in a `Mutex` shared by its two timers.

use std::collections::{HashMap, HashSet};

use feed_common::Contract;

use crate::model::id_generator;

/// Live contracts keyed by id, plus the ids still awaiting their bootstrap quotes.
#[derive(Debug, Default)]
pub struct ContractRegistry {
    contracts_by_id: HashMap<String, Contract>,
    pristine: HashSet<String>,
}

impl ContractRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a new pristine contract named after its id and return a copy of it.
    pub fn create(&mut self) -> Contract {
        let id = id_generator::next_id();
        let contract = Contract::new(id.clone(), format!("Contract {}", id));
        self.contracts_by_id.insert(id.clone(), contract.clone());
        self.pristine.insert(id);
        contract
    }

    /// Rename a contract in place and return the updated contract.
    ///
    /// Pristine status is left untouched. Returns `None` for unknown ids.
    pub fn mark_updated(&mut self, id: &str, name: impl Into<String>) -> Option<Contract> {
        let contract = self.contracts_by_id.get_mut(id)?;
        contract.name = Some(name.into());
        Some(contract.clone())
    }

    /// Evict a contract and return its removal delta (`removed = true`, no name).
    ///
    /// Returns `None` for unknown ids.
    pub fn remove(&mut self, id: &str) -> Option<Contract> {
        let contract = self.contracts_by_id.remove(id)?;
        self.pristine.remove(id);
        Some(contract.into_removed())
    }

    /// Clear the pristine flag of `id`, returning whether it was set.
    pub fn consume_pristine(&mut self, id: &str) -> bool {
        self.pristine.remove(id)
    }

    /// Whether `id` has not received its bootstrap quotes yet.
    pub fn is_pristine(&self, id: &str) -> bool {
        self.pristine.contains(id)
    }

    /// Whether `id` is a live contract.
    pub fn contains(&self, id: &str) -> bool {
        self.contracts_by_id.contains_key(id)
    }

    /// Look up a live contract.
    pub fn get(&self, id: &str) -> Option<&Contract> {
        self.contracts_by_id.get(id)
    }

    /// Snapshot of the ids held right now.
    pub fn ids(&self) -> Vec<String> {
        self.contracts_by_id.keys().cloned().collect()
    }

    /// Number of live contracts.
    pub fn len(&self) -> usize {
        self.contracts_by_id.len()
    }

    /// `true` when no contract is live.
    pub fn is_empty(&self) -> bool {
        self.contracts_by_id.is_empty()
    }

    /// Number of contracts still pristine.
    pub fn pristine_len(&self) -> usize {
        self.pristine.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_inserts_pristine_contract_with_default_name() {
        let mut registry = ContractRegistry::new();
        let contract = registry.create();

        assert_eq!(registry.len(), 1);
        assert!(registry.is_pristine(&contract.id));
        assert_eq!(contract.name, Some(format!("Contract {}", contract.id)));
        assert_eq!(contract.removed, None);
        assert_eq!(registry.get(&contract.id), Some(&contract));
    }

    #[test]
    fn mark_updated_keeps_pristine_status() {
        let mut registry = ContractRegistry::new();
        let id = registry.create().id;

        let updated = registry.mark_updated(&id, "renamed").unwrap();

        assert_eq!(updated.name.as_deref(), Some("renamed"));
        assert_eq!(registry.get(&id).unwrap().name.as_deref(), Some("renamed"));
        assert!(registry.is_pristine(&id));
    }

    #[test]
    fn remove_evicts_from_both_sets() {
        let mut registry = ContractRegistry::new();
        let id = registry.create().id;

        let delta = registry.remove(&id).unwrap();

        assert_eq!(delta.id, id);
        assert_eq!(delta.name, None);
        assert_eq!(delta.removed, Some(true));
        assert!(!registry.contains(&id));
        assert!(!registry.is_pristine(&id));
        assert_eq!(registry.pristine_len(), 0);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut registry = ContractRegistry::new();
        let kept = registry.create().id;

        assert_eq!(registry.remove("missing"), None);
        assert_eq!(registry.mark_updated("missing", "x"), None);
        assert!(!registry.consume_pristine("missing"));

        assert_eq!(registry.len(), 1);
        assert!(registry.is_pristine(&kept));
    }

    #[test]
    fn consume_pristine_is_idempotent() {
        let mut registry = ContractRegistry::new();
        let id = registry.create().id;

        assert!(registry.consume_pristine(&id));
        assert!(!registry.consume_pristine(&id));
        assert!(registry.contains(&id));
    }

    #[test]
    fn removed_contract_cannot_be_revived_by_update() {
        let mut registry = ContractRegistry::new();
        let id = registry.create().id;
        registry.remove(&id);

        assert_eq!(registry.mark_updated(&id, "ghost"), None);
        assert!(registry.is_empty());
    }
}
