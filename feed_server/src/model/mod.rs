//! Simulation engine for a single feed connection.
//!
//! This module groups the per-connection state and the two generators that mutate it:
//! - `id_generator`: unique opaque identifiers for contracts and rename suffixes.
//! - `registry`: live contracts plus the set still waiting for their first quotes.
//! - `contract_generator`: periodic contract churn (create / rename / remove).
//! - `quote_generator`: periodic price/volume ticks with bootstrap bursts.

pub mod contract_generator;
pub mod id_generator;
pub mod quote_generator;
pub mod registry;
