//! Wire messages pushed from the server to clients.
//!
//! Every push, the bootstrap snapshot included, uses the same `ServerMsg` envelope:
//! a list of contract deltas and a list of quotes addressed to contracts. Messages
//! travel as JSON text frames; optional contract fields are omitted when unset so a
//! removal delta looks like `{"id": "...", "removed": true}`.

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// A tradable contract, or a delta describing a change to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Opaque unique identifier. Never reused within a connection.
    pub id: String,
    /// Display name; absent on removal deltas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set to `true` on the final delta of a removed contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

impl Contract {
    /// Live contract with the given name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            removed: None,
        }
    }

    /// Turn this contract into its removal delta: flag set, name cleared.
    pub fn into_removed(self) -> Self {
        Self {
            id: self.id,
            name: None,
            removed: Some(true),
        }
    }

    /// Whether this delta announces a removal.
    pub fn is_removed(&self) -> bool {
        self.removed.unwrap_or(false)
    }
}

/// A single price/volume tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Signed integer price.
    pub price: i64,
    /// Traded volume, always at least 1.
    pub volume: u32,
}

/// A quote addressed to a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuote {
    /// Id of the quoted contract.
    pub contract_id: String,
    /// The tick itself.
    pub quote: Quote,
}

/// Envelope for every server push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMsg {
    /// Contract deltas in generation order.
    #[serde(default)]
    pub contracts: Vec<Contract>,
    /// Quotes in generation order.
    #[serde(default)]
    pub quotes: Vec<ContractQuote>,
}

impl ServerMsg {
    /// Message carrying only contract deltas.
    pub fn with_contracts(contracts: Vec<Contract>) -> Self {
        Self {
            contracts,
            quotes: Vec::new(),
        }
    }

    /// Message carrying only quotes.
    pub fn with_quotes(quotes: Vec<ContractQuote>) -> Self {
        Self {
            contracts: Vec::new(),
            quotes,
        }
    }

    /// `true` when both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty() && self.quotes.is_empty()
    }

    /// Encode the message as JSON text.
    pub fn to_json(&self) -> Result<String, FeedError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a message from JSON text.
    pub fn from_json(text: &str) -> Result<Self, FeedError> {
        Ok(serde_json::from_str(text)?)
    }
}
