//! Synthetic contract and quote feed.
//!
//! Every WebSocket client gets its own simulated market: a population of contracts
//! created on connect, then two independent timers that keep changing it. The pieces:
//!
//! - `model`: the per-connection engine (registry, lifecycle and quote generators).
//! - `timer`: repeating timer threads with fault isolation.
//! - `session`: wires one registry to both generators and owns their timers.
//! - `connection`: WebSocket handshake and the outbound frame pump.
//! - `listener`: TCP accept loop, one thread per connection.
//! - `config`: tunables and their validation.
#![warn(missing_docs)]

pub mod config;
pub mod connection;
pub mod listener;
pub mod model;
pub mod session;
pub mod timer;

pub use config::FeedConfig;
pub use listener::FeedListener;
pub use session::Session;
