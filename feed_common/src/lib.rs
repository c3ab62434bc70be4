//!
//! Common types and utilities shared by the feed server and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `FeedError` used across the workspace.
//! - `result`: handy `Result<T, FeedError>` alias.
//! - `message`: the JSON envelope pushed from server to client.
//! - `net`: networking constants and small helpers.
#![warn(missing_docs)]
pub mod error;
pub mod message;
pub mod net;
pub mod result;

pub use error::FeedError;
pub use message::{Contract, ContractQuote, Quote, ServerMsg};
pub use result::Result;
