//! Client-side state rebuilt from the feed.
//!
//! - `contract_book`: mirror of the server's contracts with consistency checks.
pub mod contract_book;
