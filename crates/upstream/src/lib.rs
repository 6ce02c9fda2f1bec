//! Client for the external blockchain data provider.
//!
//! The provider answers address-keyed queries with JSON arrays of
//! transaction and balance records, and runs saved queries through an
//! execute, poll, fetch-results cycle.

pub mod client;
pub mod error;
pub mod records;

pub use client::UpstreamClient;
pub use error::UpstreamError;
pub use records::{ExecutionState, UpstreamBalance, UpstreamTransaction};
