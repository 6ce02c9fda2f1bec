//! Axum API server for the token analytics dashboard.
//!
//! Endpoints (all GET, `?token=<address>` required):
//! - /api/transaction-flow
//! - /api/anomaly-data
//! - /api/ownership-data
//! - /api/sell-off-data
//! - /api/volume-bracket-data
//! - /api/bot-volume-data
//! - /api/post-rug-data
//! - /api/wallet-clustering-data
//! - /api/dashboard-summary

pub mod middleware;
pub mod routes;
pub mod state;
