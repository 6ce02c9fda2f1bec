//! Shared application state for the Axum API server.

use std::sync::Arc;

use rugscope_common::config::{AnalyticsMode, AppConfig};
use rugscope_engine::Producers;
use rugscope_engine::flow::UpstreamFlowProducer;
use rugscope_upstream::{UpstreamClient, UpstreamError};

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub producers: Producers,
    pub mode: AnalyticsMode,
}

impl AppState {
    pub fn new(producers: Producers, mode: AnalyticsMode) -> Self {
        Self { producers, mode }
    }

    /// Wire producers for the configured analytics mode.
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let producers = match config.analytics_mode {
            AnalyticsMode::Sample => Producers::sample(),
            AnalyticsMode::Live => {
                let client = UpstreamClient::from_config(config)?;
                Producers::sample()
                    .with_transaction_flow(Arc::new(UpstreamFlowProducer::new(client)))
            }
        };

        Ok(Self::new(producers, config.analytics_mode))
    }
}
