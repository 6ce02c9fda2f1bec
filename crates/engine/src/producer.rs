//! Producer capability — one per analysis kind.
//!
//! The router only sees `SharedProducer<T>` handles, so a sample producer
//! can be swapped for one backed by real data without touching routing.

use std::sync::Arc;

use async_trait::async_trait;

use rugscope_common::error::AppError;
use rugscope_common::types::{
    AnomalyData, BotVolumeData, DashboardSummary, OwnershipData, PostRugData, SellOffData,
    TransactionFlowData, VolumeBracketData, WalletClusteringData,
};

use crate::sample::SampleAnalytics;

/// Produces one analytics payload for a token address.
#[async_trait]
pub trait Producer<T>: Send + Sync {
    /// Build the payload for `token`. The address is guaranteed non-empty.
    async fn produce(&self, token: &str) -> Result<T, AppError>;
}

pub type SharedProducer<T> = Arc<dyn Producer<T>>;

/// The full set of producers served by the API, one per analysis kind.
#[derive(Clone)]
pub struct Producers {
    pub transaction_flow: SharedProducer<TransactionFlowData>,
    pub anomaly: SharedProducer<AnomalyData>,
    pub ownership: SharedProducer<OwnershipData>,
    pub sell_off: SharedProducer<SellOffData>,
    pub volume_bracket: SharedProducer<VolumeBracketData>,
    pub bot_volume: SharedProducer<BotVolumeData>,
    pub post_rug: SharedProducer<PostRugData>,
    pub wallet_clustering: SharedProducer<WalletClusteringData>,
    pub dashboard_summary: SharedProducer<DashboardSummary>,
}

impl Producers {
    /// Every analysis answered with the fixed sample data set.
    pub fn sample() -> Self {
        let sample = Arc::new(SampleAnalytics);
        Self {
            transaction_flow: sample.clone(),
            anomaly: sample.clone(),
            ownership: sample.clone(),
            sell_off: sample.clone(),
            volume_bracket: sample.clone(),
            bot_volume: sample.clone(),
            post_rug: sample.clone(),
            wallet_clustering: sample.clone(),
            dashboard_summary: sample,
        }
    }

    pub fn with_transaction_flow(mut self, producer: SharedProducer<TransactionFlowData>) -> Self {
        self.transaction_flow = producer;
        self
    }

    pub fn with_anomaly(mut self, producer: SharedProducer<AnomalyData>) -> Self {
        self.anomaly = producer;
        self
    }

    pub fn with_ownership(mut self, producer: SharedProducer<OwnershipData>) -> Self {
        self.ownership = producer;
        self
    }

    pub fn with_sell_off(mut self, producer: SharedProducer<SellOffData>) -> Self {
        self.sell_off = producer;
        self
    }

    pub fn with_volume_bracket(mut self, producer: SharedProducer<VolumeBracketData>) -> Self {
        self.volume_bracket = producer;
        self
    }

    pub fn with_bot_volume(mut self, producer: SharedProducer<BotVolumeData>) -> Self {
        self.bot_volume = producer;
        self
    }

    pub fn with_post_rug(mut self, producer: SharedProducer<PostRugData>) -> Self {
        self.post_rug = producer;
        self
    }

    pub fn with_wallet_clustering(
        mut self,
        producer: SharedProducer<WalletClusteringData>,
    ) -> Self {
        self.wallet_clustering = producer;
        self
    }

    pub fn with_dashboard_summary(mut self, producer: SharedProducer<DashboardSummary>) -> Self {
        self.dashboard_summary = producer;
        self
    }
}

impl Default for Producers {
    fn default() -> Self {
        Self::sample()
    }
}
