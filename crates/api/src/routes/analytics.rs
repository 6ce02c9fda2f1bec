//! Analytics routes — one GET endpoint per analysis kind.
//!
//! Every route follows the same contract: a missing or empty `token`
//! is a 400, a producer failure is a 500 with the failure text, and a
//! success is the payload as JSON.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use rugscope_common::error::AppError;
use rugscope_common::types::AnalyticsKind;
use rugscope_engine::{Producers, SharedProducer};

use crate::middleware::token::TokenAddress;
use crate::state::AppState;

pub fn router(producers: &Producers) -> Router<AppState> {
    Router::new()
        .merge(endpoint(
            AnalyticsKind::TransactionFlow,
            producers.transaction_flow.clone(),
        ))
        .merge(endpoint(AnalyticsKind::Anomaly, producers.anomaly.clone()))
        .merge(endpoint(AnalyticsKind::Ownership, producers.ownership.clone()))
        .merge(endpoint(AnalyticsKind::SellOff, producers.sell_off.clone()))
        .merge(endpoint(
            AnalyticsKind::VolumeBracket,
            producers.volume_bracket.clone(),
        ))
        .merge(endpoint(AnalyticsKind::BotVolume, producers.bot_volume.clone()))
        .merge(endpoint(AnalyticsKind::PostRug, producers.post_rug.clone()))
        .merge(endpoint(
            AnalyticsKind::WalletClustering,
            producers.wallet_clustering.clone(),
        ))
        .merge(endpoint(
            AnalyticsKind::DashboardSummary,
            producers.dashboard_summary.clone(),
        ))
}

/// Per-route state: the analysis served and its producer.
struct Endpoint<T> {
    kind: AnalyticsKind,
    producer: SharedProducer<T>,
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            producer: self.producer.clone(),
        }
    }
}

fn endpoint<T>(kind: AnalyticsKind, producer: SharedProducer<T>) -> Router<AppState>
where
    T: Serialize + Send + 'static,
{
    Router::new()
        .route(kind.path(), get(serve::<T>))
        .with_state(Endpoint { kind, producer })
}

/// GET /api/<analysis>?token=<address>
async fn serve<T>(
    State(endpoint): State<Endpoint<T>>,
    TokenAddress(token): TokenAddress,
) -> Result<Json<T>, AppError>
where
    T: Serialize + Send + 'static,
{
    let data = endpoint.producer.produce(&token).await.inspect_err(|e| {
        tracing::warn!(
            kind = %endpoint.kind,
            token = %token,
            error = %e,
            "Producer failed"
        );
    })?;

    tracing::debug!(kind = %endpoint.kind, token = %token, "Analytics served");
    Ok(Json(data))
}
