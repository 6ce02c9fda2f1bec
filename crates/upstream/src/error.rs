use thiserror::Error;

use rugscope_common::error::AppError;

use crate::records::ExecutionState;

/// Failure talking to the data provider, tagged with the call and the stage
/// that failed.
///
/// Messages name the call (`transactions`, `execution status`, ...) but never
/// the provider URL; they end up in client-facing 500 bodies. The URL is
/// logged by the client when the failure happens.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build {call} request: {reason}")]
    Request { call: &'static str, reason: String },

    #[error("{call} request failed: {source}")]
    Network {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{call} request returned status code {status}")]
    Status { call: &'static str, status: u16 },

    #[error("failed to read {call} response body: {source}")]
    Body {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode {call} response: {source}")]
    Decode {
        call: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("query execution {execution_id} ended in state {state}")]
    QueryFailed {
        execution_id: String,
        state: ExecutionState,
    },

    #[error("query execution {execution_id} timed out after {polls} status checks")]
    QueryTimedOut { execution_id: String, polls: u32 },
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Decode { .. } => AppError::Decode(err.to_string()),
            _ => AppError::Upstream(err.to_string()),
        }
    }
}
