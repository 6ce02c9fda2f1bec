use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A transfer touching the queried address.
///
/// Missing or `null` fields decode to their zero value; mints and burns
/// arrive with an empty `from` or `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamTransaction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_number: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_timestamp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_amount: Option<f64>,
}

/// A token balance held by the queried address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamBalance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
}

/// Reply to `POST /query/{id}/execute`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionHandle {
    pub execution_id: String,
}

/// Lifecycle state of a saved-query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ExecutionState {
    #[serde(rename = "QUERY_STATE_PENDING")]
    Pending,
    #[serde(rename = "QUERY_STATE_EXECUTING")]
    Executing,
    #[serde(rename = "QUERY_STATE_COMPLETED")]
    Completed,
    #[serde(rename = "QUERY_STATE_FAILED")]
    Failed,
    #[serde(rename = "QUERY_STATE_CANCELLED")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionState::Pending => write!(f, "QUERY_STATE_PENDING"),
            ExecutionState::Executing => write!(f, "QUERY_STATE_EXECUTING"),
            ExecutionState::Completed => write!(f, "QUERY_STATE_COMPLETED"),
            ExecutionState::Failed => write!(f, "QUERY_STATE_FAILED"),
            ExecutionState::Cancelled => write!(f, "QUERY_STATE_CANCELLED"),
            ExecutionState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reply to `GET /execution/{id}/status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
}

/// Reply to `GET /execution/{id}/results`. Only the rows are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ExecutionResults<T> {
    #[serde(default)]
    pub result: Option<ResultSet<T>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResultSet<T> {
    #[serde(default)]
    pub rows: Vec<T>,
}

impl<T> ExecutionResults<T> {
    pub fn into_rows(self) -> Vec<T> {
        self.result.map(|set| set.rows).unwrap_or_default()
    }
}
