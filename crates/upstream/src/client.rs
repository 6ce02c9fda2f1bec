use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use rugscope_common::config::AppConfig;

use crate::error::UpstreamError;
use crate::records::{
    ExecutionHandle, ExecutionResults, ExecutionState, ExecutionStatus, UpstreamBalance,
    UpstreamTransaction,
};

/// Header carrying the provider API key.
pub const API_KEY_HEADER: &str = "X-Dune-Api-Key";

/// Status checks made before a saved-query execution is abandoned.
pub const DEFAULT_MAX_POLLS: u32 = 10;

/// Delay before each saved-query status check.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// HTTP client for the blockchain data provider.
///
/// Every call is bounded by the timeout given at construction, so a slow
/// provider stalls only the request that is waiting on it.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    query_base_url: String,
    chain: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl UpstreamClient {
    pub fn new(
        base_url: impl Into<String>,
        chain: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Request {
                call: "client",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            query_base_url: base_url.clone(),
            base_url,
            chain: chain.into(),
            api_key: api_key.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Point saved-query calls at a different API root and polling schedule.
    pub fn with_query_api(
        mut self,
        base_url: impl Into<String>,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Self {
        self.query_base_url = base_url.into();
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    /// Build a client from the provider settings in `AppConfig`.
    pub fn from_config(config: &AppConfig) -> Result<Self, UpstreamError> {
        let api_key = config
            .upstream_api_key
            .clone()
            .ok_or_else(|| UpstreamError::Request {
                call: "client",
                reason: "no API key configured".to_string(),
            })?;

        Ok(Self::new(
            config.upstream_base_url.clone(),
            config.upstream_chain.clone(),
            api_key,
            Duration::from_secs(config.upstream_timeout_secs),
        )?
        .with_query_api(
            config.query_base_url.clone(),
            Duration::from_millis(config.query_poll_interval_ms),
            config.query_max_polls,
        ))
    }

    /// GET /transactions/{chain}/{address}
    pub async fn transactions(
        &self,
        address: &str,
    ) -> Result<Vec<UpstreamTransaction>, UpstreamError> {
        let call = "transactions";
        let url = self.endpoint(&self.base_url, call, &[call, self.chain.as_str(), address])?;
        self.call_json(call, Method::GET, url, None).await
    }

    /// GET /balances/{chain}/{address}
    pub async fn balances(&self, address: &str) -> Result<Vec<UpstreamBalance>, UpstreamError> {
        let call = "balances";
        let url = self.endpoint(&self.base_url, call, &[call, self.chain.as_str(), address])?;
        self.call_json(call, Method::GET, url, None).await
    }

    /// Run a saved query and return its result rows.
    ///
    /// Starts an execution, polls its status until it completes, then fetches
    /// the results. A failed or cancelled execution, or one still running
    /// after the configured number of status checks, is an error.
    pub async fn run_query<T: DeserializeOwned>(
        &self,
        query_id: &str,
        parameters: Option<&Value>,
    ) -> Result<Vec<T>, UpstreamError> {
        let handle = self.execute_query(query_id, parameters).await?;
        self.wait_for_execution(&handle.execution_id).await?;
        self.execution_results(&handle.execution_id).await
    }

    /// POST /query/{id}/execute
    pub async fn execute_query(
        &self,
        query_id: &str,
        parameters: Option<&Value>,
    ) -> Result<ExecutionHandle, UpstreamError> {
        let call = "query execute";
        let url = self.endpoint(&self.query_base_url, call, &["query", query_id, "execute"])?;
        let body = match parameters {
            Some(parameters) => json!({ "query_parameters": parameters }),
            None => json!({}),
        };

        let handle: ExecutionHandle = self.call_json(call, Method::POST, url, Some(&body)).await?;
        tracing::debug!(query_id, execution_id = %handle.execution_id, "Query execution started");
        Ok(handle)
    }

    /// GET /execution/{id}/status
    pub async fn execution_status(
        &self,
        execution_id: &str,
    ) -> Result<ExecutionStatus, UpstreamError> {
        let call = "execution status";
        let url = self.endpoint(
            &self.query_base_url,
            call,
            &["execution", execution_id, "status"],
        )?;
        self.call_json(call, Method::GET, url, None).await
    }

    /// GET /execution/{id}/results
    pub async fn execution_results<T: DeserializeOwned>(
        &self,
        execution_id: &str,
    ) -> Result<Vec<T>, UpstreamError> {
        let call = "execution results";
        let url = self.endpoint(
            &self.query_base_url,
            call,
            &["execution", execution_id, "results"],
        )?;
        let results: ExecutionResults<T> = self.call_json(call, Method::GET, url, None).await?;
        Ok(results.into_rows())
    }

    async fn wait_for_execution(&self, execution_id: &str) -> Result<(), UpstreamError> {
        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            match self.execution_status(execution_id).await?.state {
                ExecutionState::Completed => return Ok(()),
                state @ (ExecutionState::Failed | ExecutionState::Cancelled) => {
                    tracing::warn!(execution_id, %state, "Query execution did not complete");
                    return Err(UpstreamError::QueryFailed {
                        execution_id: execution_id.to_string(),
                        state,
                    });
                }
                state => tracing::debug!(execution_id, attempt, %state, "Query still running"),
            }
        }

        tracing::warn!(execution_id, polls = self.max_polls, "Query execution timed out");
        Err(UpstreamError::QueryTimedOut {
            execution_id: execution_id.to_string(),
            polls: self.max_polls,
        })
    }

    /// Join `base` and `segments`, percent-encoding each segment.
    fn endpoint(
        &self,
        base: &str,
        call: &'static str,
        segments: &[&str],
    ) -> Result<Url, UpstreamError> {
        let invalid = |reason: String| {
            tracing::warn!(call, base_url = %base, reason = reason.as_str(), "Invalid provider base URL");
            UpstreamError::Request { call, reason }
        };

        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        call: &'static str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T, UpstreamError> {
        let display_url = url.to_string();
        let result = self.send_json(call, method, url, body).await;
        if let Err(e) = &result {
            tracing::warn!(call, url = %display_url, error = %e, "Upstream call failed");
        }
        result
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        call: &'static str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T, UpstreamError> {
        let mut request = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Network {
                call,
                source: source.without_url(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status {
                call,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Body {
                call,
                source: source.without_url(),
            })?;

        tracing::debug!(call, bytes = bytes.len(), "Upstream response received");

        serde_json::from_slice(&bytes).map_err(|source| UpstreamError::Decode { call, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rugscope_common::error::AppError;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UpstreamClient {
        UpstreamClient::new(server.uri(), "svm", "test-key", Duration::from_secs(5))
            .unwrap()
            .with_query_api(server.uri(), Duration::from_millis(10), 3)
    }

    async fn mount_status(server: &MockServer, state: &str) {
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": state })))
            .mount(server)
            .await;
    }

    async fn mount_execute(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/query/3237721/execute"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "execution_id": "01HEXEC" })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_transactions_sends_key_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions/svm/TokenA"))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "block_number": 42,
                    "block_timestamp": "2023-04-01T08:23:00Z",
                    "from": "walletA",
                    "to": "walletB",
                    "value": 1.5,
                    "token_symbol": "RUG"
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let txs = client_for(&server).transactions("TokenA").await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].block_number, 42);
        assert_eq!(txs[0].from, "walletA");
        assert_eq!(txs[0].token_symbol.as_deref(), Some("RUG"));
        assert!(txs[0].token_amount.is_none());
    }

    #[tokio::test]
    async fn test_transactions_tolerates_partial_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions/svm/TokenA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"block_timestamp": "t", "from": "a", "to": "b", "value": 1},
                {"block_number": 7, "from": "a", "to": null, "value": 2}
            ])))
            .mount(&server)
            .await;

        let txs = client_for(&server).transactions("TokenA").await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].block_number, 0);
        assert_eq!(txs[1].to, "");
    }

    #[tokio::test]
    async fn test_balances_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/balances/svm/walletA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"token": "TokenA", "token_symbol": "RUG", "amount": 1000.0}
            ])))
            .mount(&server)
            .await;

        let balances = client_for(&server).balances("walletA").await.unwrap();
        assert_eq!(balances[0].token, "TokenA");
        assert_eq!(balances[0].amount, 1000.0);
    }

    #[tokio::test]
    async fn test_base_url_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/echo/beta/balances/svm/walletA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = UpstreamClient::new(
            format!("{}/api/echo/beta/", server.uri()),
            "svm",
            "k",
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(client.balances("walletA").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).transactions("TokenA").await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Status {
                call: "transactions",
                status: 429
            }
        ));

        let app_err = AppError::from(err);
        assert!(matches!(app_err, AppError::Upstream(_)));
        assert!(app_err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_error_messages_hide_provider_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).transactions("TokenA").await.unwrap_err();
        let message = AppError::from(err).to_string();
        assert_eq!(
            message,
            "Upstream error: transactions request returned status code 503"
        );
        assert!(!message.contains(&server.uri()));
        assert!(!message.contains("TokenA"));

        let client = UpstreamClient::new("http://127.0.0.1:1", "svm", "k", Duration::from_secs(1))
            .unwrap();
        let err = client.balances("walletA").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network { .. }));
        let message = AppError::from(err).to_string();
        assert!(!message.contains("127.0.0.1"), "{}", message);
        assert!(!message.contains("walletA"), "{}", message);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).transactions("TokenA").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode { .. }));
        assert!(matches!(AppError::from(err), AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            UpstreamClient::new(server.uri(), "svm", "k", Duration::from_millis(100)).unwrap();
        let err = client.transactions("TokenA").await.unwrap_err();
        assert!(matches!(err, UpstreamError::Network { .. }));
    }

    #[test]
    fn test_invalid_base_url_is_request_error() {
        let client =
            UpstreamClient::new("not a url", "svm", "k", Duration::from_secs(1)).unwrap();
        let err = client
            .endpoint("not a url", "transactions", &["transactions", "svm", "TokenA"])
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Request { .. }));
        assert!(!err.to_string().contains("not a url"));
    }

    #[test]
    fn test_address_segment_is_encoded() {
        let client =
            UpstreamClient::new("http://localhost:1", "svm", "k", Duration::from_secs(1))
                .unwrap();
        let url = client
            .endpoint("http://localhost:1", "balances", &["balances", "svm", "a/b"])
            .unwrap();
        assert_eq!(url.path(), "/balances/svm/a%2Fb");
    }

    // ============================================================
    // Saved-query execution
    // ============================================================

    #[tokio::test]
    async fn test_run_query_executes_polls_and_fetches_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query/3237721/execute"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "query_parameters": {"token_address": "TokenA"}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "execution_id": "01HEXEC" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "state": "QUERY_STATE_EXECUTING" })),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_status(&server, "QUERY_STATE_COMPLETED").await;
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "execution_id": "01HEXEC",
                "result": {"rows": [{"wallet": "walletA", "share": 25.3}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows: Vec<Value> = client_for(&server)
            .run_query("3237721", Some(&json!({"token_address": "TokenA"})))
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({"wallet": "walletA", "share": 25.3})]);
    }

    #[tokio::test]
    async fn test_execute_without_parameters_sends_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query/3237721/execute"))
            .and(body_json(json!({})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "execution_id": "01HEXEC" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let handle = client_for(&server)
            .execute_query("3237721", None)
            .await
            .unwrap();
        assert_eq!(handle.execution_id, "01HEXEC");
    }

    #[tokio::test]
    async fn test_failed_and_cancelled_executions_stop_polling() {
        for (state, expected) in [
            ("QUERY_STATE_FAILED", ExecutionState::Failed),
            ("QUERY_STATE_CANCELLED", ExecutionState::Cancelled),
        ] {
            let server = MockServer::start().await;
            mount_execute(&server).await;
            mount_status(&server, state).await;

            let err = client_for(&server)
                .run_query::<Value>("3237721", None)
                .await
                .unwrap_err();
            match err {
                UpstreamError::QueryFailed {
                    execution_id,
                    state,
                } => {
                    assert_eq!(execution_id, "01HEXEC");
                    assert_eq!(state, expected);
                }
                other => panic!("expected QueryFailed, got {:?}", other),
            }

            let status_checks = server
                .received_requests()
                .await
                .unwrap()
                .iter()
                .filter(|r| r.url.path().ends_with("/status"))
                .count();
            assert_eq!(status_checks, 1, "{}", state);
        }
    }

    #[tokio::test]
    async fn test_execution_times_out_after_max_polls() {
        let server = MockServer::start().await;
        mount_execute(&server).await;
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "state": "QUERY_STATE_PENDING" })),
            )
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .run_query::<Value>("3237721", None)
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::QueryTimedOut { polls: 3, .. }));
        assert!(AppError::from(err).to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_each_query_stage_names_itself_on_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402))
            .mount(&server)
            .await;
        let err = client_for(&server)
            .run_query::<Value>("3237721", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Status {
                call: "query execute",
                status: 402
            }
        ));

        let server = MockServer::start().await;
        mount_execute(&server).await;
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/status"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let err = client_for(&server)
            .run_query::<Value>("3237721", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Status {
                call: "execution status",
                status: 500
            }
        ));

        let server = MockServer::start().await;
        mount_execute(&server).await;
        mount_status(&server, "QUERY_STATE_COMPLETED").await;
        Mock::given(method("GET"))
            .and(path("/execution/01HEXEC/results"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let err = client_for(&server)
            .run_query::<Value>("3237721", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "execution results request returned status code 404"
        );
    }

    #[tokio::test]
    async fn test_missing_execution_id_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "ok" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .execute_query("3237721", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Decode {
                call: "query execute",
                ..
            }
        ));
    }
}
