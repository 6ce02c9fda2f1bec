//! Token address extractor.
//!
//! Pulls the first `token` query parameter off the request. An absent,
//! empty or undecodable value rejects with `AppError::MissingToken`.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use rugscope_common::error::AppError;

/// Name of the query parameter carrying the token address.
pub const TOKEN_PARAM: &str = "token";

/// Non-empty token address taken from the query string.
///
/// ```ignore
/// async fn handler(TokenAddress(token): TokenAddress) -> impl IntoResponse {
///     // token is never empty here
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAddress(pub String);

impl<S> FromRequestParts<S> for TokenAddress
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(pairs)| {
                pairs
                    .into_iter()
                    .find(|(key, _)| key == TOKEN_PARAM)
                    .map(|(_, value)| value)
            })
            .filter(|value| !value.is_empty());

        async move { token.map(TokenAddress).ok_or(AppError::MissingToken) }
    }
}
