//! Caller identification extractor.
//!
//! Reads the bearer token from the `token` header and the peer IP from the
//! connection info. Whether either is used depends on the identity mode,
//! which the session service decides.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use storm_core::session::Caller;

use crate::http::error::AppError;
use crate::state::AppState;

/// Header carrying the bearer token in token mode.
pub const TOKEN_HEADER: &str = "token";

/// Address used when the transport did not record a peer.
const UNKNOWN_ADDRESS: &str = "unknown";

/// The identified caller of a chat request.
pub struct CallerIdentity(pub Caller);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(TOKEN_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::Unauthorized("Token header is not valid text.".to_string()))?
                    .trim()
                    .to_string(),
            ),
            None => None,
        };

        let address = match parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            Some(ConnectInfo(addr)) => addr.ip().to_string(),
            None => {
                tracing::debug!("No peer address on request");
                UNKNOWN_ADDRESS.to_string()
            }
        };

        Ok(CallerIdentity(Caller::new(token, address)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use storm_types::config::ChatConfig;
    use tempfile::TempDir;

    use crate::http::handlers::chat::tests::test_state;

    async fn extract(request: Request<()>, state: &AppState) -> Result<Caller, AppError> {
        let (mut parts, ()) = request.into_parts();
        CallerIdentity::from_request_parts(&mut parts, state)
            .await
            .map(|CallerIdentity(caller)| caller)
    }

    #[tokio::test]
    async fn test_reads_token_and_peer_ip() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(tmp.path(), ChatConfig::default());

        let mut request = Request::builder().header(TOKEN_HEADER, " T1 ").body(()).unwrap();
        let peer: SocketAddr = "10.0.0.1:4242".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        let caller = extract(request, &state).await.unwrap();
        assert_eq!(caller.token.as_deref(), Some("T1"));
        assert_eq!(caller.address, "10.0.0.1");
    }

    #[tokio::test]
    async fn test_missing_header_and_peer() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(tmp.path(), ChatConfig::default());

        let caller = extract(Request::builder().body(()).unwrap(), &state).await.unwrap();
        assert_eq!(caller.token, None);
        assert_eq!(caller.address, UNKNOWN_ADDRESS);
    }

    #[tokio::test]
    async fn test_non_text_token_rejected() {
        let tmp = TempDir::new().unwrap();
        let state = test_state(tmp.path(), ChatConfig::default());

        let value = axum::http::HeaderValue::from_bytes(b"\xff\xfe").unwrap();
        let request = Request::builder().header(TOKEN_HEADER, value).body(()).unwrap();

        let err = extract(request, &state).await.err().unwrap();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
