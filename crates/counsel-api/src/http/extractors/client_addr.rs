//! Client address extractor.
//!
//! The client's network address is the only ownership token for
//! conversations -- there is no authentication. This scheme is weak by
//! construction (all clients behind one proxy or NAT share an identity) and
//! is kept deliberately from the original design.
//!
//! Resolution order:
//! - first hop of `X-Forwarded-For` when present (the dockerized deployment
//!   sits behind a reverse proxy)
//! - otherwise the socket peer address

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::http::error::AppError;

/// The requesting client's address, used as the conversation ownership key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(forwarded) = parts.headers.get("x-forwarded-for") {
            let value = forwarded.to_str().map_err(|_| {
                AppError::Validation("Invalid X-Forwarded-For header encoding".to_string())
            })?;
            if let Some(first_hop) = value.split(',').next() {
                let first_hop = first_hop.trim();
                if !first_hop.is_empty() {
                    return Ok(ClientAddr(first_hop.to_string()));
                }
            }
        }

        let ConnectInfo(addr) = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .copied()
            .ok_or_else(|| AppError::Internal("peer address unavailable".to_string()))?;

        Ok(ClientAddr(addr.ip().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<ClientAddr, AppError> {
        let (mut parts, _) = request.into_parts();
        ClientAddr::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_forwarded_for_first_hop_wins() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.2")
            .body(())
            .unwrap();

        let addr = extract(request).await.unwrap();
        assert_eq!(addr, ClientAddr("203.0.113.7".to_string()));
    }

    #[tokio::test]
    async fn test_peer_address_fallback() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("198.51.100.9:43210".parse::<SocketAddr>().unwrap()));

        let addr = extract(request).await.unwrap();
        assert_eq!(addr, ClientAddr("198.51.100.9".to_string()));
    }

    #[tokio::test]
    async fn test_missing_peer_address_is_internal_error() {
        let request = Request::builder().body(()).unwrap();
        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
