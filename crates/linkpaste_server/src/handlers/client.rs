//! Client identification for per-client rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Key identifying the requesting client.
///
/// The socket peer IP is used unless `trust_forwarded_for` is set, in which
/// case the first `X-Forwarded-For` entry wins. Only enable that behind a
/// proxy that overwrites the header.
pub(crate) fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(forwarded) = forwarded {
            return forwarded.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::client_key;
    use axum::http::{HeaderMap, HeaderValue};
    use std::net::SocketAddr;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn peer_ip_is_used_without_port() {
        let peer: SocketAddr = "10.1.2.3:5555".parse().expect("addr");
        assert_eq!(client_key(&HeaderMap::new(), Some(peer), false), "10.1.2.3");
    }

    #[test]
    fn forwarded_header_is_ignored_unless_trusted() {
        let peer: SocketAddr = "10.1.2.3:5555".parse().expect("addr");
        let headers = forwarded("203.0.113.9, 10.0.0.1");
        assert_eq!(client_key(&headers, Some(peer), false), "10.1.2.3");
        assert_eq!(client_key(&headers, Some(peer), true), "203.0.113.9");
    }

    #[test]
    fn missing_peer_and_header_is_unknown() {
        assert_eq!(client_key(&HeaderMap::new(), None, true), "unknown");
        assert_eq!(client_key(&forwarded(" , x"), None, true), "unknown");
    }
}
