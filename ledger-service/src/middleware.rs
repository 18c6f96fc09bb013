//! Client IP injection for per-IP rate limiting

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

const CF_CONNECTING_IP: HeaderName = HeaderName::from_static("cf-connecting-ip");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Resolve the client IP (CF-Connecting-IP, then the first X-Forwarded-For
/// hop, then the socket peer) and make sure X-Forwarded-For carries it.
pub async fn inject_client_ip(mut req: Request<Body>, next: Next) -> Response {
    let (source, ip) = resolve_client_ip(&req);
    if source == ClientIpSource::Socket {
        if let Some(value) = ip.as_deref().and_then(|ip| HeaderValue::from_str(ip).ok()) {
            req.headers_mut().insert(X_FORWARDED_FOR, value);
        }
    }

    match ip {
        Some(ip) => debug!("client_ip_source={} ip={}", source.as_str(), ip),
        None => debug!("client_ip_source=unavailable"),
    }

    next.run(req).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientIpSource {
    CfConnectingIp,
    XForwardedFor,
    Socket,
}

impl ClientIpSource {
    fn as_str(&self) -> &'static str {
        match self {
            ClientIpSource::CfConnectingIp => "cf-connecting-ip",
            ClientIpSource::XForwardedFor => "x-forwarded-for",
            ClientIpSource::Socket => "socket",
        }
    }
}

fn header_ip(req: &Request<Body>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_client_ip(req: &Request<Body>) -> (ClientIpSource, Option<String>) {
    if let Some(ip) = header_ip(req, &CF_CONNECTING_IP) {
        return (ClientIpSource::CfConnectingIp, Some(ip));
    }
    if let Some(ip) = header_ip(req, &X_FORWARDED_FOR) {
        return (ClientIpSource::XForwardedFor, Some(ip));
    }
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    (ClientIpSource::Socket, peer)
}
