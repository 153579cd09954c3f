use std::net::SocketAddr;

use axum::body::{Body, to_bytes};
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::routing::get;
use axum::{Extension, Router};
use tower::ServiceExt;

use tunefold::presentation::handlers::{ClientIp, TrustProxyHeaders};

async fn echo_ip(ClientIp(ip): ClientIp) -> String {
    ip
}

async fn client_ip_for(trust: Option<TrustProxyHeaders>, request: Request<Body>) -> String {
    let mut app = Router::new().route("/", get(echo_ip));
    if let Some(trust) = trust {
        app = app.layer(Extension(trust));
    }
    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

const TRUSTED: Option<TrustProxyHeaders> = Some(TrustProxyHeaders(true));

fn with_peer(mut request: Request<Body>, peer: &str) -> Request<Body> {
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[tokio::test]
async fn given_trusted_proxy_and_cloudflare_header_when_extracting_then_it_wins() {
    let request = Request::builder()
        .uri("/")
        .header("cf-connecting-ip", "203.0.113.7")
        .header("x-forwarded-for", "198.51.100.1")
        .body(Body::empty())
        .unwrap();

    assert_eq!(client_ip_for(TRUSTED, request).await, "203.0.113.7");
}

#[tokio::test]
async fn given_trusted_proxy_and_forwarded_chain_when_extracting_then_first_hop_is_used() {
    let request = Request::builder()
        .uri("/")
        .header("x-forwarded-for", "198.51.100.1, 10.0.0.2")
        .body(Body::empty())
        .unwrap();

    assert_eq!(client_ip_for(TRUSTED, request).await, "198.51.100.1");
}

#[tokio::test]
async fn given_trusted_proxy_and_blank_cloudflare_header_when_extracting_then_falls_through() {
    let request = Request::builder()
        .uri("/")
        .header("cf-connecting-ip", " ")
        .header("x-forwarded-for", "198.51.100.9")
        .body(Body::empty())
        .unwrap();

    assert_eq!(client_ip_for(TRUSTED, request).await, "198.51.100.9");
}

#[tokio::test]
async fn given_untrusted_proxy_when_headers_are_sent_then_socket_peer_is_used() {
    let request = Request::builder()
        .uri("/")
        .header("cf-connecting-ip", "203.0.113.7")
        .header("x-forwarded-for", "198.51.100.1")
        .body(Body::empty())
        .unwrap();
    let request = with_peer(request, "192.0.2.44:51000");

    let disabled = client_ip_for(Some(TrustProxyHeaders(false)), request).await;

    assert_eq!(disabled, "192.0.2.44");
}

#[tokio::test]
async fn given_no_trust_setting_when_headers_are_sent_then_they_are_ignored() {
    let request = Request::builder()
        .uri("/")
        .header("x-forwarded-for", "198.51.100.1")
        .body(Body::empty())
        .unwrap();

    assert_eq!(client_ip_for(None, request).await, "unknown");
}

#[tokio::test]
async fn given_no_headers_or_peer_when_extracting_then_unknown() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    assert_eq!(client_ip_for(TRUSTED, request).await, "unknown");
}
