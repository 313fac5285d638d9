//! Fetcher behavior against a local fixture server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, response::Html, routing::get, Router};

use sitecheck::{ContentSource, FetchError, HttpFetcher, RoutingPolicy};

async fn fixture_server() -> SocketAddr {
    let app = Router::new()
        .route(
            "/page",
            get(|| async {
                Html(
                    "<html><head><title>Market</title><script>track()</script></head>\
                     <body><h1>Welcome</h1><p>fresh listings daily</p></body></html>",
                )
            }),
        )
        .route(
            "/gone",
            get(|| async { (StatusCode::NOT_FOUND, "not here") }),
        )
        .route("/plain", get(|| async { "just text" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn direct_fetcher() -> HttpFetcher {
    HttpFetcher::new(RoutingPolicy::default(), Duration::from_secs(5))
}

#[tokio::test]
async fn fetches_visible_text() {
    let addr = fixture_server().await;
    let text = direct_fetcher()
        .fetch(&format!("http://{}/page", addr))
        .await
        .unwrap();
    assert_eq!(text, "Market Welcome fresh listings daily");
}

#[tokio::test]
async fn plain_text_bodies_pass_through() {
    let addr = fixture_server().await;
    let text = direct_fetcher()
        .fetch_text(&format!("http://{}/plain", addr))
        .await;
    assert_eq!(text, "just text");
}

#[tokio::test]
async fn error_status_is_a_failure() {
    let addr = fixture_server().await;
    let url = format!("http://{}/gone", addr);

    let result = direct_fetcher().fetch(&url).await;
    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));

    assert_eq!(direct_fetcher().fetch_text(&url).await, "");
}

#[tokio::test]
async fn unreachable_proxy_yields_empty_text() {
    let addr = fixture_server().await;
    let policy = RoutingPolicy::new("socks5h://127.0.0.1:1", ".onion").with_proxy_all(true);
    let fetcher = HttpFetcher::new(policy, Duration::from_secs(5));

    let url = format!("http://{}/page", addr);
    assert!(matches!(
        fetcher.fetch(&url).await,
        Err(FetchError::Transport(_))
    ));
    assert_eq!(fetcher.fetch_text(&url).await, "");
}
