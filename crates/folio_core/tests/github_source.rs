//! Integration tests for the GitHub repository source
//!
//! A throwaway HTTP server on localhost stands in for the API.

use folio_core::{FeedConfig, FolioError, GithubSource, RepoSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one response, handing back the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).to_string()
    });

    (base, handle)
}

fn config(base: String) -> FeedConfig {
    FeedConfig {
        api_base: base,
        user: "ada".to_string(),
        ..FeedConfig::default()
    }
}

#[tokio::test]
async fn test_fetch_sends_user_agent_and_decodes() {
    let body = r#"[{"id": 7, "name": "folio", "html_url": "https://github.com/ada/folio",
        "description": "Portfolio", "language": "Rust", "topics": ["web"],
        "fork": false, "updated_at": "2024-02-01T00:00:00Z"}]"#;
    let (base, server) = serve_once("200 OK", body).await;

    let source = GithubSource::new(&config(base.clone()));
    assert_eq!(source.url(), format!("{}/users/ada/repos", base));

    let repos = source.fetch().await.unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].tags(), vec!["Rust", "web"]);

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /users/ada/repos"));
    assert!(request.contains("user-agent: folio/"));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let (base, server) = serve_once("403 Forbidden", r#"{"message": "rate limited"}"#).await;

    let err = GithubSource::new(&config(base)).fetch().await.unwrap_err();
    assert!(matches!(err, FolioError::FeedStatus { status: 403, .. }));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unexpected_body_is_a_decode_error() {
    let (base, server) = serve_once("200 OK", r#"{"not": "a list"}"#).await;

    let err = GithubSource::new(&config(base)).fetch().await.unwrap_err();
    assert!(matches!(err, FolioError::FeedDecodeFailed { .. }));
    server.await.unwrap();
}
