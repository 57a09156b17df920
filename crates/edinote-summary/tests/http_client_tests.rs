//! HTTP client tests against a throw-away local server speaking raw HTTP.

use edinote_summary::{
    ApiKey, CompletionError, CompletionService, CompletionSettings, HttpCompletionService,
    ProviderId,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with a canned response; the join handle yields
/// the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.expect("write");
        stream.flush().await.ok();
        request
    });
    (format!("http://{addr}"), handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.expect("read");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn service(provider: ProviderId, base_url: &str) -> HttpCompletionService {
    HttpCompletionService::new(
        CompletionSettings::default()
            .with_base_url(provider, base_url)
            .with_timeout(Some(Duration::from_secs(5))),
    )
    .expect("client")
}

fn key() -> ApiKey {
    ApiKey::new("test-key").unwrap()
}

#[tokio::test]
async fn test_openai_success_extracts_text_and_sends_bearer() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"A purchase order."}}]}"#,
    )
    .await;
    let completion = service(ProviderId::OpenAi, &base)
        .generate_text("summarize", ProviderId::OpenAi, &key())
        .await
        .unwrap();
    assert_eq!(completion.text.as_deref(), Some("A purchase order."));
    assert_eq!(completion.model, "gpt-4o-mini");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer test-key"));
    assert!(request.contains("\"max_tokens\":600"));
}

#[tokio::test]
async fn test_claude_sends_version_header() {
    let (base, server) =
        serve_once("200 OK", r#"{"content":[{"type":"text","text":"ok"}]}"#).await;
    let completion = service(ProviderId::Claude, &base)
        .generate_text("p", ProviderId::Claude, &key())
        .await
        .unwrap();
    assert_eq!(completion.text.as_deref(), Some("ok"));

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("post /v1/messages "));
    assert!(request.contains("x-api-key: test-key"));
    assert!(request.contains("anthropic-version: 2023-06-01"));
}

#[tokio::test]
async fn test_gemini_key_in_query() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"fine"}]}}]}"#,
    )
    .await;
    service(ProviderId::Gemini, &base)
        .generate_text("p", ProviderId::Gemini, &key())
        .await
        .unwrap();
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1/models/gemini-2.5-flash:generateContent?key=test-key "));
}

#[tokio::test]
async fn test_server_error_becomes_http_failure_with_detail() {
    let (base, _server) = serve_once(
        "500 Internal Server Error",
        r#"{"error":{"message":"upstream exploded"}}"#,
    )
    .await;
    let err = service(ProviderId::DeepSeek, &base)
        .generate_text("p", ProviderId::DeepSeek, &key())
        .await
        .unwrap_err();
    match &err {
        CompletionError::Http { status, detail, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(detail, "upstream exploded");
        }
        other => panic!("expected Http, got {other:?}"),
    }
    assert!(err.user_message().contains("upstream exploded"));
}

#[tokio::test]
async fn test_success_without_text_is_not_an_error() {
    let (base, _server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
    let completion = service(ProviderId::OpenAi, &base)
        .generate_text("p", ProviderId::OpenAi, &key())
        .await
        .unwrap();
    assert_eq!(completion.text, None);
}

#[tokio::test]
async fn test_non_json_success_is_invalid_response() {
    let (base, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
    let err = service(ProviderId::OpenAi, &base)
        .generate_text("p", ProviderId::OpenAi, &key())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_host_is_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(ProviderId::OpenAi, &format!("http://{addr}"))
        .generate_text("p", ProviderId::OpenAi, &key())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn test_silent_provider_is_timeout_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;
        // Hold the connection open without answering.
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let client = HttpCompletionService::new(
        CompletionSettings::default()
            .with_base_url(ProviderId::DeepSeek, &format!("http://{addr}"))
            .with_timeout(Some(Duration::from_millis(200))),
    )
    .expect("client");
    let err = client
        .generate_text("p", ProviderId::DeepSeek, &key())
        .await
        .unwrap_err();
    server.abort();

    assert!(matches!(err, CompletionError::Timeout), "{err:?}");
    assert_eq!(
        err.user_message(),
        "Failed to generate summary: the request timed out."
    );
}
