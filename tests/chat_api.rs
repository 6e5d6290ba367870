use axum::{
    body::{ Body, Bytes },
    extract::{ DefaultBodyLimit, State },
    http::{ Request, StatusCode, Uri },
    response::{ IntoResponse, Response },
    Router,
};
use rental_chat_proxy::config::prompt::{ PromptConfig, DEFAULT_FALLBACK_RESPONSE };
use rental_chat_proxy::llm::chat::gemini::GeminiChatClient;
use rental_chat_proxy::proxy::ChatProxy;
use rental_chat_proxy::server::api::router;
use serde_json::{ json, Value };
use std::net::SocketAddr;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tower::ServiceExt;

const GENERIC_ERROR: &str = "Failed to process your request";

struct MockProvider {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    received: Mutex<Vec<(Uri, Value)>>,
}

async fn mock_handler(
    State(mock): State<Arc<MockProvider>>,
    uri: Uri,
    body: Bytes,
) -> Response {
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    mock.received.lock().unwrap().push((uri, value));
    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }
    (mock.status, [("content-type", "application/json")], mock.body.clone()).into_response()
}

async fn spawn_provider(
    status: StatusCode,
    body: &str,
    delay: Option<Duration>,
) -> (SocketAddr, Arc<MockProvider>) {
    let mock = Arc::new(MockProvider {
        status,
        body: body.to_string(),
        delay,
        received: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .fallback(mock_handler)
        .layer(DefaultBodyLimit::disable())
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, mock)
}

fn proxy_router(addr: SocketAddr, timeout_secs: Option<u64>) -> Router {
    limited_router(addr, timeout_secs, None)
}

fn limited_router(
    addr: SocketAddr,
    timeout_secs: Option<u64>,
    max_body_bytes: Option<usize>,
) -> Router {
    let client = GeminiChatClient::new(
        "test-key".into(),
        "test-model".into(),
        &format!("http://{}", addr),
        timeout_secs,
    ).unwrap();
    let proxy = ChatProxy::new(Arc::new(client), Arc::new(PromptConfig::default()), None);
    router(Arc::new(proxy), max_body_bytes)
}

async fn post_chat(app: Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn sample_request() -> String {
    json!({
        "message": "Where do you operate?",
        "history": [
            { "role": "user", "content": "Hi" },
            { "role": "assistant", "content": "Hello" }
        ]
    }).to_string()
}

#[tokio::test]
async fn success_returns_candidate_text_and_sends_mapped_payload() {
    let provider_body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "Pune only." }] } }]
    }).to_string();
    let (addr, mock) = spawn_provider(StatusCode::OK, &provider_body, None).await;

    let (status, body) = post_chat(proxy_router(addr, None), sample_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Pune only." }));

    let received = mock.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let (uri, payload) = &received[0];
    assert_eq!(uri.path(), "/models/test-model:generateContent");
    assert_eq!(uri.query(), Some("key=test-key"));

    let contents = payload["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 4);
    assert_eq!(contents[0]["role"], json!("system"));
    assert_eq!(
        contents[0]["parts"][0]["text"],
        json!(PromptConfig::default().system_instruction)
    );
    assert_eq!(
        Value::Array(contents[1..].to_vec()),
        json!([
            { "role": "user", "parts": [{ "text": "Hi" }] },
            { "role": "model", "parts": [{ "text": "Hello" }] },
            { "role": "user", "parts": [{ "text": "Where do you operate?" }] }
        ])
    );

    let generation = &payload["generationConfig"];
    assert_eq!(generation["topK"], json!(40));
    assert_eq!(generation["maxOutputTokens"], json!(1024));
    assert!((generation["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((generation["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
}

#[tokio::test]
async fn provider_error_status_becomes_generic_500() {
    let provider_body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "should be ignored" }] } }]
    }).to_string();
    let (addr, _mock) = spawn_provider(StatusCode::SERVICE_UNAVAILABLE, &provider_body, None).await;

    let (status, body) = post_chat(proxy_router(addr, None), sample_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
}

#[tokio::test]
async fn empty_candidates_return_fallback() {
    let (addr, _mock) = spawn_provider(StatusCode::OK, r#"{ "candidates": [] }"#, None).await;

    let (status, body) = post_chat(proxy_router(addr, None), sample_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": DEFAULT_FALLBACK_RESPONSE }));
}

#[tokio::test]
async fn non_json_success_body_is_a_failure() {
    let (addr, _mock) = spawn_provider(StatusCode::OK, "<html>oops</html>", None).await;

    let (status, body) = post_chat(proxy_router(addr, None), sample_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
}

#[tokio::test]
async fn malformed_requests_never_reach_the_provider() {
    let (addr, mock) = spawn_provider(StatusCode::OK, r#"{ "candidates": [] }"#, None).await;

    let bad_bodies = vec![
        "not json at all".to_string(),
        json!({ "message": "hello" }).to_string(),
        json!({ "message": "hello", "history": "nope" }).to_string(),
        json!({ "history": [] }).to_string()
    ];
    for bad in bad_bodies {
        let (status, body) = post_chat(proxy_router(addr, None), bad.clone()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body: {}", bad);
        assert_eq!(body, json!({ "error": GENERIC_ERROR }));
    }
    assert!(mock.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_message_is_forwarded() {
    let provider_body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "Anything else?" }] } }]
    }).to_string();
    let (addr, mock) = spawn_provider(StatusCode::OK, &provider_body, None).await;

    let request = json!({ "message": "", "history": [] }).to_string();
    let (status, _) = post_chat(proxy_router(addr, None), request).await;
    assert_eq!(status, StatusCode::OK);

    let received = mock.received.lock().unwrap();
    let contents = received[0].1["contents"].as_array().unwrap().clone();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[1], json!({ "role": "user", "parts": [{ "text": "" }] }));
}

#[tokio::test]
async fn unreachable_provider_becomes_generic_500() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = post_chat(proxy_router(addr, None), sample_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
}

#[tokio::test]
async fn provider_timeout_becomes_generic_500() {
    let (addr, _mock) = spawn_provider(
        StatusCode::OK,
        r#"{ "candidates": [] }"#,
        Some(Duration::from_secs(3)),
    ).await;

    let (status, body) = post_chat(proxy_router(addr, Some(1)), sample_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
}

#[tokio::test]
async fn health_reports_ok() {
    let (addr, _mock) = spawn_provider(StatusCode::OK, "{}", None).await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = proxy_router(addr, None).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({ "status": "ok" }));
}

fn large_request() -> String {
    let turn = json!({ "role": "user", "content": "x".repeat(10_000) });
    let body = json!({
        "message": "Still there?",
        "history": vec![turn; 300]
    }).to_string();
    assert!(body.len() > 2 * 1024 * 1024);
    body
}

#[tokio::test]
async fn large_history_is_forwarded_without_a_body_limit() {
    let provider_body = json!({
        "candidates": [{ "content": { "parts": [{ "text": "Yes." }] } }]
    }).to_string();
    let (addr, mock) = spawn_provider(StatusCode::OK, &provider_body, None).await;

    let (status, body) = post_chat(proxy_router(addr, None), large_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "response": "Yes." }));

    let received = mock.received.lock().unwrap();
    assert_eq!(received[0].1["contents"].as_array().unwrap().len(), 302);
}

#[tokio::test]
async fn configured_body_limit_rejects_oversized_requests() {
    let (addr, mock) = spawn_provider(StatusCode::OK, r#"{ "candidates": [] }"#, None).await;

    let (status, body) = post_chat(
        limited_router(addr, None, Some(64 * 1024)),
        large_request(),
    ).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
    assert!(mock.received.lock().unwrap().is_empty());
}
