//! Gemini Client Tests
//!
//! Runs the scoring client against a local fake of the `generateContent`
//! endpoint.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

use ethiscan::llm::{GeminiClient, ScoringBackend, ScoringConfig};
use ethiscan::AnalysisError;

/// Requests seen by the fake, as (path and query, JSON body).
type Seen = Arc<Mutex<Vec<(String, Value)>>>;

#[derive(Clone)]
struct FakeGemini {
    status: StatusCode,
    body: String,
    seen: Seen,
}

async fn generate(
    State(fake): State<FakeGemini>,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let json = serde_json::from_str(&body).unwrap_or(Value::Null);
    fake.seen.lock().unwrap().push((uri.to_string(), json));
    (fake.status, fake.body.clone())
}

/// Start the fake and return a client pointed at it.
async fn spawn(status: StatusCode, body: Value) -> (GeminiClient, Seen) {
    let seen = Seen::default();
    let fake = FakeGemini {
        status,
        body: body.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new().fallback(generate).with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ScoringConfig::base_default()
        .with_endpoint(&format!("http://{}/", addr))
        .with_model("test-model");
    (GeminiClient::new(config).unwrap(), seen)
}

fn reply(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

#[tokio::test]
async fn test_request_shape_and_reply_text() {
    let (client, seen) = spawn(
        StatusCode::OK,
        reply(r#"{"score": 4, "summary": "Good practices."}"#),
    )
    .await;

    let text = client.score("PROMPT TEXT", Some("secret")).await.unwrap();
    assert_eq!(text, r#"{"score": 4, "summary": "Good practices."}"#);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].0,
        "/v1beta/models/test-model:generateContent?key=secret"
    );
    assert_eq!(
        seen[0].1,
        json!({"contents": [{"parts": [{"text": "PROMPT TEXT"}]}]})
    );
}

#[tokio::test]
async fn test_key_is_percent_encoded() {
    let (client, seen) = spawn(StatusCode::OK, reply(r#"{"score": 3, "summary": "ok"}"#)).await;

    client.score("p", Some("a b&c/d")).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].0,
        "/v1beta/models/test-model:generateContent?key=a+b%26c%2Fd"
    );
}

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let (client, _) = spawn(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": {"message": "boom"}}),
    )
    .await;

    let err = client.score("p", Some("k")).await.unwrap_err();
    match &err {
        AnalysisError::Http {
            status,
            status_text,
        } => {
            assert_eq!(*status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected Http error, got {:?}", other),
    }
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_missing_text_is_unexpected_shape() {
    let (client, _) = spawn(StatusCode::OK, json!({"candidates": []})).await;
    assert!(matches!(
        client.score("p", Some("k")).await,
        Err(AnalysisError::UnexpectedResponseShape)
    ));

    let (client, _) = spawn(StatusCode::OK, json!({"promptFeedback": {}})).await;
    assert!(matches!(
        client.score("p", Some("k")).await,
        Err(AnalysisError::UnexpectedResponseShape)
    ));
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let (client, seen) = spawn(StatusCode::OK, reply("{}")).await;
    assert!(matches!(
        client.score("p", None).await,
        Err(AnalysisError::MissingCredential)
    ));
    assert!(matches!(
        client.score("p", Some("  ")).await,
        Err(AnalysisError::MissingCredential)
    ));
    assert!(seen.lock().unwrap().is_empty());
}
