//! HTTP-level tests of the chat-completion client

use serde_json::json;
use std::time::Duration;
use vibelist_ai::completion::{ChatCompletionClient, ChatMessage, CompletionProvider, CompletionRequest};
use vibelist_common::Error;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "gpt-4".to_string(),
        messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
        max_tokens: 150,
        temperature: 0.7,
    }
}

async fn client(server: &MockServer) -> ChatCompletionClient {
    ChatCompletionClient::new(&server.uri(), "test-key", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_returns_trimmed_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "gpt-4", "max_tokens": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "  dreamy dusk  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let content = client(&server).await.complete(&request()).await.unwrap();
    assert_eq!(content, "dreamy dusk");
}

#[tokio::test]
async fn test_missing_content_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let content = client(&server).await.complete(&request()).await.unwrap();
    assert!(content.is_empty());
}

#[tokio::test]
async fn test_non_success_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let result = client(&server).await.complete(&request()).await;
    assert_eq!(
        result,
        Err(Error::Upstream {
            status: 401,
            body: "invalid api key".to_string()
        })
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client =
        ChatCompletionClient::new("http://127.0.0.1:9", "test-key", Duration::from_secs(2))
            .unwrap();
    let result = client.complete(&request()).await;
    assert!(matches!(result, Err(Error::Network(_))));
}

#[tokio::test]
async fn test_unreadable_success_body_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.complete(&request()).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {:?}", err);
}
