use datatale::{
    ChatMessage, ChatRequest, ChatClient, DataTaleError, HttpChatClient, LlmConfig, QueryFailure,
    RetryPolicy,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff: Duration::from_millis(5),
    }
}

fn test_config(endpoint: &str) -> LlmConfig {
    LlmConfig::new(endpoint, "test-token", "gpt-4o-mini").with_retry(fast_retry(3))
}

fn analysis_request() -> ChatRequest {
    ChatRequest::new(
        "gpt-4o-mini",
        vec![
            ChatMessage::system("You are a data analysis assistant."),
            ChatMessage::user("Analyze this dataset"),
        ],
    )
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_success_returns_text_verbatim() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("  The dataset shows a trend.  "))
        .expect(1)
        .create_async()
        .await;

    let client = HttpChatClient::new(test_config(&server.url())).unwrap();
    let text = client.query(&analysis_request()).await.unwrap();

    // No trimming or post-processing.
    assert_eq!(text, "  The dataset shows a trend.  ");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_persistent_server_error_makes_exactly_three_attempts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(502)
        .with_body("bad gateway")
        .expect(3)
        .create_async()
        .await;

    let client = HttpChatClient::new(test_config(&server.url())).unwrap();
    let result = client.query(&analysis_request()).await;

    mock.assert_async().await;
    match result {
        Err(DataTaleError::AnalysisUnavailable { attempts, cause }) => {
            assert_eq!(attempts, 3);
            assert_eq!(cause, QueryFailure::BadStatus(502));
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_retry_payloads_are_byte_identical() {
    let mut server = Server::new_async().await;
    let request = analysis_request();
    let expected = serde_json::to_value(&request).unwrap();

    // Every attempt must match the exact JSON body, or the mock records a miss.
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Json(expected))
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let client = HttpChatClient::new(test_config(&server.url())).unwrap();
    let result = client.query(&request).await;

    mock.assert_async().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_timeout_is_classified_and_retried() {
    // A listener that accepts connections but never writes a response, so
    // every attempt runs into the client timeout.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let connections = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&connections);
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            seen.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });

    let config = test_config(&endpoint)
        .with_timeout(Duration::from_millis(200))
        .with_retry(fast_retry(2));
    let client = HttpChatClient::new(config).unwrap();
    let result = client.query(&analysis_request()).await;

    match result {
        Err(DataTaleError::AnalysisUnavailable { attempts, cause }) => {
            assert_eq!(attempts, 2);
            assert_eq!(cause, QueryFailure::Timeout);
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
    // A timed-out connection is not reused, so each attempt dials anew.
    assert_eq!(connections.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_malformed_success_body_is_terminal_without_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"unexpected\": true}")
        .expect(1)
        .create_async()
        .await;

    let client = HttpChatClient::new(test_config(&server.url())).unwrap();
    let result = client.query(&analysis_request()).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(DataTaleError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_empty_choices_is_terminal() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(json!({"choices": []}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = HttpChatClient::new(test_config(&server.url())).unwrap();
    let result = client.query(&analysis_request()).await;

    mock.assert_async().await;
    match result {
        Err(DataTaleError::InvalidResponse(message)) => {
            assert!(message.contains("no completion choices"));
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_failure() {
    // Nothing listens on this port.
    let config = LlmConfig::new("http://127.0.0.1:9", "test-token", "gpt-4o-mini")
        .with_retry(fast_retry(2));
    let client = HttpChatClient::new(config).unwrap();
    let result = client.query(&analysis_request()).await;

    match result {
        Err(DataTaleError::AnalysisUnavailable { attempts, cause }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(cause, QueryFailure::Transport(_)));
        }
        other => panic!("unexpected outcome: {:?}", other.map(|_| ())),
    }
}
