//! Integration tests for the streaming completion client.

use futures_util::StreamExt;
use p8fs_client::{ChatClient, ChatCompletionRequest, ChatMessage, ClientError, Config};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

fn sample_request() -> ChatCompletionRequest {
    ChatCompletionRequest::new(
        "gpt-4o-mini",
        vec![
            ChatMessage::system("You are a simulator."),
            ChatMessage::user("What is this?"),
        ],
    )
}

#[tokio::test]
async fn decodes_deltas_until_done() {
    let server = MockServer::start().await;

    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n",
        "\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\", world\"}}]}\n",
        "\n",
        "data: [DONE]\n",
    );

    Mock::given(method("POST"))
        .and(path("/api/v1/agent/p8-sim/chat/completions"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "stream": true,
        })))
        .respond_with(sse_response(body))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::with_base_url(server.uri());
    let client = ChatClient::new(&config, "test-token").expect("client");
    let stream = client
        .stream_chat_completion("p8-sim", &sample_request())
        .await
        .expect("stream");

    let contents: Vec<String> = stream
        .map(|result| result.expect("delta").content)
        .collect()
        .await;
    assert_eq!(contents, vec!["Hello", ", world"]);
}

#[tokio::test]
async fn garbled_events_do_not_abort_the_stream() {
    let server = MockServer::start().await;

    let body = concat!(
        "event: ping\n",
        "data: not-json\n",
        "data: {\"choices\":[]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
        "data: [DONE]\n",
    );

    Mock::given(method("POST"))
        .and(path("/api/v1/agent/p8-sim/chat/completions"))
        .respond_with(sse_response(body))
        .mount(&server)
        .await;

    let config = Config::with_base_url(server.uri());
    let client = ChatClient::new(&config, "test-token").expect("client");
    let stream = client
        .stream_chat_completion("p8-sim", &sample_request())
        .await
        .expect("stream");

    let contents: Vec<String> = stream
        .map(|result| result.expect("delta").content)
        .collect()
        .await;
    assert_eq!(contents, vec!["ok"]);
}

#[tokio::test]
async fn stream_without_done_sentinel_ends_at_input() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/agent/p8-sim/chat/completions"))
        .respond_with(sse_response(""))
        .mount(&server)
        .await;

    let config = Config::with_base_url(server.uri());
    let client = ChatClient::new(&config, "test-token").expect("client");
    let stream = client
        .stream_chat_completion("p8-sim", &sample_request())
        .await
        .expect("stream");

    let deltas: Vec<_> = stream.collect().await;
    assert!(deltas.is_empty());
}

#[tokio::test]
async fn unauthorized_status_fails_before_any_decoding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/agent/p8-sim/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"token expired"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::with_base_url(server.uri());
    let client = ChatClient::new(&config, "stale-token").expect("client");
    let err = client
        .stream_chat_completion("p8-sim", &sample_request())
        .await
        .err()
        .expect("should fail");

    match err {
        ClientError::CompletionRejected { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("token expired"));
        }
        other => panic!("expected CompletionRejected, got {other:?}"),
    }
}
