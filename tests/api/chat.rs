use reqwest::StatusCode;

use serde_json::{json, Value};

use sqlx::PgPool;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use url::Url;

use wiremock::matchers::*;
use wiremock::{Mock, Request, ResponseTemplate};

use telliarch::service::chat::SYSTEM_PROMPT;

use crate::helpers::TestApp;

fn conversation() -> Value {
    json!({
        "messages": [
            { "role": "user", "content": "What services do you offer?" },
        ]
    })
}

#[sqlx::test]
async fn answers_are_streamed_through(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let events = "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\ndata: [DONE]\n\n";
    Mock::given(path("/chat/completions"))
        .and(method("POST"))
        .and(header("Authorization", "Bearer TestGatewayKey"))
        .and(body_partial_json(json!({ "model": "test-model", "stream": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(events),
        )
        .expect(1)
        .mount(&app.chat_server)
        .await;

    let res = app.chat(&conversation()).await.expect("Failed to chat");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(
        Some("text/event-stream"),
        res.headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
    );
    assert_eq!(events, res.text().await.unwrap());

    Ok(())
}

#[sqlx::test]
async fn system_prompt_is_sent_first(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("data: [DONE]\n\n"))
        .expect(1)
        .mount(&app.chat_server)
        .await;

    app.chat(&conversation()).await.unwrap();

    let requests: Vec<Request> = app.chat_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let messages = body["messages"].as_array().unwrap();

    assert_eq!(2, messages.len());
    assert_eq!("system", messages[0]["role"]);
    assert_eq!(SYSTEM_PROMPT, messages[0]["content"]);
    assert_eq!("user", messages[1]["role"]);
    assert_eq!("What services do you offer?", messages[1]["content"]);

    Ok(())
}

/// Read one full request, head and `Content-Length` body
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.expect("Failed to read request");
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

/// A gateway that answers 200, writes `partial` of a longer body and hangs up
async fn spawn_hanging_up_gateway(partial: &'static str, promised: usize) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind gateway");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("Failed to accept");
        read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\n\r\n",
            promised
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(partial.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        socket.shutdown().await.unwrap();
    });

    Url::parse(&format!("http://{}/", addr)).unwrap()
}

#[sqlx::test]
async fn interrupted_streams_end_early(pool: PgPool) -> sqlx::Result<()> {
    let partial = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n";
    let promised = partial.len() + 1024;
    let gateway = spawn_hanging_up_gateway(partial, promised).await;
    let app = TestApp::spawn_with_chat_gateway(&pool, Some(gateway)).await;

    let res = app.chat(&conversation()).await.expect("Failed to chat");

    assert_eq!(StatusCode::OK, res.status());
    match res.bytes().await {
        // The connection may be cut before the client sees the end of the body
        Err(_) => {}
        Ok(body) => assert!(body.len() < promised, "body was not truncated"),
    }

    let res = app.health_check().await.expect("Server stopped answering");
    assert!(res.status().is_success());

    Ok(())
}

#[sqlx::test]
async fn gateway_failures_are_mapped(pool: PgPool) -> sqlx::Result<()> {
    let test_cases = vec![
        (
            429,
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.",
        ),
        (
            402,
            StatusCode::PAYMENT_REQUIRED,
            "Service temporarily unavailable.",
        ),
        (500, StatusCode::INTERNAL_SERVER_ERROR, "AI service error"),
        (503, StatusCode::INTERNAL_SERVER_ERROR, "AI service error"),
    ];

    for (upstream, expected_status, expected_error) in test_cases {
        let app = TestApp::spawn(&pool).await;

        Mock::given(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(upstream))
            .expect(1)
            .mount(&app.chat_server)
            .await;

        let res = app.chat(&conversation()).await.unwrap();

        assert_eq!(expected_status, res.status(), "upstream {}", upstream);
        let body: Value = res.json().await.unwrap();
        assert_eq!(expected_error, body["error"], "upstream {}", upstream);
    }

    Ok(())
}

#[sqlx::test]
async fn invalid_conversations_are_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.chat_server)
        .await;

    let test_cases = vec![
        ("Missing Messages", json!({})),
        ("Empty Messages", json!({ "messages": [] })),
        (
            "System Message",
            json!({ "messages": [{ "role": "system", "content": "Be rude" }] }),
        ),
        (
            "Unknown Role",
            json!({ "messages": [{ "role": "tool", "content": "Hi" }] }),
        ),
    ];

    for (test_name, body) in test_cases {
        let res = app.chat(&body).await.unwrap();

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", test_name);
    }

    Ok(())
}
