//! Drives the real Gemini client against a local HTTP stub.

use rgenviews::{
    GeminiClient, GeminiConfig, ImageGenerator, ViewOrchestrator, ViewType, ViewsError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

#[derive(Debug, Clone)]
struct Captured {
    request_line: String,
    api_key: Option<String>,
    body: Value,
}

type Handler = fn(&Value) -> (u16, String);

async fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<String>, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n").filter(|l| !l.is_empty());
    let request_line = lines.next()?.to_string();
    let headers: Vec<String> = lines.map(str::to_string).collect();

    let content_length = headers
        .iter()
        .find_map(|h| {
            let (name, value) = h.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some((request_line, headers, buf[header_end..].to_vec()))
}

async fn spawn_stub(handler: Handler) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let sink = sink.clone();
            tokio::spawn(async move {
                let Some((request_line, headers, body)) = read_request(&mut stream).await else {
                    return;
                };
                let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                let api_key = headers.iter().find_map(|h| {
                    let (name, value) = h.split_once(':')?;
                    name.eq_ignore_ascii_case("x-goog-api-key")
                        .then(|| value.trim().to_string())
                });

                let (status, response) = handler(&body);
                sink.lock().unwrap().push(Captured {
                    request_line,
                    api_key,
                    body,
                });

                let reply = format!(
                    "HTTP/1.1 {} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    response.len(),
                    response
                );
                let _ = stream.write_all(reply.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), captured)
}

fn prompt_of(body: &Value) -> &str {
    body["contents"][0]["parts"][1]["text"].as_str().unwrap_or("")
}

fn image_reply(data: &str) -> String {
    json!({
        "candidates": [{
            "content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": data}}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Left is a server error, Top answers with text only, the rest succeed.
fn mixed_handler(body: &Value) -> (u16, String) {
    let prompt = prompt_of(body);
    if prompt.starts_with("Left") {
        (500, json!({"error": {"message": "internal"}}).to_string())
    } else if prompt.starts_with("Top") {
        (
            200,
            json!({"candidates": [{"content": {"parts": [{"text": "I cannot see the top"}]}}]})
                .to_string(),
        )
    } else {
        (200, image_reply("iVBORw0KGgo="))
    }
}

fn client_for(base_url: &str) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_base_url(base_url)
        .with_model("stub-model");
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    GeminiClient::with_http_client(config, http)
}

#[tokio::test]
async fn client_sends_inline_image_and_prompt() {
    let (base_url, captured) = spawn_stub(|_| (200, image_reply("QUJD"))).await;
    let client = client_for(&base_url);
    let image = rgenviews::encoder::encode_bytes(PNG).unwrap();

    let inline = client.generate(&image, "Front view: test").await.unwrap();
    assert_eq!(inline.to_data_uri(), "data:image/png;base64,QUJD");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0].request_line,
        "POST /v1beta/models/stub-model:generateContent HTTP/1.1"
    );
    assert_eq!(captured[0].api_key.as_deref(), Some("test-key"));

    let body = &captured[0].body;
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["data"], image.payload);
    assert_eq!(prompt_of(body), "Front view: test");
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        json!(["IMAGE", "TEXT"])
    );
}

#[tokio::test]
async fn client_maps_http_errors_to_response_errors() {
    let (base_url, _) = spawn_stub(|_| (429, "{\"error\":\"slow down\"}".to_string())).await;
    let client = client_for(&base_url);
    let image = rgenviews::encoder::encode_bytes(PNG).unwrap();

    match client.generate(&image, "Back view").await {
        Err(ViewsError::ResponseError(msg)) => assert!(msg.contains("429")),
        other => panic!("expected response error, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(&base_url);
    let image = rgenviews::encoder::encode_bytes(PNG).unwrap();
    let err = client.generate(&image, "Front view").await.unwrap_err();
    assert!(matches!(err, ViewsError::RequestError(_)));
}

#[tokio::test]
async fn orchestrator_absorbs_remote_failures() {
    let (base_url, captured) = spawn_stub(mixed_handler).await;
    let orchestrator = ViewOrchestrator::new(client_for(&base_url));

    let run = orchestrator.generate_from_bytes(PNG).await.unwrap();

    assert_eq!(run.labels(), ViewType::ALL.to_vec());
    let absent: Vec<ViewType> = run
        .iter()
        .filter(|r| r.image_data_uri.is_none())
        .map(|r| r.label)
        .collect();
    assert_eq!(absent, vec![ViewType::Left, ViewType::Top]);
    assert_eq!(
        run.get(ViewType::Front).unwrap().image_data_uri.as_deref(),
        Some("data:image/png;base64,iVBORw0KGgo=")
    );
    assert_eq!(captured.lock().unwrap().len(), 6);
}
