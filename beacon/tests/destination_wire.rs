//! The built-in HTTP destination on the wire, against a local listener.

use beacon::{Analytics, Outcome, Settings};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

mod common;
use common::props;

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn read_request(socket: &mut TcpStream) -> (String, serde_json::Value) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "peer closed before headers arrived");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length: usize = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .expect("content-length header");

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "peer closed mid-body");
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();
    (head, body)
}

/// Accept one request, answer with `status`, and hand back what was read.
fn serve_once(
    listener: TcpListener,
    status: &'static str,
) -> JoinHandle<(String, serde_json::Value)> {
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response =
            format!("HTTP/1.1 {status}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        socket.write_all(response.as_bytes()).await.unwrap();
        request
    })
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (header, value) = line.split_once(':')?;
        header.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[tokio::test]
async fn destination_posts_the_serialized_event() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_once(listener, "200 OK");

    let analytics =
        Analytics::load(Settings::new("abc").with_endpoint(format!("http://{addr}"))).await;
    let ctx = analytics
        .track("purchase", Some(props(serde_json::json!({ "amount": 10 }))), None)
        .await;

    let (head, body) = server.await.unwrap();

    assert!(head.starts_with("POST /v1/track"), "unexpected request: {head}");
    // write key "abc" as basic-auth username, empty password.
    assert_eq!(header_value(&head, "authorization"), Some("Basic YWJjOg=="));
    assert_eq!(body["type"], "track");
    assert_eq!(body["event"], "purchase");
    assert_eq!(body["properties"]["amount"], 10);
    assert!(body["message_id"].is_string());
    assert!(body["anonymous_id"].is_string());

    assert!(ctx.succeeded());
    let names: Vec<_> = ctx.log().iter().map(|e| e.extension.as_str()).collect();
    assert_eq!(names, ["validation", "http-destination"]);
}

#[tokio::test]
async fn non_success_status_is_a_per_event_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = serve_once(listener, "500 Internal Server Error");

    let analytics =
        Analytics::load(Settings::new("abc").with_endpoint(format!("http://{addr}"))).await;
    let ctx = analytics.track("doomed", None, None).await;

    server.await.unwrap();

    // track itself resolved; the failure lives in the log.
    assert!(!ctx.succeeded());
    let entry = ctx
        .log()
        .iter()
        .find(|e| e.extension == "http-destination")
        .expect("destination entry");
    match &entry.outcome {
        Outcome::Failure(message) => assert!(message.contains("500"), "got: {message}"),
        other => panic!("expected failure, got {other:?}"),
    }
}
