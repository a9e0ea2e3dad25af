//! Tests for the OpenAI provider: headers and streaming over a local socket.

use futures_util::StreamExt;
use llm::{Client, Error, General, LLM, Message, Request, Role};
use relay_openai::{OpenAI, endpoint};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

#[test]
fn api_sets_bearer_authorization() {
    let provider = OpenAI::api(Client::new(), "test-key").expect("provider");
    let auth = provider
        .headers()
        .get("authorization")
        .expect("authorization header");
    assert_eq!(auth.to_str().unwrap(), "Bearer test-key");
    assert_eq!(provider.endpoint(), endpoint::OPENAI);
}

#[test]
fn no_key_omits_authorization() {
    let provider = OpenAI::new(Client::new(), endpoint::OLLAMA, None).expect("provider");
    assert!(provider.headers().get("authorization").is_none());
    assert_eq!(provider.endpoint(), endpoint::OLLAMA);
}

#[test]
fn new_sets_endpoint_and_content_type() {
    let provider = OpenAI::new(
        Client::new(),
        "http://localhost:8080/v1/chat/completions",
        Some("k"),
    )
    .expect("provider");
    let ct = provider
        .headers()
        .get("content-type")
        .expect("content-type");
    assert_eq!(ct.to_str().unwrap(), "application/json");
    let accept = provider.headers().get("accept").expect("accept");
    assert_eq!(accept.to_str().unwrap(), "text/event-stream");
    assert_eq!(
        provider.endpoint(),
        "http://localhost:8080/v1/chat/completions"
    );
}

/// Answer one connection with `response`, returning the raw request.
async fn serve(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (format!("http://{addr}/v1/chat/completions"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        let Some(end) = text.find("\r\n\r\n") else {
            continue;
        };
        let length = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn provider(url: &str) -> OpenAI {
    let client = Client::builder().no_proxy().build().unwrap();
    OpenAI::new(client, url, Some("test-key")).unwrap()
}

fn request() -> Request {
    Request::from(&General::default())
        .messages(&[Message::user("hello")])
        .stream()
}

#[tokio::test]
async fn stream_decodes_events_in_order() {
    let body = concat!(
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"id\":\"c1\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    let (url, server) = serve(response("200 OK", "text/event-stream", body)).await;
    let provider = provider(&url);

    let chunks: Vec<_> = provider.stream(&request()).collect().await;
    let chunks: Vec<_> = chunks.into_iter().map(Result::unwrap).collect();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].first().unwrap().role, Some(Role::Assistant));
    let content: String = chunks
        .iter()
        .filter_map(|c| c.first().and_then(|d| d.content.clone()))
        .collect();
    assert_eq!(content, "Hello");

    let sent = server.await.unwrap();
    assert!(sent.starts_with("POST /v1/chat/completions"));
    assert!(sent.to_lowercase().contains("authorization: bearer test-key"));
    assert!(sent.contains("\"stream\":true"));
}

#[tokio::test]
async fn error_status_is_reported() {
    let (url, server) = serve(response("500 Internal Server Error", "text/plain", "boom")).await;
    let provider = provider(&url);

    let events: Vec<_> = provider.stream(&request()).collect().await;

    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Err(Error::Status { status: 500, body }) if body == "boom"
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn undecodable_event_is_malformed() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: {oops\n\n";
    let (url, server) = serve(response("200 OK", "text/event-stream", body)).await;
    let provider = provider(&url);

    let events: Vec<_> = provider.stream(&request()).collect().await;

    assert_eq!(events.len(), 2);
    assert!(events[0].is_ok());
    assert!(events[1].as_ref().unwrap_err().is_malformed());
    server.await.unwrap();
}
