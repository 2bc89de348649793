use pms_client::{ClientConfig, ClientError, HotelApi, HttpClient, NetworkHttpClient, Session};
use serde_json::Value;
use shared::ErrorCode;
use shared::models::TicketStatus;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer one connection per scripted reply; returns the raw requests
async fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            seen.push(read_request(&mut socket).await);
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        seen
    });
    (base, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn client(base: &str, session: Session) -> NetworkHttpClient {
    NetworkHttpClient::new(&ClientConfig::new(base).with_timeout(5), session).unwrap()
}

#[tokio::test]
async fn test_bearer_header_follows_session() {
    let (base, server) = serve(vec![(200, "[]"), (200, "[]")]).await;
    let session = Session::with_token("tok-1");
    let http = client(&base, session.clone());

    let _: Value = http.get("/api/kot/all").await.unwrap();
    session.clear();
    let _: Value = http.get("/api/kot/all").await.unwrap();

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/kot/all "));
    assert!(requests[0].to_ascii_lowercase().contains("authorization: bearer tok-1"));
    assert!(!requests[1].to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn test_status_mapping_and_error_body() {
    let (base, server) = serve(vec![
        (404, r#"{"message":"Booking not found"}"#),
        (500, r#"{"error":"db down"}"#),
        (200, ""),
    ])
    .await;
    let http = client(&base, Session::new());

    let err = http.get::<Value>("/api/bookings/b1").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Booking not found"));

    let err = http.get::<Value>("/api/bookings/b1").await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { status: 500, ref message } if message == "db down"));

    // Empty 2xx body reads as null
    let value: Value = http.get("/api/bookings/b1").await.unwrap();
    assert!(value.is_null());
    server.await.unwrap();
}

#[tokio::test]
async fn test_typed_api_over_the_wire() {
    let (base, server) = serve(vec![
        (200, r#"{"success":true,"kots":[{"_id":"k1","orderId":"o1","tableNo":5,"items":["Tea"]}]}"#),
        (200, r#"{"success":true}"#),
        (400, r#"{"message":"Invalid status"}"#),
    ])
    .await;
    let api = HotelApi::new(client(&base, Session::with_token("t")));

    let tickets = api.tickets().await.unwrap();
    assert_eq!(tickets[0].table_no, "5");

    api.update_ticket_status("k1", TicketStatus::Ready).await.unwrap();
    let err = api
        .update_ticket_status("k1", TicketStatus::Served)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BackendRejected);
    assert_eq!(err.message, "Invalid status");

    let requests = server.await.unwrap();
    assert!(requests[1].starts_with("PATCH /api/kot/k1/status "));
    assert!(requests[1].ends_with(r#"{"status":"ready"}"#));
}
