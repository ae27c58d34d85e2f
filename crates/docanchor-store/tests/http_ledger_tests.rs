// Integration tests for the HTTP ledger gateway client
//
// Each test runs a throwaway gateway on a local port that answers from a
// closure.

use docanchor_core::{
    classify, compute_digest_bytes, FailureCode, Identity, LedgerClient, Outcome, RecordLookup,
};
use docanchor_core_types::Sensitive;
use docanchor_store::{HttpLedgerClient, HttpLedgerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct Request {
    method: String,
    path: String,
    headers: String,
    body: String,
}

async fn read_request(socket: &mut TcpStream) -> Request {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    let raw = String::from_utf8_lossy(&buf).to_string();
    let (head, body) = raw.split_once("\r\n\r\n").unwrap_or((raw.as_str(), ""));
    let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
    Request {
        method: request_line.next().unwrap_or("").to_string(),
        path: request_line.next().unwrap_or("").to_string(),
        headers: head.to_lowercase(),
        body: body.to_string(),
    }
}

async fn spawn_gateway<F>(handler: F) -> String
where
    F: Fn(&Request) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (status, body) = handler(&request);
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

fn fast_config(base_url: &str) -> HttpLedgerConfig {
    let mut config = HttpLedgerConfig::new(base_url);
    config.timeout = Duration::from_secs(5);
    config.poll_interval = Duration::from_millis(10);
    config.max_polls = 5;
    config
}

#[tokio::test]
async fn test_issue_lifecycle_polls_until_confirmed() {
    // Given: A gateway that confirms on the second poll
    let polls = Arc::new(AtomicUsize::new(0));
    let seen_polls = polls.clone();
    let base = spawn_gateway(move |req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/v1/accounts") => (200, r#"{"accounts": ["issuer-a"]}"#.to_string()),
        ("POST", "/v1/records") => (202, r#"{"tx_id": "0xabc"}"#.to_string()),
        ("GET", "/v1/transactions/0xabc") => {
            if seen_polls.fetch_add(1, Ordering::SeqCst) == 0 {
                (200, r#"{"status": "pending"}"#.to_string())
            } else {
                (
                    200,
                    r#"{"status": "confirmed", "confirmed_at": "2026-01-01T00:00:00Z"}"#
                        .to_string(),
                )
            }
        }
        _ => (404, String::new()),
    })
    .await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();
    let digest = compute_digest_bytes(b"hello");

    // When: Connecting, submitting and awaiting confirmation
    let session = client.connect().await.unwrap();
    let pending = client.submit_record(&session, &digest).await.unwrap();
    let commitment = client.await_commitment(&pending).await.unwrap();

    // Then: The gateway's transaction id is carried through
    assert_eq!(session.identity().as_str(), "issuer-a");
    assert_eq!(commitment.tx_id, "0xabc");
    assert!(commitment.confirmed_at.is_some());
    assert_eq!(polls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_submit_body_carries_digest_and_owner() {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let captured = bodies.clone();
    let base = spawn_gateway(move |req| {
        if req.method == "POST" {
            captured.lock().unwrap().push(req.body.clone());
        }
        (202, r#"{"tx_id": "0x1"}"#.to_string())
    })
    .await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();
    let session = docanchor_core::Session::new(Identity::parse("issuer-a").unwrap());
    let digest = compute_digest_bytes(b"hello");

    client.submit_record(&session, &digest).await.unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&bodies.lock().unwrap()[0]).unwrap();
    assert_eq!(body["digest"], digest.as_str());
    assert_eq!(body["owner"], "issuer-a");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let headers = Arc::new(Mutex::new(String::new()));
    let captured = headers.clone();
    let base = spawn_gateway(move |req| {
        *captured.lock().unwrap() = req.headers.clone();
        (200, r#"{"found": false}"#.to_string())
    })
    .await;
    let mut config = fast_config(&base);
    config.token = Some(Sensitive::new("gateway-token".to_string()));
    let client = HttpLedgerClient::with_config(config).unwrap();

    client
        .lookup_record(&compute_digest_bytes(b"x"))
        .await
        .unwrap();

    assert!(headers
        .lock()
        .unwrap()
        .contains("authorization: bearer gateway-token"));
}

#[tokio::test]
async fn test_duplicate_rejection_body_classifies() {
    let base = spawn_gateway(|_| {
        (
            409,
            r#"{"code": -32603, "message": "Internal JSON-RPC error.", "data": {"message": "execution reverted: Error: document already recorded"}}"#
                .to_string(),
        )
    })
    .await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();
    let session = docanchor_core::Session::new(Identity::parse("issuer-b").unwrap());
    let digest = compute_digest_bytes(b"hello");

    let failure = client.submit_record(&session, &digest).await.unwrap_err();

    assert_eq!(
        classify(&failure, &digest),
        Outcome::DuplicateRejected { digest }
    );
}

#[tokio::test]
async fn test_failed_transaction_surfaces_reason() {
    let base = spawn_gateway(|_| {
        (
            200,
            r#"{"status": "failed", "failure": {"reason": "Error: insufficient gas"}}"#.to_string(),
        )
    })
    .await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();
    let pending = docanchor_core::PendingRecord {
        tx_id: "0xdef".to_string(),
        digest: compute_digest_bytes(b"x"),
        owner: Identity::parse("issuer-a").unwrap(),
    };

    let failure = client.await_commitment(&pending).await.unwrap_err();

    match classify(&failure, &pending.digest) {
        Outcome::RevertedOther { reason, .. } => assert_eq!(reason, "insufficient gas"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_poll_exhaustion_is_timeout() {
    let base = spawn_gateway(|_| (200, r#"{"status": "pending"}"#.to_string())).await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();
    let pending = docanchor_core::PendingRecord {
        tx_id: "0xslow".to_string(),
        digest: compute_digest_bytes(b"x"),
        owner: Identity::parse("issuer-a").unwrap(),
    };

    let failure = client.await_commitment(&pending).await.unwrap_err();

    assert_eq!(failure.error_code, Some(FailureCode::Timeout));
    assert!(matches!(
        classify(&failure, &pending.digest),
        Outcome::ConnectivityFailure { .. }
    ));
}

#[tokio::test]
async fn test_lookup_not_found_status() {
    let base = spawn_gateway(|_| (404, String::new())).await;
    let client = HttpLedgerClient::with_config(fast_config(&base)).unwrap();

    let lookup = client
        .lookup_record(&compute_digest_bytes(b"hello!"))
        .await
        .unwrap();

    assert_eq!(lookup, RecordLookup::not_found());
}

#[tokio::test]
async fn test_closed_port_is_unreachable() {
    // Given: A port that was bound and released
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = HttpLedgerClient::with_config(fast_config(&format!("http://{}", addr))).unwrap();
    let digest = compute_digest_bytes(b"hello");

    // When: Looking up a digest
    let failure = client.lookup_record(&digest).await.unwrap_err();

    // Then: The classifier reports a connectivity failure
    assert_eq!(failure.error_code, Some(FailureCode::Unreachable));
    assert!(matches!(
        classify(&failure, &digest),
        Outcome::ConnectivityFailure { .. }
    ));
}

#[tokio::test]
async fn test_connect_rejects_unknown_configured_identity() {
    let base = spawn_gateway(|_| (200, r#"{"accounts": ["issuer-a"]}"#.to_string())).await;
    let mut config = fast_config(&base);
    config.identity = Some(Identity::parse("issuer-z").unwrap());
    let client = HttpLedgerClient::with_config(config).unwrap();

    let failure = client.connect().await.unwrap_err();

    assert!(failure.message.contains("issuer-z"));
}
