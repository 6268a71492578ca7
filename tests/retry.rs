//! Behavioural tests against a local stub service.
//!
//! A plain `TcpListener` answers every request with a canned HTTP response
//! and counts the connections, which makes the retry loop and the fault
//! handling of the client observable without touching the real service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sascar_rs::{Credentials, RetryPolicy, SascarClient, SascarError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const FAULT_ENVELOPE: &str = r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/">
    <S:Body>
        <S:Fault>
            <faultcode>S:Server</faultcode>
            <faultstring>Usuario ou senha invalidos</faultstring>
        </S:Fault>
    </S:Body>
</S:Envelope>"#;

const VEHICLES_ENVELOPE: &str = r#"<S:Envelope xmlns:S="http://schemas.xmlsoap.org/soap/envelope/">
    <S:Body>
        <ns2:obterVeiculosResponse xmlns:ns2="http://webservice.web.integracao.sascar.com.br/">
            <return>
                <idVeiculo>1231226</idVeiculo>
                <placa>ABC1D23</placa>
            </return>
        </ns2:obterVeiculosResponse>
    </S:Body>
</S:Envelope>"#;

/// Serves the same response to every request and returns the endpoint URL
/// plus the connection counter.
async fn stub_service(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);

            let mut buffer = vec![0u8; 64 * 1024];
            let mut read = 0usize;
            loop {
                match stream.read(&mut buffer[read..]).await {
                    Ok(0) => break,
                    Ok(n) => {
                        read += n;
                        if request_complete(&buffer[..read]) {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{}", address), hits)
}

fn request_complete(bytes: &[u8]) -> bool {
    let Some(header_end) = bytes.windows(4).position(|window| window == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&bytes[..header_end]);
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    bytes.len() >= header_end + 4 + content_length
}

fn stub_client(endpoint: &str) -> SascarClient {
    SascarClient::builder()
        .credentials(Credentials::new("user", "pass").unwrap())
        .endpoint(endpoint)
        .retry(RetryPolicy {
            backoff_factor: Duration::from_millis(1),
            ..Default::default()
        })
        .build()
}

#[tokio::test]
async fn exhausted_retries_surface_the_fault() {
    let (endpoint, hits) = stub_service("500 Internal Server Error", FAULT_ENVELOPE).await;
    let client = stub_client(&endpoint);

    let error = client.vehicles(0).await.unwrap_err();
    match error {
        SascarError::Fault { code, message } => {
            assert_eq!(code, "S:Server");
            assert_eq!(message, "Usuario ou senha invalidos");
        }
        other => panic!("expected the fault, got {other:?}"),
    }

    // the initial attempt plus max_retries, never more
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn retryable_status_without_fault_reports_the_status() {
    let (endpoint, hits) = stub_service("503 Service Unavailable", "").await;
    let client = stub_client(&endpoint);

    let error = client.vehicles(0).await.unwrap_err();
    match error {
        SascarError::HttpStatus { status } => assert_eq!(status.as_u16(), 503),
        other => panic!("expected a status error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn non_retryable_statuses_fail_on_the_first_attempt() {
    let (endpoint, hits) = stub_service("404 Not Found", "").await;
    let client = stub_client(&endpoint);

    let error = client.vehicles(0).await.unwrap_err();
    match error {
        SascarError::HttpStatus { status } => assert_eq!(status.as_u16(), 404),
        other => panic!("expected a status error, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_responses_are_converted_without_retrying() {
    let (endpoint, hits) = stub_service("200 OK", VEHICLES_ENVELOPE).await;
    let client = stub_client(&endpoint);

    let vehicles = client.vehicles(0).await.unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["placa"], serde_json::json!("ABC1D23"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
