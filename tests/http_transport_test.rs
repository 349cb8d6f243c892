//! Wire-level tests for the reqwest transport against a local mock server.
//!
//! Run with:
//!   cargo test --test http_transport_test

use carsxe_catalog::VehicleQuery;
use carsxe_core::{ApiKey, ErrorKind, JsonItem};
use carsxe_dispatch::{Dispatcher, FailurePolicy, Outcome, ReqwestTransport};
use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn dispatcher(base_url: &str) -> Dispatcher {
    Dispatcher::new(
        Arc::new(ReqwestTransport::new()),
        ApiKey::new("secret-key").unwrap(),
    )
    .with_base_url(base_url)
    .with_policy(FailurePolicy::ContinueOnFail)
}

#[tokio::test]
async fn test_get_sends_key_source_and_fields_as_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/platedecoder")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "secret-key".into()),
            Matcher::UrlEncoded("source".into(), "n8n".into()),
            Matcher::UrlEncoded("plate".into(), "7XER187".into()),
            Matcher::UrlEncoded("state".into(), "CA".into()),
            Matcher::UrlEncoded("country".into(), "US".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"make":"Toyota"}"#)
        .create_async()
        .await;

    let results = dispatcher(&server.url())
        .run(&[VehicleQuery::plate("7XER187", "CA")])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        results[0].outcome,
        Outcome::Success(json!({ "success": true, "make": "Toyota" }))
    );
}

#[tokio::test]
async fn test_post_sends_upload_url_in_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/platerecognition")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "secret-key".into()),
            Matcher::UrlEncoded("source".into(), "n8n".into()),
        ]))
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "upload_url": "https://example.com/plate.jpg" })))
        .with_status(200)
        .with_body(r#"{"plate":"7XER187"}"#)
        .create_async()
        .await;

    let item = JsonItem::from_value(json!({
        "resource": "plate",
        "operation": "plateImageRecognition",
        "uploadUrl": "https://example.com/plate.jpg"
    }))
    .unwrap();
    let outputs = dispatcher(&server.url()).run_outputs(&[item]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(outputs[0], json!({ "plate": "7XER187" }));
}

#[tokio::test]
async fn test_non_json_body_is_wrapped() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/images")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body("<images></images>")
        .create_async()
        .await;

    let item = JsonItem::from_value(json!({
        "operation": "images",
        "make": "BMW",
        "model": "X5",
        "format": "xml"
    }))
    .unwrap();
    let outputs = dispatcher(&server.url()).run_outputs(&[item]).await.unwrap();

    assert_eq!(outputs[0], json!({ "text": "<images></images>" }));
}

#[tokio::test]
async fn test_error_status_is_classified() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/recalls")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":"Invalid API key","error_description":"The key is not active"}"#)
        .create_async()
        .await;

    let outputs = dispatcher(&server.url())
        .run_outputs(&[VehicleQuery::recalls("1C4JJXR64PW696340")])
        .await
        .unwrap();

    assert_eq!(outputs[0]["errorType"], json!("HttpError"));
    assert_eq!(outputs[0]["statusCode"], json!(401));
    assert_eq!(outputs[0]["errorMessage"], json!("Invalid API key"));
    assert_eq!(outputs[0]["errorDescription"], json!("The key is not active"));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Port 9 (discard) on localhost is not expected to accept connections
    let results = dispatcher("http://127.0.0.1:9")
        .run(&[VehicleQuery::obd("P0115")])
        .await
        .unwrap();

    assert_eq!(results[0].kind(), Some(ErrorKind::Transport));
    assert_eq!(results[0].to_output()["statusCode"], json!("unknown"));
}

#[tokio::test]
async fn test_truncated_body_keeps_received_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        // Promise 100 bytes, send 5, then hang up
        socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        let _ = socket.shutdown().await;
    });

    let results = dispatcher(&format!("http://{}", addr))
        .run(&[VehicleQuery::obd("P0115")])
        .await
        .unwrap();

    assert_eq!(results[0].kind(), Some(ErrorKind::Transport));
    assert_eq!(results[0].outcome.status_code(), Some(502));
    assert_eq!(results[0].to_output()["statusCode"], json!(502));
}
