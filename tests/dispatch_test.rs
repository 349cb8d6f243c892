//! End-to-end dispatch tests against a scripted transport.
//!
//! Run with:
//!   cargo test --test dispatch_test

use carsxe_catalog::{CatalogVariant, HttpMethod, ImageAngle, ImageOptions, VehicleQuery};
use carsxe_core::{ApiKey, Error, ErrorKind, JsonItem};
use carsxe_dispatch::testing::ScriptedTransport;
use carsxe_dispatch::{Dispatcher, FailurePolicy, Outcome};
use serde_json::{Value, json};
use std::sync::Arc;

const VIN: &str = "WBAFR7C57CC811956";

fn items(value: Value) -> Vec<JsonItem> {
    JsonItem::many_from_value(value).unwrap()
}

fn dispatcher(transport: &Arc<ScriptedTransport>, policy: FailurePolicy) -> Dispatcher {
    Dispatcher::new(transport.clone(), ApiKey::new("test-key").unwrap()).with_policy(policy)
}

#[tokio::test]
async fn test_success_body_is_passed_through() {
    let transport = Arc::new(ScriptedTransport::new().respond(200, json!({ "make": "BMW" })));

    let outputs = dispatcher(&transport, FailurePolicy::Strict)
        .run_outputs(&items(json!([{ "resource": "vin", "operation": "specs", "vin": VIN }])))
        .await
        .unwrap();

    assert_eq!(outputs, vec![json!({ "make": "BMW" })]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert_eq!(requests[0].path, "/specs");
    assert_eq!(requests[0].query_param("key"), Some("test-key"));
    assert_eq!(requests[0].query_param("source"), Some("n8n"));
    assert_eq!(requests[0].query_param("vin"), Some(VIN));
    assert!(requests[0].body.is_none());
}

#[tokio::test]
async fn test_http_error_aborts_strict_run() {
    let transport = Arc::new(ScriptedTransport::new().respond(404, json!({ "error": "not found" })));

    let err = dispatcher(&transport, FailurePolicy::Strict)
        .run(&items(json!([{ "operation": "history", "vin": VIN }])))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("404"), "message: {}", message);
    assert!(message.contains("not found"), "message: {}", message);
    assert_eq!(err.kind(), ErrorKind::Http);
}

#[tokio::test]
async fn test_http_error_becomes_record_when_continuing() {
    let transport = Arc::new(ScriptedTransport::new().respond(404, json!({ "error": "not found" })));

    let outputs = dispatcher(&transport, FailurePolicy::ContinueOnFail)
        .run_outputs(&items(json!([{ "operation": "history", "vin": VIN }])))
        .await
        .unwrap();

    let record = &outputs[0];
    assert_eq!(record["error"], json!(true));
    assert_eq!(record["success"], json!(false));
    assert_eq!(record["errorType"], json!("HttpError"));
    assert_eq!(record["statusCode"], json!(404));
    assert_eq!(record["errorMessage"], json!("not found"));
    assert_eq!(record["responseData"], json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_success_false_is_application_error() {
    let transport = Arc::new(
        ScriptedTransport::new().respond(200, json!({ "success": false, "error": "invalid vin" })),
    );

    let results = dispatcher(&transport, FailurePolicy::ContinueOnFail)
        .run(&[VehicleQuery::specs("123")])
        .await
        .unwrap();

    assert!(matches!(
        &results[0].outcome,
        Outcome::ApplicationError { error, .. } if error.message == "invalid vin"
    ));
    assert_eq!(results[0].kind(), Some(ErrorKind::Application));
}

#[tokio::test]
async fn test_one_result_per_item_in_order() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(200, json!({ "n": 0 }))
            .fail("connection reset", None)
            .respond(200, json!({ "n": 2 })),
    );

    let input = items(json!([
        { "operation": "recalls", "vin": "A" },
        { "operation": "recalls", "vin": "B" },
        { "operation": "recalls", "vin": "C" }
    ]));
    let outputs = dispatcher(&transport, FailurePolicy::ContinueOnFail)
        .run_outputs(&input)
        .await
        .unwrap();

    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[0], json!({ "n": 0 }));
    assert_eq!(outputs[1]["errorType"], json!("TransportError"));
    assert_eq!(outputs[1]["statusCode"], json!("unknown"));
    assert_eq!(outputs[1]["_metadata"]["itemIndex"], json!(1));
    assert_eq!(outputs[1]["_metadata"]["resource"], json!("vin"));
    assert_eq!(outputs[2], json!({ "n": 2 }));

    let vins: Vec<_> = transport
        .requests()
        .iter()
        .map(|r| r.query_param("vin").unwrap_or_default().to_string())
        .collect();
    assert_eq!(vins, ["A", "B", "C"]);
}

#[tokio::test]
async fn test_strict_run_sends_nothing_after_failure() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(500, json!({ "message": "upstream down" }))
            .respond(200, json!({})),
    );

    let input = items(json!([
        { "operation": "recalls", "vin": "A" },
        { "operation": "recalls", "vin": "B" }
    ]));
    let err = dispatcher(&transport, FailurePolicy::Strict)
        .run(&input)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ItemFailed { index: 0, status_code: Some(500), .. }));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.remaining(), 1);
}

#[tokio::test]
async fn test_repeated_item_gives_identical_output() {
    let body = json!({ "input": { "vin": VIN }, "specs": { "make": "BMW", "year": "2012" } });
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(200, body.clone())
            .respond(200, body),
    );

    let item = json!({ "resource": "vin", "operation": "specs", "vin": VIN });
    let outputs = dispatcher(&transport, FailurePolicy::Strict)
        .run_outputs(&items(json!([item.clone(), item])))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&outputs[0]).unwrap(),
        serde_json::to_string(&outputs[1]).unwrap()
    );
}

#[tokio::test]
async fn test_only_set_options_reach_the_wire() {
    let transport = Arc::new(ScriptedTransport::new().respond(200, json!({ "images": [] })));

    let query = VehicleQuery::VehicleImages {
        make: "BMW".to_string(),
        model: "X5".to_string(),
        options: ImageOptions {
            year: Some("2019".to_string()),
            transparent: Some(false),
            angle: Some(ImageAngle::Side),
            ..ImageOptions::default()
        },
    };
    dispatcher(&transport, FailurePolicy::Strict)
        .run(&[query])
        .await
        .unwrap();

    let request = &transport.requests()[0];
    let names: Vec<&str> = request.query.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, ["key", "source", "make", "model", "year", "angle"]);
    assert_eq!(request.query_param("angle"), Some("side"));
}

#[tokio::test]
async fn test_image_operations_post_json_body() {
    let transport = Arc::new(ScriptedTransport::new().respond(200, json!({ "vin": VIN })));

    dispatcher(&transport, FailurePolicy::Strict)
        .run(&items(json!([{
            "resource": "diagnostic",
            "operation": "vinOcr",
            "uploadUrl": "https://example.com/vin.jpg"
        }])))
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "/v1/vinocr");
    assert_eq!(request.query_param("key"), Some("test-key"));
    assert_eq!(request.query_param("upload_url"), None);
    assert_eq!(
        request.body,
        Some(json!({ "upload_url": "https://example.com/vin.jpg" }))
    );
}

#[tokio::test]
async fn test_flat_variant_uses_image_url_field() {
    let transport = Arc::new(ScriptedTransport::new().respond(200, json!({})));

    dispatcher(&transport, FailurePolicy::Strict)
        .with_variant(CatalogVariant::flat())
        .run(&[VehicleQuery::PlateImageRecognition {
            upload_url: "https://example.com/plate.jpg".to_string(),
        }])
        .await
        .unwrap();

    assert_eq!(
        transport.requests()[0].body,
        Some(json!({ "image_url": "https://example.com/plate.jpg" }))
    );
}

#[tokio::test]
async fn test_invalid_choice_never_reaches_transport() {
    let transport = Arc::new(ScriptedTransport::new());

    let outputs = dispatcher(&transport, FailurePolicy::ContinueOnFail)
        .run_outputs(&items(json!([{
            "operation": "vehicle-images",
            "make": "BMW",
            "model": "X5",
            "angle": "top"
        }])))
        .await
        .unwrap();

    assert_eq!(outputs[0]["errorType"], json!("ConfigurationError"));
    assert!(transport.requests().is_empty());
}
