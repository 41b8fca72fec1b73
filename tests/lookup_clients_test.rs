//! HTTP lookup clients against mock servers.

use sdwan_import::geo::resolve;
use sdwan_import::{
    ImportError, Ipv4, PostcodeLookup, PostcodesIoClient, RipeStatClient, RouteLookup,
};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Answers every bulk request with one result per requested postcode.
struct EchoPostcodes;

impl wiremock::Respond for EchoPostcodes {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let result: Vec<Value> = body["postcodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| {
                json!({
                    "query": p,
                    "result": {"postcode": p, "latitude": 53.796, "longitude": -1.5477}
                })
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"status": 200, "result": result}))
    }
}

fn postcodes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("LS{i}1UR")).collect()
}

#[tokio::test]
async fn test_postcodes_io_bulk_lookup() {
    let server = MockServer::start().await;
    let body = json!({
        "status": 200,
        "result": [
            {"query": "LS11UR", "result": {"postcode": "LS1 1UR", "latitude": 53.796, "longitude": -1.5477}},
            {"query": "ZZ99ZZ", "result": null}
        ]
    });
    Mock::given(method("POST"))
        .and(path("/postcodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = PostcodesIoClient::new(&format!("{}/postcodes", server.uri()), TIMEOUT).unwrap();
    let results = client
        .lookup(&["LS11UR".to_string(), "ZZ99ZZ".to_string()])
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].latitude, 53.796);
    assert!(results[1].latitude.is_nan(), "unknown postcode must be NaN");

    let sent: Value = serde_json::from_slice(&server.received_requests().await.unwrap()[0].body).unwrap();
    assert_eq!(sent, json!({"postcodes": ["LS11UR", "ZZ99ZZ"]}));
}

#[tokio::test]
async fn test_postcodes_io_250_postcodes_three_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/postcodes"))
        .respond_with(EchoPostcodes)
        .expect(3)
        .mount(&server)
        .await;

    let client = PostcodesIoClient::new(&format!("{}/postcodes", server.uri()), TIMEOUT).unwrap();
    let input = postcodes(250);
    let results = resolve(&client, &input).await.unwrap();
    assert_eq!(results.len(), 250);
    for (sent, got) in input.iter().zip(&results) {
        assert_eq!(sent, &got.postcode);
    }

    let sizes: Vec<usize> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["postcodes"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn test_postcodes_io_error_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = PostcodesIoClient::new(&server.uri(), TIMEOUT).unwrap();
    match client.lookup(&postcodes(2)).await {
        Err(ImportError::PostcodeStatus { status, body, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected PostcodeStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_postcodes_io_bad_body_names_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": 200, "result": [{"query": 7}]})),
        )
        .mount(&server)
        .await;

    let client = PostcodesIoClient::new(&server.uri(), TIMEOUT).unwrap();
    match client.lookup(&postcodes(1)).await {
        Err(ImportError::PostcodeDecode { path, .. }) => assert_eq!(path, "result[0].query"),
        other => panic!("expected PostcodeDecode, got {other:?}"),
    }
}

#[tokio::test]
async fn test_postcodes_io_unreachable_is_connect_error() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = PostcodesIoClient::new(&format!("http://127.0.0.1:{port}/postcodes"), TIMEOUT).unwrap();
    let result = client.lookup(&postcodes(1)).await;
    assert!(
        matches!(result, Err(ImportError::PostcodeConnect { .. })),
        "{result:?}"
    );
}

#[tokio::test]
async fn test_ripestat_owning_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/network-info/data.json"))
        .and(query_param("resource", "192.0.2.8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "data": {"asns": ["64496"], "prefix": "192.0.2.0/24"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/data/network-info/data.json", server.uri());
    let client = RipeStatClient::new(&url, TIMEOUT).unwrap();
    let block = client
        .owning_block(&Ipv4::new("192.0.2.8/29").unwrap())
        .await
        .unwrap();
    assert_eq!(block, Ipv4::new("192.0.2.0/24").unwrap());
}

#[tokio::test]
async fn test_ripestat_failure_names_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = RipeStatClient::new(&server.uri(), TIMEOUT).unwrap();
    match client.owning_block(&Ipv4::new("198.51.100.16/29").unwrap()).await {
        Err(ImportError::RouteLookup { prefix, message }) => {
            assert_eq!(prefix, "198.51.100.16/29");
            assert!(message.contains("503"), "{message}");
        }
        other => panic!("expected RouteLookup, got {other:?}"),
    }
}
