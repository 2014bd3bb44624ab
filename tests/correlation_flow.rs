//! End-to-end correlation tracing through a running gateway.

use std::time::Duration;

use mybank_gateway::CorrelationId;
use reqwest::StatusCode;
use serde_json::Value;

mod common;

async fn echoed(response: reqwest::Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

fn correlation_ids(body: &Value) -> Vec<String> {
    body["correlationIds"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_missing_id_is_generated_and_forwarded() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;

    let response = common::client()
        .get(format!("http://{gateway}/mybank/accounts/api/fetchCustomerDetails?mobileNumber=123"))
        .send()
        .await
        .unwrap();
    let body = echoed(response).await;

    let ids = correlation_ids(&body);
    assert_eq!(ids.len(), 1);
    let id = CorrelationId::parse(&ids[0]).unwrap();
    assert_eq!(id.as_str().len(), 36);
    assert_eq!(body["path"], "/api/fetchCustomerDetails?mobileNumber=123");
    assert_eq!(body["forwardedFor"][0], "127.0.0.1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_id_is_preserved() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;

    let response = common::client()
        .get(format!("http://{gateway}/mybank/accounts/api/fetch"))
        .header("mybank-correlation-id", "abc-123")
        .send()
        .await
        .unwrap();

    // the response itself is not tagged
    assert!(response.headers().get("mybank-correlation-id").is_none());
    let body = echoed(response).await;
    assert_eq!(correlation_ids(&body), vec!["abc-123"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unusable_ids_are_replaced() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;
    let client = common::client();

    for value in ["", "a,b"] {
        let response = client
            .get(format!("http://{gateway}/mybank/accounts/api/fetch"))
            .header("mybank-correlation-id", value)
            .send()
            .await
            .unwrap();
        let ids = correlation_ids(&echoed(response).await);
        assert_eq!(ids.len(), 1);
        assert_ne!(ids[0], value);
        assert!(CorrelationId::parse(&ids[0]).is_ok());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_repeated_header_is_collapsed_to_first() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;

    let response = common::client()
        .get(format!("http://{gateway}/mybank/accounts/api/fetch"))
        .header("mybank-correlation-id", "first")
        .header("mybank-correlation-id", "second")
        .send()
        .await
        .unwrap();

    assert_eq!(correlation_ids(&echoed(response).await), vec!["first"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_connection_header_cannot_strip_the_id() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;
    let client = common::client();

    for inbound in [Some("abc-123"), None] {
        let mut request = client
            .get(format!("http://{gateway}/mybank/accounts/api/fetch"))
            .header("connection", "mybank-correlation-id");
        if let Some(id) = inbound {
            request = request.header("mybank-correlation-id", id);
        }

        let ids = correlation_ids(&echoed(request.send().await.unwrap()).await);
        assert_eq!(ids.len(), 1, "inbound {inbound:?}");
        match inbound {
            Some(id) => assert_eq!(ids[0], id),
            None => assert!(CorrelationId::parse(&ids[0]).is_ok()),
        }
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests_are_tagged_independently() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;
    let client = common::client();

    let requests = (0..20).map(|i| {
        let client = client.clone();
        async move {
            let mut request = client.get(format!("http://{gateway}/mybank/accounts/api/fetch"));
            if i % 2 == 0 {
                request = request.header("mybank-correlation-id", format!("client-{i}"));
            }
            let body = echoed(request.send().await.unwrap()).await;
            (i, correlation_ids(&body))
        }
    });
    let results = futures_util::future::join_all(requests).await;

    let mut generated = Vec::new();
    for (i, ids) in results {
        assert_eq!(ids.len(), 1);
        if i % 2 == 0 {
            assert_eq!(ids[0], format!("client-{i}"));
        } else {
            generated.push(ids[0].clone());
        }
    }
    generated.sort();
    generated.dedup();
    assert_eq!(generated.len(), 10);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_service_times_out_with_error_body() {
    let backend = common::start_slow_service(Duration::from_secs(5)).await;
    let mut config = common::gateway_config(backend);
    config.routes[0].timeout_ms = Some(200);
    let (gateway, shutdown) = common::start_gateway(config).await;

    let response = common::client()
        .get(format!("http://{gateway}/mybank/accounts/api/fetch"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["apiPath"], "/mybank/accounts/api/fetch");
    assert_eq!(body["errorCode"], "GATEWAY_TIMEOUT");
    assert!(body["errorTimestamp"].is_string());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;

    let response = common::client()
        .get(format!("http://{gateway}/mybank/insurance/api/fetch"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errorCode"], "NOT_FOUND");

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_is_served_locally() {
    let backend = common::start_echo_service().await;
    let (gateway, shutdown) = common::start_gateway(common::gateway_config(backend)).await;

    let response = common::client()
        .get(format!("http://{gateway}/actuator/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "UP");

    shutdown.trigger();
}
