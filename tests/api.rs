//! REST client against the stub service

mod common;

use common::{Fixtures, StubServer, BLOCKED_VENDOR, CREATED_ORDER_ID, EXPECTED_AUTH, STORES_BODY};
use fred_client::api::{ApiClient, ApiError, RestOutcome};
use fred_client::model::PoDetails;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

#[tokio::test]
async fn create_purchase_order_posts_details() {
    let server = StubServer::start().await;
    let client = ApiClient::from_config(&server.config()).unwrap();

    let outcome = client.create_purchase_order(&PoDetails::sample()).await.unwrap();
    assert_eq!(outcome, RestOutcome::Success(CREATED_ORDER_ID.to_string()));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/PO/CreatePurchOrder");
    assert_eq!(request.authorization.as_deref(), Some(EXPECTED_AUTH));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.accept.as_deref(), Some("application/json"));

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert!(body["Header"].is_object());
    assert_eq!(body["Header"]["VendAccount"], "SIG00001");
    assert_eq!(body["Header"]["PurchStatusValue"], "Backorder");
    assert_eq!(body["Lines"].as_array().unwrap().len(), 2);
    assert_eq!(body["Lines"][1]["ItemId"], "106397");

    let echoed: PoDetails = serde_json::from_value(body).unwrap();
    assert_eq!(echoed, PoDetails::sample());
}

#[tokio::test]
async fn rejected_order_is_a_failure_outcome() {
    let server = StubServer::start().await;
    let client = ApiClient::from_config(&server.config()).unwrap();

    let mut details = PoDetails::sample();
    details.header.vend_account = BLOCKED_VENDOR.to_string();

    match client.create_purchase_order(&details).await.unwrap() {
        RestOutcome::Failure { status, body } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, format!("Vendor {} is on hold", BLOCKED_VENDOR));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn user_stores_returns_raw_body() {
    let server = StubServer::start().await;
    let client = ApiClient::from_config(&server.config()).unwrap();

    let outcome = client.get_all_user_stores().await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.body(), STORES_BODY);
}

#[tokio::test]
async fn missing_credentials_reported_by_server() {
    let server = StubServer::start().await;
    let config = server.config_for(Default::default(), "", "");
    assert!(config.credentials().is_none());

    let client = ApiClient::from_config(&config).unwrap();
    let outcome = client.get_all_user_stores().await.unwrap();
    assert!(matches!(
        outcome,
        RestOutcome::Failure { status: StatusCode::UNAUTHORIZED, .. }
    ));
    assert_eq!(server.requests()[0].authorization, None);
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = StubServer::start_with(Fixtures {
        stores_delay: Some(Duration::from_secs(2)),
        ..Default::default()
    })
    .await;
    let config = server.config();
    let client = ApiClient::new(
        config.api_base_url.clone(),
        config.credentials(),
        Duration::from_millis(100),
    )
    .unwrap();

    match client.get_all_user_stores().await {
        Err(ApiError::HttpError(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}
