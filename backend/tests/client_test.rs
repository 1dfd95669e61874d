//! Backend client tests against a mock HTTP server

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde::Deserialize;
use serde_json::json;
use ticketdock_backend::{BackendClient, BackendConfig, BackendError, Direction, TableQuery};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Row {
    id: u32,
    price: f64,
}

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(BackendConfig::new(&server.uri(), "anon-key").unwrap()).unwrap()
}

fn token_response() -> serde_json::Value {
    json!({
        "access_token": "user-jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh",
        "user": { "id": "5f1c7c4e-0000-4000-8000-000000000001", "email": "ada@example.test" }
    })
}

#[tokio::test]
async fn select_sends_filters_and_reads_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .and(query_param("status", "eq.active"))
        .and(query_param("price", "gte.20"))
        .and(query_param("order", "price.asc"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .and(header("prefer", "count=exact"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-range", "0-1/2")
                .set_body_json(json!([{ "id": 1, "price": 50.0 }, { "id": 2, "price": 90.0 }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = TableQuery::new("tickets")
        .eq("status", "active")
        .gte("price", 20)
        .order("price", Direction::Ascending)
        .range(0, 10)
        .count_exact();
    let result = client_for(&server).select::<Row>(&query).await.unwrap();

    assert_eq!(result.total, Some(2));
    assert_eq!(
        result.rows,
        vec![Row { id: 1, price: 50.0 }, Row { id: 2, price: 90.0 }]
    );
}

#[tokio::test]
async fn select_maps_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tickets"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "code": "PGRST100", "message": "failed to parse filter" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .select::<Row>(&TableQuery::new("tickets"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::ApiError {
            status: 400,
            message: "failed to parse filter".to_string()
        }
    );
}

#[tokio::test]
async fn insert_returns_stored_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tickets"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({ "id": 7, "price": 42.5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 7, "price": 42.5 }])))
        .mount(&server)
        .await;

    let stored: Row = client_for(&server)
        .insert("tickets", &json!({ "id": 7, "price": 42.5 }))
        .await
        .unwrap();

    assert_eq!(stored, Row { id: 7, price: 42.5 });
}

#[tokio::test]
async fn insert_without_echo_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/events"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .insert::<_, Row>("events", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::EmptyInsert { .. }));
}

#[tokio::test]
async fn sign_in_stores_session_for_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({ "email": "ada@example.test", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer user-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()["user"].clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = client
        .sign_in_with_password("ada@example.test", "hunter22")
        .await
        .unwrap();
    assert_eq!(session.access_token, "user-jwt");

    let user = client.get_user().await.unwrap();
    assert_eq!(user.email.as_deref(), Some("ada@example.test"));
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .sign_in_with_password("ada@example.test", "wrong")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Unauthorized("Invalid login credentials".to_string())
    );
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn sign_up_pending_confirmation_has_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({
            "email": "ada@example.test",
            "password": "hunter22",
            "data": { "name": "Ada" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "5f1c7c4e-0000-4000-8000-000000000001" })),
        )
        .mount(&server)
        .await;

    let session = client_for(&server)
        .sign_up("ada@example.test", "hunter22", json!({ "name": "Ada" }))
        .await
        .unwrap();

    assert!(session.is_none());
}

#[tokio::test]
async fn sign_out_clears_session_even_when_remote_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .sign_in_with_password("ada@example.test", "hunter22")
        .await
        .unwrap();

    assert!(client.sign_out().await.is_err());
    assert!(client.session().await.is_none());
    assert!(client.sign_out().await.is_ok());
}

#[tokio::test]
async fn upload_never_overwrites() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/tickets/ticket-images/1-abc.png"))
        .and(header("x-upsert", "false"))
        .and(header("cache-control", "max-age=3600"))
        .and(header("content-type", "image/png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Key": "tickets/ticket-images/1-abc.png" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .upload("tickets", "ticket-images/1-abc.png", vec![0x89, 0x50], "image/png")
        .await
        .unwrap();
}

#[tokio::test]
async fn get_user_without_session_is_unauthorized() {
    let server = MockServer::start().await;
    let err = client_for(&server).get_user().await.unwrap_err();
    assert!(err.is_auth_error());
}
