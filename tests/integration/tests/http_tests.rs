//! REST Integration Tests
//!
//! Exercise `RestClient` and the cache's get-or-create path against the
//! local mock API.
//!
//! Run with: cargo test -p integration-tests --test http_tests

use axum::http::{Method, StatusCode};
use integration_tests::*;
use relaycord_cache::StateCache;
use relaycord_common::Credentials;
use relaycord_core::{Guild, PrivateChannel, Snowflake, User};
use relaycord_http::{HttpError, RestClient};
use serde_json::json;

fn id(raw: u64) -> Snowflake {
    Snowflake::new(raw)
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_login_returns_token() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        "/auth/login",
        StatusCode::OK,
        json!({"token": "issued-token"}),
    );

    let rest = RestClient::new(http.base()).unwrap();
    let token = rest
        .login(&Credentials::new("me@example.com", "hunter2"))
        .await
        .unwrap();
    assert_eq!(token, "issued-token");

    let requests = http.requests_to("/auth/login");
    assert_eq!(requests.len(), 1);
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["email"], "me@example.com");
    assert_eq!(body["password"], "hunter2");
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_login_rejected() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        "/auth/login",
        StatusCode::BAD_REQUEST,
        json!({"email": ["Login or password is invalid."]}),
    );

    let rest = RestClient::new(http.base()).unwrap();
    let err = rest
        .login(&Credentials::new("me@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_gateway_url_is_authorized() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::GET,
        "/gateway",
        StatusCode::OK,
        json!({"url": "wss://gateway.test"}),
    );

    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    assert_eq!(rest.gateway_url().await.unwrap(), "wss://gateway.test");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].authorization.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_send_message_posts_content() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        &format!("/channels/{GENERAL}/messages"),
        StatusCode::OK,
        message(700, GENERAL, ME, "hello"),
    );

    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    let sent = rest.send_message(id(GENERAL), "hello").await.unwrap();
    assert_eq!(sent.id, id(700));
    assert_eq!(sent.channel_id, id(GENERAL));

    let requests = http.requests_to(&format!("/channels/{GENERAL}/messages"));
    assert_eq!(requests[0].body.as_ref().unwrap()["content"], "hello");
}

#[tokio::test]
async fn test_send_message_with_mentions() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        &format!("/channels/{GENERAL}/messages"),
        StatusCode::OK,
        message(701, GENERAL, ME, "<@2> look"),
    );

    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    let sent = rest
        .send_message_with_mentions(id(GENERAL), "<@2> look", &[id(BOB), id(3)])
        .await
        .unwrap();
    assert_eq!(sent.id, id(701));

    let requests = http.requests_to(&format!("/channels/{GENERAL}/messages"));
    assert_eq!(requests.len(), 1);
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["content"], "<@2> look");
    assert_eq!(body["mentions"], json!([BOB.to_string(), "3"]));
    assert_eq!(requests[0].authorization.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_unknown_route_maps_to_status_error() {
    let http = MockHttp::start().await.unwrap();
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");

    let err = rest.gateway_url().await.unwrap_err();
    assert!(matches!(err, HttpError::Status { status: 404, .. }));
}

// ============================================================================
// Private Channel Tests
// ============================================================================

#[tokio::test]
async fn test_private_channel_created_once() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        &format!("/users/{ME}/channels"),
        StatusCode::OK,
        private_channel(300, BOB, "bob"),
    );
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    let cache = StateCache::new();

    let opener = rest.private_channels_for(id(ME));
    let first = cache
        .get_or_create_private_channel(id(BOB), &opener)
        .await
        .unwrap();
    assert_eq!(first.id, id(300));
    assert_eq!(cache.private_channel_for(id(BOB)).unwrap().id, id(300));

    let requests = http.requests_to(&format!("/users/{ME}/channels"));
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body.as_ref().unwrap()["recipient_id"],
        BOB.to_string()
    );

    let second = cache
        .get_or_create_private_channel(id(BOB), &opener)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(http.requests().len(), 1);
}

#[tokio::test]
async fn test_cached_private_channel_skips_request() {
    let http = MockHttp::start().await.unwrap();
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    let cache = StateCache::new();
    cache.insert_private_channel(PrivateChannel::new(id(300), User::new(id(BOB), "bob")));

    let channel = cache
        .get_or_create_private_channel(id(BOB), &rest.private_channels_for(id(ME)))
        .await
        .unwrap();
    assert_eq!(channel.id, id(300));
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_private_channel_failure_leaves_cache_empty() {
    let http = MockHttp::start().await.unwrap();
    http.respond(
        Method::POST,
        &format!("/users/{ME}/channels"),
        StatusCode::FORBIDDEN,
        json!({"message": "Missing Permissions"}),
    );
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");
    let cache = StateCache::new();

    let result = cache
        .get_or_create_private_channel(id(BOB), &rest.private_channels_for(id(ME)))
        .await;
    assert!(result.is_err());
    assert!(cache.private_channel_for(id(BOB)).is_none());
}

// ============================================================================
// Voice Region Tests
// ============================================================================

fn regions_body() -> serde_json::Value {
    json!([
        {"id": "us-west", "name": "US West", "sample_hostname": "west.test", "sample_port": 80, "vip": false},
        {"id": "amsterdam", "name": "Amsterdam"},
    ])
}

#[tokio::test]
async fn test_regions_lists_all() {
    let http = MockHttp::start().await.unwrap();
    http.respond(Method::GET, "/voice/regions", StatusCode::OK, regions_body());
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");

    let regions = rest.regions().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].id, "us-west");
    assert_eq!(regions[0].sample_hostname.as_deref(), Some("west.test"));
    assert_eq!(regions[0].sample_port, Some(80));
    assert_eq!(regions[1].name, "Amsterdam");
    assert_eq!(
        http.requests_to("/voice/regions")[0].authorization.as_deref(),
        Some("secret")
    );
}

#[tokio::test]
async fn test_guild_region_matches_by_id() {
    let http = MockHttp::start().await.unwrap();
    http.respond(Method::GET, "/voice/regions", StatusCode::OK, regions_body());
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");

    let mut home = Guild::new(id(GUILD), "home");
    home.region = Some("amsterdam".into());
    let region = rest.guild_region(&home).await.unwrap().unwrap();
    assert_eq!(region.id, "amsterdam");
    assert_eq!(region.name, "Amsterdam");

    home.region = Some("frankfurt".into());
    assert!(rest.guild_region(&home).await.unwrap().is_none());
    assert_eq!(http.requests_to("/voice/regions").len(), 2);
}

#[tokio::test]
async fn test_guild_region_propagates_failure() {
    let http = MockHttp::start().await.unwrap();
    let rest = RestClient::new(http.base()).unwrap().with_token("secret");

    let mut home = Guild::new(id(GUILD), "home");
    home.region = Some("amsterdam".into());
    let err = rest.guild_region(&home).await.unwrap_err();
    assert!(matches!(err, HttpError::Status { status: 404, .. }));
}
