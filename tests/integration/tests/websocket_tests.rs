//! WebSocket Transport Tests
//!
//! Same client, real sockets: the default connector talks to a loopback
//! axum WebSocket server.
//!
//! Run with: cargo test -p integration-tests --test websocket_tests

use integration_tests::*;
use relaycord_core::Snowflake;
use relaycord_gateway::{Client, ConnectionState, GatewayError, ReconnectPolicy};

#[tokio::test]
async fn test_websocket_handshake_and_auth_failure() {
    let mut server = WsGateway::start().await.unwrap();
    let client = Client::builder("ws-token")
        .gateway_url(server.url())
        .reconnect(ReconnectPolicy::immediate())
        .build();
    let runner = client.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    let mut peer = server.accept().await.unwrap();
    let identify = peer.next_json().await.unwrap();
    assert_eq!(identify["op"], 2);
    assert_eq!(identify["d"]["token"], "ws-token");

    peer.send_json(&dispatch("READY", 1, ready())).await.unwrap();
    let mut states = client.subscribe_state();
    within("streaming", states.wait_for(|s| *s == ConnectionState::Streaming))
        .await
        .unwrap()
        .unwrap();
    assert!(client.cache().guild(Snowflake::new(GUILD)).is_some());

    peer.close_with(4004, "Authentication failed.").await.unwrap();
    let result = within("run to return", handle).await.unwrap().unwrap();
    assert!(matches!(result, Err(GatewayError::AuthenticationFailed(_))));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_websocket_binary_frames() {
    let mut server = WsGateway::start().await.unwrap();
    let client = Client::builder("ws-token").gateway_url(server.url()).build();
    let runner = client.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    let mut peer = server.accept().await.unwrap();
    assert_eq!(peer.next_json().await.unwrap()["op"], 2);
    peer.send_json(&dispatch("READY", 1, ready())).await.unwrap();
    let mut states = client.subscribe_state();
    within("streaming", states.wait_for(|s| *s == ConnectionState::Streaming))
        .await
        .unwrap()
        .unwrap();

    // Invalid UTF-8 is dropped; the session carries on
    peer.send_bytes(vec![0xff, 0xfe, 0x00]).await.unwrap();
    // Valid UTF-8 JSON in a binary frame is read like text
    let frame = dispatch("GUILD_CREATE", 2, guild(20, "second", &[(201, "lobby")]));
    peer.send_bytes(frame.to_string().into_bytes()).await.unwrap();

    let cache = client.cache().clone();
    eventually("guild after bad binary frame", || {
        cache.guild(Snowflake::new(20)).is_some()
    })
    .await
    .unwrap();
    assert_eq!(client.state(), ConnectionState::Streaming);
    assert!(!handle.is_finished());

    client.stop();
    within("run to return", handle).await.unwrap().unwrap().unwrap();
}

#[tokio::test]
async fn test_websocket_stop_closes_socket() {
    let mut server = WsGateway::start().await.unwrap();
    let client = Client::builder("ws-token").gateway_url(server.url()).build();
    let runner = client.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    let mut peer = server.accept().await.unwrap();
    assert_eq!(peer.next_json().await.unwrap()["op"], 2);

    client.stop();
    within("run to return", handle).await.unwrap().unwrap().unwrap();
    assert!(peer.next_json().await.is_err());
}

#[tokio::test]
async fn test_websocket_connect_refused() {
    let client = Client::builder("ws-token")
        .gateway_url("ws://127.0.0.1:1/")
        .build();

    let result = within("run to return", client.run()).await.unwrap();
    assert!(matches!(result, Err(GatewayError::Transport(_))));
}
