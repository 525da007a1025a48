//! End-to-end tests: real WebSocket clients against a running server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use minds::MindsServer;
use minds_room::RegistryConfig;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

type Ws = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn start(max_rooms: usize) -> String {
    let server = MindsServer::<minds_protocol::JsonCodec>::builder()
        .bind("127.0.0.1:0")
        .registry_config(RegistryConfig {
            max_rooms,
            deck_seed: Some(11),
        })
        .build()
        .await
        .unwrap();
    let addr = server.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn ws(addr: &str) -> Ws {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .unwrap();
    ws
}

async fn send(ws: &mut Ws, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

async fn recv(ws: &mut Ws) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("connection ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Reads events until one with the given tag arrives.
async fn recv_event(ws: &mut Ws, event: &str) -> Value {
    loop {
        let value = recv(ws).await;
        if value["event"] == event {
            return value;
        }
    }
}

#[tokio::test]
async fn test_join_delivers_ack_and_roster() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;

    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    let ack = recv(&mut c1).await;
    assert_eq!(ack["event"], "joinRoomSuccess");
    assert_eq!(ack["room"], "A");

    let roster = recv(&mut c1).await;
    assert_eq!(roster["event"], "setRoomPosition");
    assert_eq!(roster["round"], 1);
    assert_eq!(roster["lives"], 2);
    assert_eq!(roster["stars"], 1);
    assert_eq!(roster["players"].as_array().unwrap().len(), 1);

    // A second client joining the same room grows the roster for both.
    let mut c2 = ws(&addr).await;
    send(&mut c2, json!({"event": "joinRoom", "name": "A"})).await;
    let roster = recv_event(&mut c2, "setRoomPosition").await;
    assert_eq!(roster["players"].as_array().unwrap().len(), 2);
    let roster = recv_event(&mut c1, "setRoomPosition").await;
    assert_eq!(roster["players"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_room_limit_reported_to_client() {
    let addr = start(1).await;
    let mut c1 = ws(&addr).await;
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    recv_event(&mut c1, "joinRoomSuccess").await;

    let mut c2 = ws(&addr).await;
    send(&mut c2, json!({"event": "joinRoom", "name": "B"})).await;
    let failure = recv(&mut c2).await;
    assert_eq!(failure["event"], "joinRoomFailure");
    assert_eq!(failure["reason"], "room limit reached");
}

#[tokio::test]
async fn test_set_name_outside_room_acks_directly() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;

    send(&mut c1, json!({"event": "setName", "name": "ada"})).await;
    let ack = recv(&mut c1).await;
    assert_eq!(ack["event"], "setNameSuccess");
    assert_eq!(ack["name"], "ada");

    // The chosen name is what the roster shows after joining.
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    let roster = recv_event(&mut c1, "setRoomPosition").await;
    assert_eq!(roster["players"][0]["name"], "ada");
}

#[tokio::test]
async fn test_blank_name_rejected() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;

    send(&mut c1, json!({"event": "setName", "name": "   "})).await;
    let failure = recv(&mut c1).await;
    assert_eq!(failure["event"], "setNameFailure");
    assert_eq!(failure["reason"], "invalid name");
}

#[tokio::test]
async fn test_round_start_without_room_fails() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;

    send(&mut c1, json!({"event": "roundStart"})).await;
    let failure = recv(&mut c1).await;
    assert_eq!(failure["event"], "roundStartFailure");
    assert_eq!(failure["reason"], "not in a room");
}

#[tokio::test]
async fn test_play_card_before_round_fails() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    recv_event(&mut c1, "joinRoomSuccess").await;

    send(&mut c1, json!({"event": "playCard"})).await;
    let failure = recv(&mut c1).await;
    assert_eq!(failure["event"], "playCardFailure");
    assert_eq!(failure["reason"], "not in game");
}

/// Joins two clients into room "A" and plays through the focus gate.
/// Returns the clients and their single-card round-1 hands.
async fn two_players_in_game(addr: &str) -> (Ws, Ws, u64, u64) {
    let mut c1 = ws(addr).await;
    let mut c2 = ws(addr).await;
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    recv_event(&mut c1, "joinRoomSuccess").await;
    send(&mut c2, json!({"event": "joinRoom", "name": "A"})).await;
    recv_event(&mut c2, "joinRoomSuccess").await;

    send(&mut c1, json!({"event": "roundStart"})).await;
    let h1 = recv_event(&mut c1, "roundStartSuccess").await["hand"][0]
        .as_u64()
        .unwrap();
    let h2 = recv_event(&mut c2, "roundStartSuccess").await["hand"][0]
        .as_u64()
        .unwrap();
    assert_ne!(h1, h2);

    send(&mut c1, json!({"event": "setFocus", "focus": true})).await;
    send(&mut c2, json!({"event": "setFocus", "focus": true})).await;
    recv_event(&mut c1, "focusStart").await;
    recv_event(&mut c2, "focusStart").await;

    (c1, c2, h1, h2)
}

#[tokio::test]
async fn test_clean_round_over_the_wire() {
    let addr = start(4).await;
    let (mut c1, mut c2, h1, h2) = two_players_in_game(&addr).await;

    // Ascending order: the lower card first.
    let (first, second) = if h1 < h2 {
        (&mut c1, &mut c2)
    } else {
        (&mut c2, &mut c1)
    };

    send(first, json!({"event": "playCard"})).await;
    let play = recv_event(first, "playCardSuccess").await;
    assert_eq!(play["roundComplete"], false);
    assert_eq!(play["play"]["card"], h1.min(h2));

    send(second, json!({"event": "playCard"})).await;
    let play = recv_event(second, "playCardSuccess").await;
    assert_eq!(play["roundComplete"], true);

    // Round 2 lobby broadcast, lives untouched.
    let roster = recv_event(&mut c1, "setRoomPosition").await;
    assert_eq!(roster["round"], 2);
    assert_eq!(roster["lives"], 2);
}

#[tokio::test]
async fn test_bust_over_the_wire() {
    let addr = start(4).await;
    let (mut c1, mut c2, h1, h2) = two_players_in_game(&addr).await;

    // Out of order: the higher card busts the lower one.
    let offender = if h1 > h2 { &mut c1 } else { &mut c2 };
    send(offender, json!({"event": "playCard"})).await;

    for client in [&mut c1, &mut c2] {
        let bust = recv_event(client, "bust").await;
        assert_eq!(bust["lives"], 1);
        assert_eq!(bust["gameOver"], false);
        assert_eq!(bust["revealed"][0]["card"], h1.min(h2));
    }
}

#[tokio::test]
async fn test_disconnect_frees_the_seat() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    recv_event(&mut c1, "joinRoomSuccess").await;
    drop(c1);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The room was destroyed with its last player; a fresh join sees a
    // fresh roster.
    let mut c2 = ws(&addr).await;
    send(&mut c2, json!({"event": "joinRoom", "name": "A"})).await;
    let roster = recv_event(&mut c2, "setRoomPosition").await;
    assert_eq!(roster["players"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_undecodable_frame_is_ignored() {
    let addr = start(4).await;
    let mut c1 = ws(&addr).await;

    c1.send(Message::Text("not json".into())).await.unwrap();
    // The connection survives and keeps working.
    send(&mut c1, json!({"event": "joinRoom", "name": "A"})).await;
    let ack = recv(&mut c1).await;
    assert_eq!(ack["event"], "joinRoomSuccess");
}
