//! Realtime broadcast integration tests
//!
//! These tests exercise the connection registry and channel session
//! lifecycle in memory, with fake connections built around mpsc
//! receivers, the way the gateway builds real ones.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;
use wizzchat::backend::realtime::registry::{Broadcaster, ClientConnection, RoomId};
use wizzchat::backend::realtime::session::{ChannelSession, SessionState};
use wizzchat::shared::chat::{MessageView, UserSummary};
use wizzchat::shared::event::{BroadcastEvent, EventKind};

fn fake_connection(user_id: Uuid) -> (Arc<ClientConnection>, mpsc::Receiver<Arc<String>>) {
    let (tx, rx) = mpsc::channel(32);
    (
        Arc::new(ClientConnection::new(Uuid::new_v4(), user_id, tx)),
        rx,
    )
}

fn message_from(sender: &str, content: &str) -> MessageView {
    MessageView {
        id: Uuid::new_v4(),
        content: content.to_string(),
        sender: UserSummary {
            id: Uuid::new_v4(),
            username: sender.to_string(),
            message_color: "#3B82F6".to_string(),
        },
        reactions: vec![],
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn message_in_shared_conversation_reaches_participant_not_outsider() {
    // Users A and B share conversation C; D is somewhere else entirely.
    let broadcaster = Broadcaster::new();
    let conversation_c = RoomId::new(Uuid::new_v4());

    let (a_conn, mut a_rx) = fake_connection(Uuid::new_v4());
    let (d_conn, mut d_rx) = fake_connection(Uuid::new_v4());
    let a_id = a_conn.id();
    broadcaster.register(a_conn);
    broadcaster.register(d_conn);
    broadcaster.bind(a_id, conversation_c);

    // B sends a message in C
    let messages = vec![message_from("bob", "hi alice")];
    broadcaster.emit_to_room(conversation_c, &BroadcastEvent::chat_update(&messages));

    let frame = a_rx.try_recv().expect("participant should receive the update");
    let event: BroadcastEvent = serde_json::from_str(&frame).unwrap();
    assert_eq!(event.event, EventKind::ChatUpdate);
    assert_eq!(event.payload[0]["content"], "hi alice");

    assert!(d_rx.try_recv().is_err(), "outsider must receive nothing");
}

#[tokio::test]
async fn rebinding_same_room_does_not_change_membership() {
    let broadcaster = Broadcaster::new();
    let room = RoomId::new(Uuid::new_v4());
    let (conn, mut rx) = fake_connection(Uuid::new_v4());
    let conn_id = conn.id();
    broadcaster.register(conn);

    assert!(broadcaster.bind(conn_id, room));
    assert!(!broadcaster.bind(conn_id, room));
    assert_eq!(broadcaster.room_occupancy(room), 1);

    // One bind, one delivery
    broadcaster.emit_to_room(room, &BroadcastEvent::chat_update(&[]));
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn wizz_is_delivered_to_the_conversation_room_only() {
    let broadcaster = Broadcaster::new();
    let room = RoomId::new(Uuid::new_v4());
    let other_room = RoomId::new(Uuid::new_v4());

    let (in_room, mut in_rx) = fake_connection(Uuid::new_v4());
    let (elsewhere, mut elsewhere_rx) = fake_connection(Uuid::new_v4());
    let in_id = in_room.id();
    let elsewhere_id = elsewhere.id();
    broadcaster.register(in_room);
    broadcaster.register(elsewhere);
    broadcaster.bind(in_id, room);
    broadcaster.bind(elsewhere_id, other_room);

    let sender = Uuid::new_v4();
    broadcaster.emit_to_room(
        room,
        &BroadcastEvent::wizz(sender, "alice", room.conversation_id()),
    );

    let frame = in_rx.try_recv().unwrap();
    let event: BroadcastEvent = serde_json::from_str(&frame).unwrap();
    assert_eq!(event.event, EventKind::WizzReceived);
    assert_eq!(event.payload["senderUsername"], "alice");
    assert!(elsewhere_rx.try_recv().is_err());
}

#[tokio::test]
async fn conversation_list_update_goes_to_each_participant_connection() {
    let broadcaster = Broadcaster::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Alice has two tabs open, bob one, mallory is connected too
    let (alice_tab1, mut alice_rx1) = fake_connection(alice);
    let (alice_tab2, mut alice_rx2) = fake_connection(alice);
    let (bob_conn, mut bob_rx) = fake_connection(bob);
    let (mallory_conn, mut mallory_rx) = fake_connection(Uuid::new_v4());
    broadcaster.register(alice_tab1);
    broadcaster.register(alice_tab2);
    broadcaster.register(bob_conn);
    broadcaster.register(mallory_conn);

    let conversation_id = Uuid::new_v4();
    let participants = vec!["alice".to_string(), "bob".to_string()];
    let event = BroadcastEvent::conversation_list_update(conversation_id, &participants);
    broadcaster.emit_to_user(alice, &event);
    broadcaster.emit_to_user(bob, &event);

    assert!(alice_rx1.try_recv().is_ok());
    assert!(alice_rx2.try_recv().is_ok());
    assert!(bob_rx.try_recv().is_ok());
    assert!(mallory_rx.try_recv().is_err());
}

#[tokio::test]
async fn disconnect_then_reconnect_starts_from_a_clean_session() {
    let broadcaster = Broadcaster::new();
    let user = Uuid::new_v4();
    let room = RoomId::new(Uuid::new_v4());

    // First session binds a room, then disconnects
    let mut first = ChannelSession::new();
    first.authenticate(user);
    let (first_conn, _first_rx) = {
        let (tx, rx) = mpsc::channel(8);
        (
            Arc::new(ClientConnection::new(first.connection_id(), user, tx)),
            rx,
        )
    };
    broadcaster.register(first_conn);
    broadcaster.bind(first.connection_id(), room);
    first.join(room);
    first.complete_join();
    first.activate();

    broadcaster.unregister(first.connection_id());
    first.close();
    assert_eq!(broadcaster.room_occupancy(room), 0);

    // The reconnect is a fresh session: nothing inherited
    let second = ChannelSession::new();
    assert_ne!(second.connection_id(), first.connection_id());
    assert_eq!(second.state(), SessionState::Connecting);
    assert!(second.joined_rooms().is_empty());
}

#[tokio::test]
async fn concurrent_emits_from_independent_handlers() {
    // Two users reacting at the same moment must not corrupt the
    // registry or lose each other's events.
    let broadcaster = Arc::new(Broadcaster::new());
    let room = RoomId::new(Uuid::new_v4());
    let (conn, mut rx) = fake_connection(Uuid::new_v4());
    let conn_id = conn.id();
    broadcaster.register(conn);
    broadcaster.bind(conn_id, room);

    let mut handles = Vec::new();
    for i in 0..4 {
        let broadcaster = Arc::clone(&broadcaster);
        handles.push(std::thread::spawn(move || {
            let message = message_from("user", &format!("message {}", i));
            broadcaster.emit_to_room(room, &BroadcastEvent::reaction_update(&message));
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 4);
}

#[tokio::test]
async fn offline_recipient_misses_the_event_permanently() {
    let broadcaster = Broadcaster::new();
    let room = RoomId::new(Uuid::new_v4());

    // Nobody is bound: emitting is a silent no-op
    broadcaster.emit_to_room(room, &BroadcastEvent::chat_update(&[]));

    // A client binding afterwards receives nothing retroactively
    let (conn, mut rx) = fake_connection(Uuid::new_v4());
    let conn_id = conn.id();
    broadcaster.register(conn);
    broadcaster.bind(conn_id, room);
    assert!(rx.try_recv().is_err());
}
