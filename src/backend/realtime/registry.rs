//! Connection registry and event fan-out.
//!
//! The [`Broadcaster`] is the single owner of the connection/room
//! registry. Request handlers hold it behind an `Arc` and call `emit_*`
//! after their persistence write succeeds; the channel gateway
//! registers and unregisters connections as sockets come and go.
//!
//! Delivery is fire-and-forget: each connection has a bounded queue
//! drained by its socket task, and an event that does not fit is
//! dropped for that client. Binding, unbinding, and emission are plain
//! in-memory operations and never await.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::event::BroadcastEvent;

/// Opaque handle for one physical connection, owned by the transport
pub type ConnectionId = Uuid;

/// A broadcast scope keyed by conversation id.
///
/// Rooms are typed rather than formatted strings so a conversation id
/// can never be confused with any other registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Room for the given conversation
    pub fn new(conversation_id: Uuid) -> Self {
        Self(conversation_id)
    }

    /// The conversation this room broadcasts for
    pub fn conversation_id(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RoomId {
    fn from(conversation_id: Uuid) -> Self {
        Self::new(conversation_id)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversation/{}", self.0)
    }
}

/// One registered connection: its authenticated user, the rooms it has
/// joined, and the queue its socket task drains.
pub struct ClientConnection {
    id: ConnectionId,
    user_id: Uuid,
    rooms: RwLock<HashSet<RoomId>>,
    tx: mpsc::Sender<Arc<String>>,
}

impl ClientConnection {
    /// Create a connection for an authenticated user
    pub fn new(id: ConnectionId, user_id: Uuid, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            user_id,
            rooms: RwLock::new(HashSet::new()),
            tx,
        }
    }

    /// Connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The authenticated user behind this connection
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Join a room. Idempotent: returns false if already joined.
    pub fn join_room(&self, room: RoomId) -> bool {
        self.rooms.write().unwrap().insert(room)
    }

    /// Whether this connection is currently bound to the room
    pub fn is_in_room(&self, room: RoomId) -> bool {
        self.rooms.read().unwrap().contains(&room)
    }

    /// Snapshot of the rooms this connection is bound to
    pub fn rooms(&self) -> HashSet<RoomId> {
        self.rooms.read().unwrap().clone()
    }

    /// Queue a frame for delivery, returning false if the queue is full
    /// or the socket task is gone.
    fn send(&self, frame: Arc<String>) -> bool {
        self.tx.try_send(frame).is_ok()
    }
}

/// The shared fan-out point for realtime events.
///
/// Holds no mutable state beyond the connection registry itself;
/// emitting to a room nobody is bound to is a silent no-op, and there
/// is no acknowledgement or redelivery. Clients that miss an event
/// recover through their own REST refetch.
pub struct Broadcaster {
    connections: RwLock<HashMap<ConnectionId, Arc<ClientConnection>>>,
}

impl Broadcaster {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection after its session authenticated
    pub fn register(&self, connection: Arc<ClientConnection>) {
        let mut connections = self.connections.write().unwrap();
        connections.insert(connection.id(), connection);
    }

    /// Drop a connection from the registry on disconnect
    pub fn unregister(&self, id: ConnectionId) {
        let mut connections = self.connections.write().unwrap();
        connections.remove(&id);
    }

    /// Bind a registered connection to a room.
    ///
    /// Idempotent: binding the same connection to the same room twice
    /// leaves its membership unchanged. Returns false when the binding
    /// already existed or the connection is unknown.
    pub fn bind(&self, id: ConnectionId, room: RoomId) -> bool {
        let connections = self.connections.read().unwrap();
        match connections.get(&id) {
            Some(connection) => connection.join_room(room),
            None => {
                tracing::warn!("bind for unknown connection {}", id);
                false
            }
        }
    }

    /// Deliver an event to every connection bound to the room
    pub fn emit_to_room(&self, room: RoomId, event: &BroadcastEvent) {
        self.emit_where(|c| c.is_in_room(room), event, &room.to_string());
    }

    /// Deliver an event to every connection of one user
    pub fn emit_to_user(&self, user_id: Uuid, event: &BroadcastEvent) {
        self.emit_where(|c| c.user_id() == user_id, event, "user");
    }

    /// Deliver an event to all connected sessions.
    ///
    /// Reserved for low-sensitivity notices; room and user scoping are
    /// the default for anything carrying conversation content.
    pub fn emit_all(&self, event: &BroadcastEvent) {
        self.emit_where(|_| true, event, "all");
    }

    /// Serialize once, then fan out to connections matching the filter.
    fn emit_where(
        &self,
        filter: impl Fn(&ClientConnection) -> bool,
        event: &BroadcastEvent,
        scope: &str,
    ) {
        let frame = match serde_json::to_string(event) {
            Ok(json) => Arc::new(json),
            Err(e) => {
                tracing::warn!(event = event.event.as_str(), error = %e, "failed to serialize event");
                return;
            }
        };

        let connections = self.connections.read().unwrap();
        let mut recipients = 0usize;
        for connection in connections.values() {
            if filter(connection) {
                recipients += 1;
                if !connection.send(Arc::clone(&frame)) {
                    tracing::warn!(
                        conn_id = %connection.id(),
                        event = event.event.as_str(),
                        "dropped event for slow or gone client"
                    );
                }
            }
        }
        tracing::debug!(
            event = event.event.as_str(),
            scope,
            recipients,
            "broadcast event"
        );
    }

    /// Number of registered connections
    pub fn connection_count(&self) -> usize {
        self.connections.read().unwrap().len()
    }

    /// Number of connections currently bound to the room
    pub fn room_occupancy(&self, room: RoomId) -> usize {
        self.connections
            .read()
            .unwrap()
            .values()
            .filter(|c| c.is_in_room(room))
            .count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::event::EventKind;

    fn make_connection(user_id: Uuid) -> (Arc<ClientConnection>, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(32);
        let connection = Arc::new(ClientConnection::new(Uuid::new_v4(), user_id, tx));
        (connection, rx)
    }

    fn make_event() -> BroadcastEvent {
        BroadcastEvent::new(EventKind::ChatUpdate, serde_json::json!([]))
    }

    #[test]
    fn test_register_and_unregister() {
        let broadcaster = Broadcaster::new();
        let (connection, _rx) = make_connection(Uuid::new_v4());
        let id = connection.id();

        broadcaster.register(connection);
        assert_eq!(broadcaster.connection_count(), 1);

        broadcaster.unregister(id);
        assert_eq!(broadcaster.connection_count(), 0);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let broadcaster = Broadcaster::new();
        broadcaster.unregister(Uuid::new_v4());
        assert_eq!(broadcaster.connection_count(), 0);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let broadcaster = Broadcaster::new();
        let (connection, _rx) = make_connection(Uuid::new_v4());
        let id = connection.id();
        broadcaster.register(connection);

        let room = RoomId::new(Uuid::new_v4());
        assert!(broadcaster.bind(id, room));
        assert!(!broadcaster.bind(id, room));
        assert_eq!(broadcaster.room_occupancy(room), 1);
    }

    #[test]
    fn test_bind_unknown_connection() {
        let broadcaster = Broadcaster::new();
        let room = RoomId::new(Uuid::new_v4());
        assert!(!broadcaster.bind(Uuid::new_v4(), room));
        assert_eq!(broadcaster.room_occupancy(room), 0);
    }

    #[test]
    fn test_emit_to_room_reaches_only_bound_connections() {
        let broadcaster = Broadcaster::new();
        let (in_room, mut in_rx) = make_connection(Uuid::new_v4());
        let (out_of_room, mut out_rx) = make_connection(Uuid::new_v4());
        let room = RoomId::new(Uuid::new_v4());

        let in_id = in_room.id();
        broadcaster.register(in_room);
        broadcaster.register(out_of_room);
        broadcaster.bind(in_id, room);

        broadcaster.emit_to_room(room, &make_event());

        assert!(in_rx.try_recv().is_ok());
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_to_empty_room_is_silent_noop() {
        let broadcaster = Broadcaster::new();
        let room = RoomId::new(Uuid::new_v4());
        broadcaster.emit_to_room(room, &make_event());
    }

    #[test]
    fn test_emit_to_user_reaches_all_their_connections() {
        let broadcaster = Broadcaster::new();
        let user = Uuid::new_v4();
        let (first, mut first_rx) = make_connection(user);
        let (second, mut second_rx) = make_connection(user);
        let (other, mut other_rx) = make_connection(Uuid::new_v4());

        broadcaster.register(first);
        broadcaster.register(second);
        broadcaster.register(other);

        broadcaster.emit_to_user(user, &make_event());

        assert!(first_rx.try_recv().is_ok());
        assert!(second_rx.try_recv().is_ok());
        assert!(other_rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_all_reaches_everyone() {
        let broadcaster = Broadcaster::new();
        let (first, mut first_rx) = make_connection(Uuid::new_v4());
        let (second, mut second_rx) = make_connection(Uuid::new_v4());
        broadcaster.register(first);
        broadcaster.register(second);

        broadcaster.emit_all(&make_event());

        assert!(first_rx.try_recv().is_ok());
        assert!(second_rx.try_recv().is_ok());
    }

    #[test]
    fn test_full_queue_drops_event_without_disturbing_others() {
        let broadcaster = Broadcaster::new();
        let room = RoomId::new(Uuid::new_v4());

        // One-slot queue that we never drain
        let (tx, _slow_rx) = mpsc::channel(1);
        let slow = Arc::new(ClientConnection::new(Uuid::new_v4(), Uuid::new_v4(), tx));
        let slow_id = slow.id();
        let (fast, mut fast_rx) = make_connection(Uuid::new_v4());
        let fast_id = fast.id();

        broadcaster.register(slow);
        broadcaster.register(fast);
        broadcaster.bind(slow_id, room);
        broadcaster.bind(fast_id, room);

        broadcaster.emit_to_room(room, &make_event());
        broadcaster.emit_to_room(room, &make_event());

        // The fast client got both, the slow client's second event was dropped
        assert!(fast_rx.try_recv().is_ok());
        assert!(fast_rx.try_recv().is_ok());
        assert_eq!(broadcaster.connection_count(), 2);
    }

    #[test]
    fn test_frame_is_serialized_event() {
        let broadcaster = Broadcaster::new();
        let (connection, mut rx) = make_connection(Uuid::new_v4());
        broadcaster.register(connection);

        let event = BroadcastEvent::wizz(Uuid::new_v4(), "alice", Uuid::new_v4());
        broadcaster.emit_all(&event);

        let frame = rx.try_recv().unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&frame).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_room_occupancy_counts_bound_connections() {
        let broadcaster = Broadcaster::new();
        let room = RoomId::new(Uuid::new_v4());
        let other_room = RoomId::new(Uuid::new_v4());

        let (a, _a_rx) = make_connection(Uuid::new_v4());
        let (b, _b_rx) = make_connection(Uuid::new_v4());
        let a_id = a.id();
        let b_id = b.id();
        broadcaster.register(a);
        broadcaster.register(b);
        broadcaster.bind(a_id, room);
        broadcaster.bind(b_id, room);
        broadcaster.bind(b_id, other_room);

        assert_eq!(broadcaster.room_occupancy(room), 2);
        assert_eq!(broadcaster.room_occupancy(other_room), 1);
    }

    #[test]
    fn test_room_id_display_and_accessor() {
        let conversation_id = Uuid::new_v4();
        let room = RoomId::new(conversation_id);
        assert_eq!(room.conversation_id(), conversation_id);
        assert_eq!(room.to_string(), format!("conversation/{}", conversation_id));
    }
}
