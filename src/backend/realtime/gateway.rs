/**
 * Realtime Channel Gateway
 *
 * This module implements the WebSocket endpoint for GET /ws. It owns
 * the connect -> authenticate -> join -> active -> closed path of each
 * channel session.
 *
 * # Handshake
 *
 * The transport is persistent, so the bearer token travels as a
 * `token` query parameter on the upgrade request instead of a header.
 * A missing or invalid token terminates the connection immediately; no
 * structured error payload is sent back, the client infers failure
 * from the drop.
 *
 * # Session Loop
 *
 * After resolution the socket task does two things concurrently:
 * drain the connection's outbound queue onto the socket, and read
 * client control messages. The only control message is
 * `join-conversation`, which (re-)binds the connection to a
 * conversation's room after a participant check.
 *
 * # Disconnect
 *
 * Any transport error, close frame, or queue shutdown ends the loop.
 * The connection is unregistered and nothing is persisted; a
 * reconnecting client re-runs the whole sequence.
 */

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::chat::db::is_participant;
use crate::backend::realtime::registry::{ClientConnection, RoomId};
use crate::backend::realtime::session::{resolve_memberships, ChannelSession};
use crate::backend::server::state::AppState;

/// Outbound frames queued per connection before drops begin
const OUTBOUND_QUEUE: usize = 64;

/// Handshake metadata for the channel endpoint
#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    /// Bearer token issued by login/signup
    pub token: Option<String>,
}

/// Control messages a client may send over the channel
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum ClientCommand {
    /// Explicitly (re-)bind this connection to a conversation's room
    JoinConversation {
        #[serde(rename = "conversationId")]
        conversation_id: Uuid,
    },
}

/// Handle the WebSocket upgrade for GET /ws
pub async fn channel_upgrade(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_channel(socket, state, query.token))
}

/// Drive one channel session from accept to disconnect
async fn run_channel(socket: WebSocket, state: AppState, token: Option<String>) {
    let mut session = ChannelSession::new();

    let Some(pool) = state.db_pool.clone() else {
        tracing::warn!("channel rejected: database not configured");
        session.close();
        return;
    };

    let Some(token) = token else {
        tracing::warn!(
            conn_id = %session.connection_id(),
            "channel rejected: no token in handshake"
        );
        session.close();
        return;
    };

    // Verify the token and resolve room memberships. Any failure is
    // fatal to this attempt: the socket drops and the client must
    // reconnect and re-resolve from scratch.
    let (user_id, rooms) = match resolve_memberships(&pool, &token).await {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(
                conn_id = %session.connection_id(),
                error = %e,
                "channel rejected"
            );
            session.close();
            return;
        }
    };
    session.authenticate(user_id);

    let (tx, mut rx) = mpsc::channel::<Arc<String>>(OUTBOUND_QUEUE);
    let connection = Arc::new(ClientConnection::new(
        session.connection_id(),
        user_id,
        tx,
    ));
    state.broadcaster.register(Arc::clone(&connection));

    // Best-effort binding: one room per membership, no all-or-nothing
    for room in rooms {
        state.broadcaster.bind(session.connection_id(), room);
        session.join(room);
    }
    session.complete_join();
    session.activate();

    tracing::info!(
        conn_id = %session.connection_id(),
        user_id = %user_id,
        rooms = session.joined_rooms().len(),
        "channel session active"
    );

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = rx.recv() => {
                match frame {
                    Some(frame) => {
                        if sender
                            .send(Message::Text(frame.as_str().into()))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_command(&pool, &state, &mut session, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Ping/pong is answered by the transport layer
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(
                            conn_id = %session.connection_id(),
                            error = %e,
                            "channel read error"
                        );
                        break;
                    }
                }
            }
        }
    }

    state.broadcaster.unregister(session.connection_id());
    session.close();
    tracing::info!(conn_id = %session.connection_id(), "channel session closed");
}

/// Apply one inbound control message.
///
/// Unparseable messages are ignored; a join for a conversation the
/// user does not participate in is refused. Membership-check failures
/// skip the bind without killing the session - the client can retry or
/// reconnect.
async fn handle_client_command(
    pool: &PgPool,
    state: &AppState,
    session: &mut ChannelSession,
    raw: &str,
) {
    let command: ClientCommand = match serde_json::from_str(raw) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(
                conn_id = %session.connection_id(),
                error = %e,
                "ignoring unparseable channel message"
            );
            return;
        }
    };

    match command {
        ClientCommand::JoinConversation { conversation_id } => {
            let Some(user_id) = session.user_id() else {
                return;
            };

            match is_participant(pool, conversation_id, user_id).await {
                Ok(true) => {
                    let room = RoomId::new(conversation_id);
                    state.broadcaster.bind(session.connection_id(), room);
                    session.join(room);
                    tracing::debug!(
                        conn_id = %session.connection_id(),
                        room = %room,
                        "joined conversation room"
                    );
                }
                Ok(false) => {
                    tracing::warn!(
                        conn_id = %session.connection_id(),
                        conversation_id = %conversation_id,
                        "join refused: not a participant"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        conn_id = %session.connection_id(),
                        error = %e,
                        "join skipped: membership check failed"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_conversation_wire_format() {
        let conversation_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"event":"join-conversation","conversationId":"{}"}}"#,
            conversation_id
        );
        let command: ClientCommand = serde_json::from_str(&raw).unwrap();
        let ClientCommand::JoinConversation {
            conversation_id: parsed,
        } = command;
        assert_eq!(parsed, conversation_id);
    }

    #[test]
    fn test_unknown_event_does_not_parse() {
        let raw = r#"{"event":"shout","volume":11}"#;
        assert!(serde_json::from_str::<ClientCommand>(raw).is_err());
    }

    #[test]
    fn test_malformed_conversation_id_does_not_parse() {
        let raw = r#"{"event":"join-conversation","conversationId":"not-a-uuid"}"#;
        assert!(serde_json::from_str::<ClientCommand>(raw).is_err());
    }
}
