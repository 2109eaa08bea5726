/**
 * Channel Session Lifecycle and Room Membership Resolution
 *
 * A channel session is the per-connection state machine covering the
 * path from connect to disconnect:
 *
 * ```text
 * Connecting -> Authenticated -> Joined -> Active -> Closed
 * Connecting -> Closed                  (auth or lookup failure)
 * ```
 *
 * Nothing here outlives the connection. On auth failure the session
 * closes without ever binding a room, and the client sees only the
 * transport-level disconnect. A reconnecting client starts a fresh
 * session and membership is resolved from scratch, so bindings always
 * reflect persisted membership as of resolution time - if membership
 * changes while a session is live, its bindings go stale until the
 * next reconnect. That drift is a documented limitation, not corrected
 * here.
 */

use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::chat::db::conversation_ids_for_user;
use crate::backend::realtime::registry::{ConnectionId, RoomId};

/// Lifecycle state of a channel session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket accepted, token not yet verified
    Connecting,
    /// Token verified, rooms not yet bound
    Authenticated,
    /// Membership bound (possibly partially)
    Joined,
    /// Receiving and triggering broadcasts
    Active,
    /// Terminal
    Closed,
}

/// Why a connection attempt was rejected.
///
/// Both variants are fatal to the attempt: the caller terminates the
/// connection, and no structured error reaches the client. There is no
/// retry; a dropped client reconnects and re-resolves from scratch.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Missing, malformed, expired, or forged token
    #[error("channel authentication failed: {0}")]
    Auth(#[from] jsonwebtoken::errors::Error),

    /// Token verified but its subject is not a usable user id
    #[error("token subject is not a valid user id")]
    InvalidIdentity,

    /// Persistence failure while resolving conversation memberships
    #[error("membership lookup failed: {0}")]
    MembershipLookup(#[from] sqlx::Error),
}

/// Per-connection session state
///
/// Created when the socket is accepted and destroyed on disconnect.
/// The authoritative room table lives in the broadcaster's registry;
/// the session keeps its own view for lifecycle bookkeeping.
#[derive(Debug)]
pub struct ChannelSession {
    connection_id: ConnectionId,
    user_id: Option<Uuid>,
    joined_rooms: HashSet<RoomId>,
    state: SessionState,
}

impl ChannelSession {
    /// New session in the `Connecting` state with a fresh connection id
    pub fn new() -> Self {
        Self {
            connection_id: Uuid::new_v4(),
            user_id: None,
            joined_rooms: HashSet::new(),
            state: SessionState::Connecting,
        }
    }

    /// Connection id, assigned at accept time
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// The authenticated user, once the token has been verified
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Rooms this session has joined
    pub fn joined_rooms(&self) -> &HashSet<RoomId> {
        &self.joined_rooms
    }

    /// Token verified: `Connecting -> Authenticated`
    pub fn authenticate(&mut self, user_id: Uuid) {
        debug_assert_eq!(self.state, SessionState::Connecting);
        self.user_id = Some(user_id);
        self.state = SessionState::Authenticated;
    }

    /// Record a room binding. Idempotent: re-joining a room the session
    /// already holds returns false and changes nothing.
    pub fn join(&mut self, room: RoomId) -> bool {
        self.joined_rooms.insert(room)
    }

    /// All memberships bound (best-effort): `Authenticated -> Joined`
    pub fn complete_join(&mut self) {
        debug_assert_eq!(self.state, SessionState::Authenticated);
        self.state = SessionState::Joined;
    }

    /// Session now receives and triggers broadcasts: `Joined -> Active`
    pub fn activate(&mut self) {
        debug_assert_eq!(self.state, SessionState::Joined);
        self.state = SessionState::Active;
    }

    /// Terminal transition, valid from any state
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}

impl Default for ChannelSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a connecting client's identity and room memberships.
///
/// Verifies the bearer token supplied in the handshake, then loads the
/// ids of every conversation the user participates in. Only ids are
/// fetched here - message history stays out of the connect path.
///
/// # Errors
///
/// * `ConnectError::Auth` - token missing/expired/invalid
/// * `ConnectError::InvalidIdentity` - token subject is not a UUID
/// * `ConnectError::MembershipLookup` - persistence failure
pub async fn resolve_memberships(
    pool: &PgPool,
    token: &str,
) -> Result<(Uuid, Vec<RoomId>), ConnectError> {
    let claims = verify_token(token)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ConnectError::InvalidIdentity)?;

    let conversation_ids = conversation_ids_for_user(pool, user_id).await?;
    let rooms = conversation_ids.into_iter().map(RoomId::new).collect();

    Ok((user_id, rooms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_starts_connecting_and_unauthenticated() {
        let session = ChannelSession::new();
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(session.user_id().is_none());
        assert!(session.joined_rooms().is_empty());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut session = ChannelSession::new();
        let user_id = Uuid::new_v4();
        let room = RoomId::new(Uuid::new_v4());

        session.authenticate(user_id);
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(session.user_id(), Some(user_id));

        assert!(session.join(room));
        session.complete_join();
        assert_eq!(session.state(), SessionState::Joined);

        session.activate();
        assert_eq!(session.state(), SessionState::Active);

        session.close();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_auth_failure_closes_with_zero_rooms() {
        let mut session = ChannelSession::new();
        // Connecting -> Closed directly, nothing bound
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.joined_rooms().is_empty());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn test_join_is_idempotent() {
        let mut session = ChannelSession::new();
        session.authenticate(Uuid::new_v4());
        let room = RoomId::new(Uuid::new_v4());

        assert!(session.join(room));
        assert!(!session.join(room));
        assert_eq!(session.joined_rooms().len(), 1);
    }

    #[test]
    fn test_two_sessions_have_distinct_connection_ids() {
        let first = ChannelSession::new();
        let second = ChannelSession::new();
        assert_ne!(first.connection_id(), second.connection_id());
    }

    #[test]
    fn test_partial_join_still_completes() {
        let mut session = ChannelSession::new();
        session.authenticate(Uuid::new_v4());

        // Only one of two rooms bound; the session still reaches Joined
        session.join(RoomId::new(Uuid::new_v4()));
        session.complete_join();
        session.activate();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.joined_rooms().len(), 1);
    }
}
