//! Server-side sessions keyed by the session cookie.

use models::request::BookingRequest;
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Session {
    username: String,
    /// The last successful search, reused when booking
    saved_query: Option<BookingRequest>,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Starts a session for `username` and returns its id
    pub fn create(&self, username: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        let now = Instant::now();

        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < self.ttl);
        sessions.insert(
            id.clone(),
            Session {
                username: username.to_string(),
                saved_query: None,
                last_seen: now,
            },
        );

        id
    }

    /// The user owning a live session, refreshing its idle timer
    pub fn username(&self, session_id: &str) -> Option<String> {
        let mut sessions = self.sessions.write();
        let now = Instant::now();

        let live = sessions
            .get(session_id)
            .is_some_and(|s| now.duration_since(s.last_seen) < self.ttl);
        if !live {
            sessions.remove(session_id);
            return None;
        }

        sessions.get_mut(session_id).map(|session| {
            session.last_seen = now;
            session.username.clone()
        })
    }

    pub fn is_authenticated(&self, session_id: &str) -> bool {
        self.username(session_id).is_some()
    }

    pub fn save_query(&self, session_id: &str, request: BookingRequest) {
        if let Some(session) = self.sessions.write().get_mut(session_id) {
            session.saved_query = Some(request);
        }
    }

    pub fn saved_query(&self, session_id: &str) -> Option<BookingRequest> {
        self.sessions
            .read()
            .get(session_id)
            .and_then(|s| s.saved_query.clone())
    }
}
