//! In-process session table keyed by an opaque cookie value

use axum::http::{header::COOKIE, HeaderMap};
use dashmap::DashMap;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::storage::users;

/// Identity attached to an authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionIdentity {
    #[serde(rename = "id")]
    pub user_id: i32,
    pub email: String,
    pub name: String,
    #[serde(rename = "GroupId")]
    pub group_id: Option<i32>,
}

impl From<&users::Model> for SessionIdentity {
    fn from(user: &users::Model) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            group_id: user.group_id,
        }
    }
}

struct SessionEntry {
    identity: SessionIdentity,
    expires_at: Instant,
}

/// Concurrent session table
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    ttl: Duration,
    cookie_name: String,
    secure: bool,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
            cookie_name: config.cookie_name.clone(),
            secure: config.secure,
        }
    }

    /// Start a session for `identity` and return its id
    pub fn create(&self, identity: SessionIdentity) -> Uuid {
        let id = Uuid::new_v4();
        debug!(user_id = identity.user_id, "Session created");
        self.sessions.insert(
            id,
            SessionEntry {
                identity,
                expires_at: Instant::now() + self.ttl,
            },
        );
        id
    }

    /// Identity of a live session; expired sessions are dropped on lookup
    pub fn get(&self, id: &Uuid) -> Option<SessionIdentity> {
        let entry = self.sessions.get(id)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.sessions.remove(id);
            return None;
        }
        Some(entry.identity.clone())
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Replace the cached identity in every session of `user` with the stored row.
    ///
    /// Returns the number of sessions refreshed.
    pub fn refresh_user(&self, user: &users::Model) -> usize {
        let identity = SessionIdentity::from(user);
        let mut refreshed = 0;
        for mut entry in self.sessions.iter_mut() {
            if entry.identity.user_id == user.id {
                entry.identity = identity.clone();
                refreshed += 1;
            }
        }
        debug!(user_id = user.id, refreshed, "Sessions refreshed from store");
        refreshed
    }

    /// Drop all expired sessions, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Session id carried by the request's `Cookie` headers
    pub fn session_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == self.cookie_name)
            .find_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
    }

    /// `Set-Cookie` value establishing session `id`
    pub fn session_cookie(&self, id: Uuid) -> String {
        self.cookie(&id.to_string(), self.ttl.as_secs())
    }

    /// `Set-Cookie` value clearing the session cookie
    pub fn expired_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
